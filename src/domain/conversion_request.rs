use bytes::Bytes;

pub const DEFAULT_PITCH: i32 = 7;
pub const DEFAULT_SPEED: f64 = 1.05;
pub const DEFAULT_REMOVE_HISS: bool = true;

/// Raw audio received from the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl AudioUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Voice transformation knobs forwarded to the Space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionParams {
    /// Pitch shift in semitones.
    pub pitch: i32,
    /// Playback speed multiplier.
    pub speed: f64,
    pub remove_hiss: bool,
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self {
            pitch: DEFAULT_PITCH,
            speed: DEFAULT_SPEED,
            remove_hiss: DEFAULT_REMOVE_HISS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub audio: AudioUpload,
    pub params: ConversionParams,
}

impl ConversionRequest {
    pub fn new(audio: AudioUpload, params: ConversionParams) -> Self {
        Self { audio, params }
    }
}
