use bytes::Bytes;

pub const DEFAULT_AUDIO_CONTENT_TYPE: &str = "audio/wav";

/// Converted audio ready to be relayed to the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub bytes: Bytes,
    pub content_type: String,
}

impl ConversionResult {
    /// Keeps `content_type` only when it names an audio type.
    pub fn new(bytes: Bytes, content_type: Option<&str>) -> Self {
        let content_type = content_type
            .map(str::trim)
            .filter(|ct| ct.starts_with("audio/"))
            .unwrap_or(DEFAULT_AUDIO_CONTENT_TYPE)
            .to_string();
        Self {
            bytes,
            content_type,
        }
    }
}
