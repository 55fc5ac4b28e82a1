use std::fmt;

use serde_json::Value;

use super::ConversionParams;

/// One ordered argument list tried against an endpoint candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadShape {
    /// `[audio, pitch, speed, remove_hiss]`
    Full,
    /// `[audio, pitch, speed]`
    PitchAndSpeed,
    /// `[audio, pitch]`
    PitchOnly,
    /// `[audio]`
    AudioOnly,
}

impl PayloadShape {
    /// Richest shape first.
    pub const ALL: [PayloadShape; 4] = [
        PayloadShape::Full,
        PayloadShape::PitchAndSpeed,
        PayloadShape::PitchOnly,
        PayloadShape::AudioOnly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::PitchAndSpeed => "pitch_speed",
            Self::PitchOnly => "pitch",
            Self::AudioOnly => "audio_only",
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Self::Full => 4,
            Self::PitchAndSpeed => 3,
            Self::PitchOnly => 2,
            Self::AudioOnly => 1,
        }
    }

    pub fn build(&self, audio: &Value, params: &ConversionParams) -> Vec<Value> {
        let full = [
            audio.clone(),
            Value::from(params.pitch),
            Value::from(params.speed),
            Value::from(params.remove_hiss),
        ];
        full.into_iter().take(self.arity()).collect()
    }
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
