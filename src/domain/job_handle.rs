use std::fmt;

use serde::Deserialize;

/// Submission acknowledgement as returned by the Space. Different deployments
/// name the identifier differently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJobHandle {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Picks the first non-empty of `id`, `event_id`, `hash`.
    pub fn normalize(raw: RawJobHandle) -> Option<Self> {
        [raw.id, raw.event_id, raw.hash]
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty())
            .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
