use serde_json::Value;

/// Reference to an output file inside a completed job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    pub url: Option<String>,
    pub path: Option<String>,
    pub mime_type: Option<String>,
}

impl AudioArtifact {
    /// Returns the first output entry that points at a file.
    ///
    /// Entries may be a bare string (URL or server path) or an object carrying
    /// `url`, `path` or `name`.
    pub fn from_output(output: &[Value]) -> Option<Self> {
        output.iter().find_map(Self::from_value)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self::from_location(s.trim())),
            Value::Object(map) => {
                let field = |key: &str| {
                    map.get(key)
                        .and_then(Value::as_str)
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                };
                let url = field("url");
                let path = field("path").or_else(|| field("name"));
                if url.is_none() && path.is_none() {
                    return None;
                }
                Some(Self {
                    url,
                    path,
                    mime_type: field("mime_type"),
                })
            }
            _ => None,
        }
    }

    fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self {
                url: Some(location.to_string()),
                path: None,
                mime_type: None,
            }
        } else {
            Self {
                url: None,
                path: Some(location.to_string()),
                mime_type: None,
            }
        }
    }
}
