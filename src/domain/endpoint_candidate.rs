use std::fmt;
use std::str::FromStr;

/// A guess at which remote callable accepts the conversion job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EndpointCandidate {
    /// Named API route such as `/predict`.
    Named(String),
    /// Positional function index in the Space's dependency list.
    Index(u32),
}

impl EndpointCandidate {
    pub fn named(name: &str) -> Self {
        let trimmed = name.trim();
        if trimmed.starts_with('/') {
            Self::Named(trimmed.to_string())
        } else {
            Self::Named(format!("/{}", trimmed))
        }
    }

    /// Route segment used by the named call API, without the leading slash.
    pub fn route_name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name.trim_start_matches('/')),
            Self::Index(_) => None,
        }
    }

    /// Builds the ordered candidate list: operator override first, then the
    /// conventional names, then function indexes `0..index_count`. Duplicates keep
    /// their first position.
    pub fn ordered(
        endpoint_override: Option<&str>,
        conventional: &[String],
        index_count: u32,
    ) -> Vec<EndpointCandidate> {
        let mut candidates: Vec<EndpointCandidate> = Vec::new();

        let explicit = endpoint_override
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse().ok());
        let named = conventional
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(EndpointCandidate::named);
        let indexed = (0..index_count).map(EndpointCandidate::Index);

        for candidate in explicit.into_iter().chain(named).chain(indexed) {
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }

        candidates
    }
}

impl FromStr for EndpointCandidate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Empty endpoint".to_string());
        }
        if let Ok(index) = trimmed.parse::<u32>() {
            return Ok(Self::Index(index));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(format!("Invalid endpoint: {}", trimmed));
        }
        Ok(Self::named(trimmed))
    }
}

impl fmt::Display for EndpointCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{}", index),
        }
    }
}
