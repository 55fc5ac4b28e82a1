use crate::application::ports::SpaceError;

/// Turns `owner/name` or a full URL into the Space's base URL.
pub fn resolve_space_url(space: &str) -> Result<String, SpaceError> {
    let trimmed = space.trim();

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Ok(trimmed.trim_end_matches('/').to_string());
    }

    let (owner, name) = trimmed
        .split_once('/')
        .filter(|(owner, name)| !owner.is_empty() && !name.is_empty() && !name.contains('/'))
        .ok_or_else(|| SpaceError::InvalidSpaceId(trimmed.to_string()))?;

    let subdomain = format!("{}-{}", owner, name)
        .to_lowercase()
        .replace(['_', '.'], "-");

    Ok(format!("https://{}.hf.space", subdomain))
}
