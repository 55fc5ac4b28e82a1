use axum::extract::{Multipart, State};
use axum::response::Response;

use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

use super::audio_response::audio_response;
use super::conversion_form::read_conversion_form;

/// Submits and waits for the result within the same request.
#[tracing::instrument(skip(state, multipart))]
pub async fn convert_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let service = state.conversion()?;
    let request = read_conversion_form(multipart, &state.settings).await?;

    let result = service.convert(&request).await?;

    Ok(audio_response(result))
}
