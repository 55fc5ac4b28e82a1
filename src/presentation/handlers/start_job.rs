use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::domain::PENDING_STAGE;
use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

use super::conversion_form::read_conversion_form;

#[derive(Serialize)]
pub struct StartJobResponse {
    pub job_id: String,
    pub endpoint: String,
    pub payload_shape: String,
    pub status: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn start_job_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let service = state.conversion()?;
    let request = read_conversion_form(multipart, &state.settings).await?;

    let job = service.start(&request).await?;

    tracing::info!(
        job_id = %job.handle,
        endpoint = %job.endpoint,
        failed_attempts = job.failed_attempts,
        "Conversion job started"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(StartJobResponse {
            job_id: job.handle.to_string(),
            endpoint: job.endpoint.to_string(),
            payload_shape: job.shape.to_string(),
            status: PENDING_STAGE.to_string(),
        }),
    ))
}
