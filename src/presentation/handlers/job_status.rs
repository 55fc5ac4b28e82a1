use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::services::JobProgress;
use crate::domain::{EndpointCandidate, JobHandle};
use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

use super::audio_response::audio_response;

#[derive(Debug, Deserialize)]
pub struct JobStatusQuery {
    pub id: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Serialize)]
pub struct JobStatusResponse {
    pub status: String,
}

/// JSON while the job runs, the audio itself once it is done.
#[tracing::instrument(skip(state))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Query(query): Query<JobStatusQuery>,
) -> Result<Response, ApiError> {
    let service = state.conversion()?;

    let id = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing id".to_string()))?;

    let endpoint: EndpointCandidate = match query.endpoint.filter(|e| !e.trim().is_empty()) {
        Some(raw) => raw.parse().map_err(ApiError::BadRequest)?,
        None => service.default_endpoint().cloned().ok_or_else(|| {
            ApiError::Misconfigured("No endpoint candidates configured".to_string())
        })?,
    };

    match service.status(&endpoint, &JobHandle::new(id)).await? {
        JobProgress::Pending { stage } => {
            Ok(Json(JobStatusResponse { status: stage }).into_response())
        }
        JobProgress::Ready(result) => Ok(audio_response(result)),
    }
}
