use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::presentation::error::ApiError;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct ApiDebugResponse {
    /// Unique endpoints the Space advertises.
    pub candidates: Vec<String>,
    /// Order this server tries endpoints in.
    pub configured_order: Vec<String>,
    pub named_endpoint_count: usize,
    pub unnamed_endpoint_count: usize,
    pub hint: String,
}

#[tracing::instrument(skip(state))]
pub async fn api_debug_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiDebugResponse>, ApiError> {
    let service = state.conversion()?;
    let description = service.describe_api().await?;

    Ok(Json(ApiDebugResponse {
        candidates: description.candidates(),
        configured_order: service
            .candidates()
            .iter()
            .map(ToString::to_string)
            .collect(),
        named_endpoint_count: description.named_endpoints.len(),
        unnamed_endpoint_count: description.unnamed_endpoints.len(),
        hint: "Set HF_ENDPOINT to one of the candidates and restart.".to_string(),
    }))
}
