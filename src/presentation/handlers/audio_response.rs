use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::domain::ConversionResult;

/// Relays converted audio; results are per-job and must not be cached.
pub fn audio_response(result: ConversionResult) -> Response {
    (
        [
            (header::CONTENT_TYPE, result.content_type),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        result.bytes,
    )
        .into_response()
}
