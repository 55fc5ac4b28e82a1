use axum::extract::Multipart;
use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use bytes::BytesMut;

use crate::domain::{AudioUpload, ConversionRequest};
use crate::presentation::config::Settings;
use crate::presentation::error::ApiError;

const DEFAULT_AUDIO_NAME: &str = "audio.webm";

/// Reads the `audio` file and the optional `pitch`, `speed` and `remove_hiss`
/// fields. Blank values fall back to the configured defaults. The audio is
/// rejected as soon as it grows past the upload cap.
pub async fn read_conversion_form(
    mut multipart: Multipart,
    settings: &Settings,
) -> Result<ConversionRequest, ApiError> {
    let mut audio: Option<AudioUpload> = None;
    let mut params = settings.default_params();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => {
                audio = Some(read_audio(field, settings).await?);
            }
            "pitch" => {
                if let Some(pitch) = parse_pitch(&field_text(field).await?, settings)? {
                    params.pitch = pitch;
                }
            }
            "speed" => {
                if let Some(speed) = parse_speed(&field_text(field).await?, settings)? {
                    params.speed = speed;
                }
            }
            "remove_hiss" => {
                if let Some(flag) = parse_flag(&field_text(field).await?)? {
                    params.remove_hiss = flag;
                }
            }
            _ => tracing::debug!(field = %name, "Ignoring unknown form field"),
        }
    }

    let audio = audio.ok_or_else(|| ApiError::BadRequest("No audio file".to_string()))?;
    if audio.is_empty() {
        return Err(ApiError::BadRequest("Audio file is empty".to_string()));
    }

    tracing::debug!(
        file = %audio.file_name,
        content_type = %audio.content_type,
        bytes = audio.len(),
        pitch = params.pitch,
        speed = params.speed,
        remove_hiss = params.remove_hiss,
        "Conversion form accepted"
    );

    Ok(ConversionRequest::new(audio, params))
}

async fn read_audio(mut field: Field<'_>, settings: &Settings) -> Result<AudioUpload, ApiError> {
    let max_bytes = settings.max_upload_bytes();
    let file_name = field
        .file_name()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(DEFAULT_AUDIO_NAME)
        .to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let mut buffer = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if buffer.len() + chunk.len() > max_bytes {
            return Err(too_large(settings));
        }
        buffer.extend_from_slice(&chunk);
    }

    Ok(AudioUpload::new(file_name, content_type, buffer.freeze()))
}

async fn field_text(field: Field<'_>) -> Result<String, ApiError> {
    field.text().await.map_err(multipart_error)
}

fn too_large(settings: &Settings) -> ApiError {
    ApiError::PayloadTooLarge(format!(
        "Audio file is larger than {} MB",
        settings.server.max_upload_mb
    ))
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Request body is too large".to_string())
    } else {
        ApiError::BadRequest(format!("Failed to read multipart: {}", e.body_text()))
    }
}

fn parse_number(raw: &str, field: &str) -> Result<Option<f64>, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(ApiError::BadRequest(format!("Invalid {}: {}", field, trimmed))),
    }
}

pub fn parse_pitch(raw: &str, settings: &Settings) -> Result<Option<i32>, ApiError> {
    let Some(value) = parse_number(raw, "pitch")? else {
        return Ok(None);
    };
    let limit = settings.conversion.max_pitch_semitones;
    let semitones = value.round();
    if semitones.abs() > f64::from(limit) {
        return Err(ApiError::BadRequest(format!(
            "pitch must be between -{} and {} semitones",
            limit, limit
        )));
    }
    Ok(Some(semitones as i32))
}

pub fn parse_speed(raw: &str, settings: &Settings) -> Result<Option<f64>, ApiError> {
    let Some(value) = parse_number(raw, "speed")? else {
        return Ok(None);
    };
    let (min, max) = (settings.conversion.min_speed, settings.conversion.max_speed);
    if value < min || value > max {
        return Err(ApiError::BadRequest(format!(
            "speed must be between {} and {}",
            min, max
        )));
    }
    Ok(Some(value))
}

pub fn parse_flag(raw: &str) -> Result<Option<bool>, ApiError> {
    match raw.trim().to_lowercase().as_str() {
        "" => Ok(None),
        "true" | "1" | "on" | "yes" => Ok(Some(true)),
        "false" | "0" | "off" | "no" => Ok(Some(false)),
        other => Err(ApiError::BadRequest(format!("Invalid remove_hiss: {}", other))),
    }
}
