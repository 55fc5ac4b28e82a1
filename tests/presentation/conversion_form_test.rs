use axum::body::Body;
use axum::extract::{FromRequest, Multipart};
use axum::http::{Request, StatusCode};

use parrot_relay::presentation::Settings;
use parrot_relay::presentation::handlers::{
    parse_flag, parse_pitch, parse_speed, read_conversion_form,
};

const BOUNDARY: &str = "formtestboundary";

async fn multipart(body: &str) -> Multipart {
    let request = Request::builder()
        .method("POST")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body.replace('\n', "\r\n")))
        .unwrap();
    Multipart::from_request(request, &()).await.unwrap()
}

#[test]
fn given_blank_fields_when_parsing_then_falls_back_to_defaults() {
    let settings = Settings::default();

    assert_eq!(parse_pitch("", &settings).unwrap(), None);
    assert_eq!(parse_speed("   ", &settings).unwrap(), None);
    assert_eq!(parse_flag("").unwrap(), None);
}

#[test]
fn given_pitch_when_parsing_then_rounds_to_semitones_within_bounds() {
    let settings = Settings::default();

    assert_eq!(parse_pitch("-12", &settings).unwrap(), Some(-12));
    assert_eq!(parse_pitch("3.6", &settings).unwrap(), Some(4));
    assert_eq!(parse_pitch("24", &settings).unwrap(), Some(24));
    assert_eq!(
        parse_pitch("25", &settings).unwrap_err().status(),
        StatusCode::BAD_REQUEST
    );
    assert!(parse_pitch("high", &settings).is_err());
}

#[test]
fn given_speed_when_parsing_then_enforces_configured_range() {
    let settings = Settings::default();

    assert_eq!(parse_speed("0.5", &settings).unwrap(), Some(0.5));
    assert_eq!(parse_speed("2", &settings).unwrap(), Some(2.0));
    assert!(parse_speed("0.49", &settings).is_err());
    assert!(parse_speed("NaN", &settings).is_err());
    assert!(parse_speed("inf", &settings).is_err());
}

#[test]
fn given_checkbox_values_when_parsing_flag_then_accepts_common_spellings() {
    for raw in ["true", "on", "1", "YES"] {
        assert_eq!(parse_flag(raw).unwrap(), Some(true), "{}", raw);
    }
    for raw in ["false", "off", "0", "no"] {
        assert_eq!(parse_flag(raw).unwrap(), Some(false), "{}", raw);
    }
    assert!(parse_flag("maybe").is_err());
}

#[tokio::test]
async fn given_full_form_when_reading_then_collects_audio_and_params() {
    let body = format!(
        "--{b}\nContent-Disposition: form-data; name=\"pitch\"\n\n-4\n\
         --{b}\nContent-Disposition: form-data; name=\"audio\"; filename=\"clip.ogg\"\nContent-Type: audio/ogg\n\nOggS data\n\
         --{b}\nContent-Disposition: form-data; name=\"remove_hiss\"\n\noff\n\
         --{b}\nContent-Disposition: form-data; name=\"comment\"\n\nignored\n\
         --{b}--\n",
        b = BOUNDARY
    );

    let request = read_conversion_form(multipart(&body).await, &Settings::default())
        .await
        .unwrap();

    assert_eq!(request.audio.file_name, "clip.ogg");
    assert_eq!(request.audio.content_type, "audio/ogg");
    assert_eq!(&request.audio.bytes[..], b"OggS data");
    assert_eq!(request.params.pitch, -4);
    assert_eq!(request.params.speed, 1.05);
    assert!(!request.params.remove_hiss);
}

#[tokio::test]
async fn given_empty_audio_file_when_reading_then_rejects_it() {
    let body = format!(
        "--{b}\nContent-Disposition: form-data; name=\"audio\"; filename=\"empty.wav\"\nContent-Type: audio/wav\n\n\n--{b}--\n",
        b = BOUNDARY
    );

    let error = read_conversion_form(multipart(&body).await, &Settings::default())
        .await
        .unwrap_err();

    assert_eq!(error.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error.to_string(), "Audio file is empty");
}

#[tokio::test]
async fn given_audio_over_cap_when_reading_then_payload_too_large() {
    let mut settings = Settings::default();
    settings.server.max_upload_mb = 1;
    let big = "a".repeat(1024 * 1024 + 10);
    let body = format!(
        "--{b}\nContent-Disposition: form-data; name=\"audio\"; filename=\"big.wav\"\nContent-Type: audio/wav\n\n{big}\n--{b}--\n",
        b = BOUNDARY,
        big = big
    );

    let error = read_conversion_form(multipart(&body).await, &settings)
        .await
        .unwrap_err();

    assert_eq!(error.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error.to_string(), "Audio file is larger than 1 MB");
}
