use parrot_relay::domain::AudioArtifact;
use serde_json::json;

#[test]
fn given_file_object_when_reading_output_then_keeps_url_path_and_mime() {
    let output = vec![json!({
        "path": "/tmp/gradio/out.wav",
        "url": "https://owner-space.hf.space/gradio_api/file=/tmp/gradio/out.wav",
        "mime_type": "audio/wav"
    })];

    let artifact = AudioArtifact::from_output(&output).unwrap();

    assert_eq!(artifact.path.as_deref(), Some("/tmp/gradio/out.wav"));
    assert!(artifact.url.unwrap().starts_with("https://"));
    assert_eq!(artifact.mime_type.as_deref(), Some("audio/wav"));
}

#[test]
fn given_leading_non_file_entries_when_reading_output_then_skips_to_first_file() {
    let output = vec![json!(null), json!(42), json!({ "name": "/tmp/out.mp3" })];

    let artifact = AudioArtifact::from_output(&output).unwrap();

    assert_eq!(artifact.path.as_deref(), Some("/tmp/out.mp3"));
    assert_eq!(artifact.url, None);
}

#[test]
fn given_plain_strings_when_reading_output_then_classifies_url_or_path() {
    let url = AudioArtifact::from_output(&[json!("https://cdn.example/out.wav")]).unwrap();
    let path = AudioArtifact::from_output(&[json!("/tmp/out.wav")]).unwrap();

    assert_eq!(url.url.as_deref(), Some("https://cdn.example/out.wav"));
    assert_eq!(path.path.as_deref(), Some("/tmp/out.wav"));
}

#[test]
fn given_output_without_files_then_returns_none() {
    assert!(AudioArtifact::from_output(&[]).is_none());
    assert!(AudioArtifact::from_output(&[json!(""), json!({ "label": "done" })]).is_none());
}
