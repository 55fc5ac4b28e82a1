use std::time::Duration;

use parrot_relay::domain::EndpointCandidate;
use parrot_relay::presentation::{Environment, Settings};

#[test]
fn given_default_settings_then_documented_limits_apply() {
    let settings = Settings::default();

    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.max_upload_bytes(), 20 * 1024 * 1024);
    assert_eq!(settings.poll_policy().interval, Duration::from_secs(2));
    assert_eq!(settings.poll_policy().max_attempts, 90);
    assert_eq!(settings.default_params().pitch, 7);
    assert_eq!(settings.default_params().speed, 1.05);
    assert!(settings.default_params().remove_hiss);
    assert!(!settings.is_space_configured());
}

#[test]
fn given_default_settings_then_candidates_are_conventional_names_then_indexes() {
    let candidates: Vec<String> = Settings::default()
        .endpoint_candidates()
        .iter()
        .map(ToString::to_string)
        .collect();

    assert_eq!(
        candidates,
        vec!["/predict", "/convert", "/process", "/run", "0", "1", "2", "3"]
    );
}

#[test]
fn given_endpoint_override_then_it_is_tried_first() {
    let mut settings = Settings::default();
    settings.space.endpoint_override = Some("/process".to_string());

    let candidates = settings.endpoint_candidates();

    assert_eq!(candidates[0], EndpointCandidate::named("/process"));
    assert_eq!(candidates.len(), 8);
}

#[test]
fn given_blank_space_id_then_space_is_not_configured() {
    let mut settings = Settings::default();
    settings.space.space_id = Some("  ".to_string());
    assert!(!settings.is_space_configured());

    settings.space.space_id = Some("owner/parrot".to_string());
    assert!(settings.is_space_configured());
}

#[test]
fn given_environment_names_when_parsing_then_maps_aliases() {
    assert_eq!("production".parse::<Environment>(), Ok(Environment::Prod));
    assert_eq!("Local".parse::<Environment>(), Ok(Environment::Local));
    assert_eq!(Environment::Test.settings_file(), "appsettings.test");
    assert!("staging".parse::<Environment>().is_err());
}
