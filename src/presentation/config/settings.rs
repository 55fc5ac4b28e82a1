use std::env;

use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use serde::{Deserialize, Serialize};

use crate::application::services::{DEFAULT_MAX_POLL_ATTEMPTS, PollPolicy};
use crate::domain::{
    ConversionParams, DEFAULT_PITCH, DEFAULT_REMOVE_HISS, DEFAULT_SPEED, EndpointCandidate,
};

use super::Environment;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub space: SpaceSettings,
    pub conversion: ConversionSettings,
    pub polling: PollingSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceSettings {
    /// `owner/name` or a full base URL. Required to serve conversions.
    pub space_id: Option<String>,
    pub token: Option<String>,
    /// Tried before every conventional endpoint name.
    pub endpoint_override: Option<String>,
    pub conventional_endpoints: Vec<String>,
    /// Function indexes `0..fn_index_count` are tried last.
    pub fn_index_count: u32,
    pub api_prefix: String,
    pub request_timeout_secs: u64,
    /// How long one status check listens for completion before reporting pending.
    pub status_wait_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionSettings {
    pub default_pitch: i32,
    pub default_speed: f64,
    pub default_remove_hiss: bool,
    pub max_pitch_semitones: i32,
    pub min_speed: f64,
    pub max_speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingSettings {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 3000,
                max_upload_mb: 20,
            },
            space: SpaceSettings {
                space_id: None,
                token: None,
                endpoint_override: None,
                conventional_endpoints: ["/predict", "/convert", "/process", "/run"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                fn_index_count: 4,
                api_prefix: "/gradio_api".to_string(),
                request_timeout_secs: 55,
                status_wait_ms: 1500,
            },
            conversion: ConversionSettings {
                default_pitch: DEFAULT_PITCH,
                default_speed: DEFAULT_SPEED,
                default_remove_hiss: DEFAULT_REMOVE_HISS,
                max_pitch_semitones: 24,
                min_speed: 0.5,
                max_speed: 2.0,
            },
            polling: PollingSettings {
                interval_ms: 2000,
                max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            },
            logging: LoggingSettings {
                level: String::new(),
                enable_json: false,
            },
        }
    }
}

impl Settings {
    /// Layers defaults, `appsettings.<env>` files, `APP__*` variables and the
    /// conventional `HF_*` / `SERVER_PORT` variables, last one wins.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let conventional = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());

        Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("space.space_id", conventional("HF_SPACE"))?
            .set_override_option("space.token", conventional("HF_TOKEN"))?
            .set_override_option("space.endpoint_override", conventional("HF_ENDPOINT"))?
            .set_override_option("server.port", conventional("SERVER_PORT"))?
            .build()?
            .try_deserialize()
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_mb * 1024 * 1024
    }

    pub fn endpoint_candidates(&self) -> Vec<EndpointCandidate> {
        EndpointCandidate::ordered(
            self.space.endpoint_override.as_deref(),
            &self.space.conventional_endpoints,
            self.space.fn_index_count,
        )
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: std::time::Duration::from_millis(self.polling.interval_ms),
            max_attempts: self.polling.max_attempts,
        }
    }

    pub fn default_params(&self) -> ConversionParams {
        ConversionParams {
            pitch: self.conversion.default_pitch,
            speed: self.conversion.default_speed,
            remove_hiss: self.conversion.default_remove_hiss,
        }
    }

    pub fn is_space_configured(&self) -> bool {
        self.space
            .space_id
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}
