use std::sync::Arc;

use crate::application::ports::SpaceClient;
use crate::application::services::ConversionService;
use crate::presentation::config::Settings;
use crate::presentation::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    /// Absent when no Space is configured; conversion routes then answer 500.
    pub conversion_service: Option<Arc<ConversionService>>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn with_space(settings: Settings, space: Arc<dyn SpaceClient>) -> Self {
        let service = ConversionService::new(
            space,
            settings.endpoint_candidates(),
            settings.poll_policy(),
        );
        Self {
            conversion_service: Some(Arc::new(service)),
            settings: Arc::new(settings),
        }
    }

    pub fn unconfigured(settings: Settings) -> Self {
        Self {
            conversion_service: None,
            settings: Arc::new(settings),
        }
    }

    pub fn conversion(&self) -> Result<&ConversionService, ApiError> {
        self.conversion_service.as_deref().ok_or_else(|| {
            ApiError::Misconfigured("Server misconfigured: HF_SPACE is not set".to_string())
        })
    }
}
