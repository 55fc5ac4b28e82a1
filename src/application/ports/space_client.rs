use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{
    AudioArtifact, AudioUpload, ConversionResult, EndpointCandidate, JobHandle, JobState,
    UploadedFile,
};

/// Endpoints a Space advertises about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiDescription {
    pub named_endpoints: Vec<String>,
    pub unnamed_endpoints: Vec<String>,
}

impl ApiDescription {
    /// Named routes then indexes, without duplicates.
    pub fn candidates(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for name in self.named_endpoints.iter().chain(&self.unnamed_endpoints) {
            if !out.contains(name) {
                out.push(name.clone());
            }
        }
        out
    }
}

/// Remote job service performing the actual voice conversion.
#[async_trait]
pub trait SpaceClient: Send + Sync {
    async fn upload(&self, audio: &AudioUpload) -> Result<UploadedFile, SpaceError>;

    /// Returns a handle only when the Space accepted the call.
    async fn submit(
        &self,
        endpoint: &EndpointCandidate,
        payload: &[Value],
    ) -> Result<JobHandle, SpaceError>;

    async fn status(
        &self,
        endpoint: &EndpointCandidate,
        handle: &JobHandle,
    ) -> Result<JobState, SpaceError>;

    async fn fetch_artifact(
        &self,
        artifact: &AudioArtifact,
    ) -> Result<ConversionResult, SpaceError>;

    async fn describe_api(&self) -> Result<ApiDescription, SpaceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SpaceError {
    #[error("invalid space id: {0}")]
    InvalidSpaceId(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("call rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("job not found: {0}")]
    JobNotFound(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
}
