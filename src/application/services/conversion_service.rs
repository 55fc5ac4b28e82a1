use std::sync::Arc;

use crate::application::ports::{ApiDescription, SpaceClient, SpaceError};
use crate::domain::{
    AudioArtifact, ConversionRequest, ConversionResult, EndpointCandidate, JobHandle, JobState,
    PayloadShape,
};

use super::endpoint_discovery::{DiscoveryError, discover};
use super::status_poller::{JobProgress, PollError, PollPolicy, StatusPoller};

/// A job the Space has accepted and that can be polled.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedJob {
    pub handle: JobHandle,
    pub endpoint: EndpointCandidate,
    pub shape: PayloadShape,
    pub failed_attempts: usize,
}

pub struct ConversionService {
    space: Arc<dyn SpaceClient>,
    candidates: Vec<EndpointCandidate>,
    shapes: Vec<PayloadShape>,
    poller: StatusPoller,
}

impl ConversionService {
    pub fn new(
        space: Arc<dyn SpaceClient>,
        candidates: Vec<EndpointCandidate>,
        poll_policy: PollPolicy,
    ) -> Self {
        Self {
            space,
            candidates,
            shapes: PayloadShape::ALL.to_vec(),
            poller: StatusPoller::new(poll_policy),
        }
    }

    pub fn with_payload_shapes(mut self, shapes: Vec<PayloadShape>) -> Self {
        self.shapes = shapes;
        self
    }

    pub fn candidates(&self) -> &[EndpointCandidate] {
        &self.candidates
    }

    /// Endpoint assumed for status checks that do not name one.
    pub fn default_endpoint(&self) -> Option<&EndpointCandidate> {
        self.candidates.first()
    }

    /// Uploads the audio and submits it to the first endpoint that accepts it.
    #[tracing::instrument(
        skip(self, request),
        fields(file = %request.audio.file_name, bytes = request.audio.len())
    )]
    pub async fn start(&self, request: &ConversionRequest) -> Result<SubmittedJob, ConversionError> {
        let file = self
            .space
            .upload(&request.audio)
            .await
            .map_err(ConversionError::Upload)?;

        tracing::debug!(path = %file.path, "Audio uploaded to space");

        let audio = file.as_payload();
        let params = request.params;
        let space = &self.space;

        let discovery = discover(&self.candidates, &self.shapes, |endpoint, shape| {
            let payload = shape.build(&audio, &params);
            async move { space.submit(&endpoint, &payload).await }
        })
        .await?;

        tracing::info!(
            job_id = %discovery.value,
            endpoint = %discovery.endpoint,
            shape = %discovery.shape,
            "Conversion job submitted"
        );

        Ok(SubmittedJob {
            handle: discovery.value,
            endpoint: discovery.endpoint,
            shape: discovery.shape,
            failed_attempts: discovery.failed_attempts,
        })
    }

    /// Single status check; downloads the audio once the job is complete.
    #[tracing::instrument(skip(self))]
    pub async fn status(
        &self,
        endpoint: &EndpointCandidate,
        handle: &JobHandle,
    ) -> Result<JobProgress, ConversionError> {
        let state = match self.space.status(endpoint, handle).await {
            Ok(state) => state,
            Err(SpaceError::JobNotFound(id)) => return Err(ConversionError::JobNotFound(id)),
            Err(e) => return Err(ConversionError::Status(e)),
        };

        match state {
            JobState::Pending { stage } => Ok(JobProgress::Pending { stage }),
            JobState::Failed { message } => Err(ConversionError::JobFailed(message)),
            JobState::Complete { output } => {
                let artifact =
                    AudioArtifact::from_output(&output).ok_or(ConversionError::NoAudio)?;
                let result = self
                    .space
                    .fetch_artifact(&artifact)
                    .await
                    .map_err(ConversionError::Fetch)?;

                tracing::info!(
                    bytes = result.bytes.len(),
                    content_type = %result.content_type,
                    "Converted audio fetched"
                );

                Ok(JobProgress::Ready(result))
            }
        }
    }

    /// Submits and waits server-side until the audio is ready.
    pub async fn convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResult, ConversionError> {
        let job = self.start(request).await?;

        let polled = self
            .poller
            .wait_for(|_| self.status(&job.endpoint, &job.handle))
            .await
            .map_err(|e| match e {
                PollError::TimedOut { attempts } => ConversionError::TimedOut { attempts },
                PollError::Failed(inner) => inner,
            })?;

        Ok(polled.result)
    }

    pub async fn describe_api(&self) -> Result<ApiDescription, ConversionError> {
        self.space
            .describe_api()
            .await
            .map_err(ConversionError::Describe)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("upload failed: {0}")]
    Upload(SpaceError),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error("status check failed: {0}")]
    Status(SpaceError),
    #[error("job not found: {0}")]
    JobNotFound(String),
    #[error("conversion failed: {0}")]
    JobFailed(String),
    #[error("no audio in result")]
    NoAudio,
    #[error("download failed: {0}")]
    Fetch(SpaceError),
    #[error(
        "conversion did not finish after {attempts} status checks; try again with a shorter recording"
    )]
    TimedOut { attempts: u32 },
    #[error("api description failed: {0}")]
    Describe(SpaceError),
}
