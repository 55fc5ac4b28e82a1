use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::application::ports::{ApiDescription, SpaceClient, SpaceError};
use crate::domain::{
    AudioArtifact, AudioUpload, ConversionResult, EndpointCandidate, JobHandle, JobState,
    UploadedFile,
};

type AcceptFn = dyn Fn(&EndpointCandidate, &[Value]) -> bool + Send + Sync;

struct MockJob {
    file_path: Option<String>,
    polls: usize,
}

/// In-process Space that echoes the uploaded audio back as the result.
///
/// Used for scaffold mode and as a test double: it counts every call and can be
/// told which submissions to accept and how many polls stay pending.
pub struct MockSpaceClient {
    accept: Box<AcceptFn>,
    pending_polls: usize,
    response_delay: Duration,
    files: Mutex<HashMap<String, (Bytes, String)>>,
    jobs: Mutex<HashMap<String, MockJob>>,
    submissions: Mutex<Vec<(EndpointCandidate, usize)>>,
    upload_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl Default for MockSpaceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSpaceClient {
    pub fn new() -> Self {
        Self {
            accept: Box::new(|_, _| true),
            pending_polls: 0,
            response_delay: Duration::ZERO,
            files: Mutex::new(HashMap::new()),
            jobs: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            upload_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
        }
    }

    /// Only submissions for which `accept(endpoint, payload)` holds get a handle.
    pub fn accepting<F>(mut self, accept: F) -> Self
    where
        F: Fn(&EndpointCandidate, &[Value]) -> bool + Send + Sync + 'static,
    {
        self.accept = Box::new(accept);
        self
    }

    pub fn with_pending_polls(mut self, polls: usize) -> Self {
        self.pending_polls = polls;
        self
    }

    pub fn with_response_delay(mut self, delay: Duration) -> Self {
        self.response_delay = delay;
        self
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn submit_calls(&self) -> usize {
        self.submissions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Every submission as (endpoint, payload length), in call order.
    pub fn submissions(&self) -> Vec<(EndpointCandidate, usize)> {
        self.submissions
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Total network-equivalent calls made so far.
    pub fn total_calls(&self) -> usize {
        self.upload_calls() + self.submit_calls() + self.status_calls()
    }

    async fn delay(&self) {
        if !self.response_delay.is_zero() {
            tokio::time::sleep(self.response_delay).await;
        }
    }
}

fn poisoned<T>(_: T) -> SpaceError {
    SpaceError::RequestFailed("mock state poisoned".to_string())
}

#[async_trait]
impl SpaceClient for MockSpaceClient {
    async fn upload(&self, audio: &AudioUpload) -> Result<UploadedFile, SpaceError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;

        let path = format!("/tmp/mock/{}/{}", Uuid::new_v4().simple(), audio.file_name);
        self.files.lock().map_err(poisoned)?.insert(
            path.clone(),
            (audio.bytes.clone(), audio.content_type.clone()),
        );

        Ok(UploadedFile {
            path,
            orig_name: audio.file_name.clone(),
            mime_type: audio.content_type.clone(),
            size: audio.len() as u64,
        })
    }

    async fn submit(
        &self,
        endpoint: &EndpointCandidate,
        payload: &[Value],
    ) -> Result<JobHandle, SpaceError> {
        self.submissions
            .lock()
            .map_err(poisoned)?
            .push((endpoint.clone(), payload.len()));

        if !(self.accept)(endpoint, payload) {
            return Err(SpaceError::Rejected {
                status: 422,
                body: format!("{} does not accept {} arguments", endpoint, payload.len()),
            });
        }

        let file_path = payload
            .first()
            .and_then(|audio| audio.get("path"))
            .and_then(Value::as_str)
            .map(String::from);

        let handle = Uuid::new_v4().simple().to_string();
        self.jobs
            .lock()
            .map_err(poisoned)?
            .insert(handle.clone(), MockJob { file_path, polls: 0 });

        Ok(JobHandle::new(handle))
    }

    async fn status(
        &self,
        _endpoint: &EndpointCandidate,
        handle: &JobHandle,
    ) -> Result<JobState, SpaceError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;

        let mut jobs = self.jobs.lock().map_err(poisoned)?;
        let job = jobs
            .get_mut(handle.as_str())
            .ok_or_else(|| SpaceError::JobNotFound(handle.to_string()))?;

        job.polls += 1;
        if job.polls <= self.pending_polls {
            return Ok(JobState::Pending {
                stage: "PROCESSING".to_string(),
            });
        }

        let output = match &job.file_path {
            Some(path) => vec![json!({ "path": path })],
            None => Vec::new(),
        };
        Ok(JobState::Complete { output })
    }

    async fn fetch_artifact(
        &self,
        artifact: &AudioArtifact,
    ) -> Result<ConversionResult, SpaceError> {
        let path = artifact
            .path
            .as_deref()
            .ok_or_else(|| SpaceError::DownloadFailed("artifact has no path".to_string()))?;

        let files = self.files.lock().map_err(poisoned)?;
        let (bytes, mime) = files
            .get(path)
            .ok_or_else(|| SpaceError::DownloadFailed(format!("no such file: {}", path)))?;

        Ok(ConversionResult::new(bytes.clone(), Some(mime.as_str())))
    }

    async fn describe_api(&self) -> Result<ApiDescription, SpaceError> {
        Ok(ApiDescription {
            named_endpoints: vec!["/predict".to_string()],
            unnamed_endpoints: vec!["0".to_string()],
        })
    }
}
