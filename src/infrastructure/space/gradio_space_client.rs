use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::StreamExt;
use reqwest::{Client, RequestBuilder, Response, StatusCode, multipart};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::application::ports::{ApiDescription, SpaceClient, SpaceError};
use crate::domain::{
    AudioArtifact, AudioUpload, ConversionResult, EndpointCandidate, JobHandle, JobState,
    RawJobHandle, UploadedFile,
};
use crate::infrastructure::observability::sanitize_detail;
use crate::presentation::config::SpaceSettings;

use super::space_url::resolve_space_url;
use super::sse::{SseDecoder, SseEvent};

/// Upper bound on event streams kept open at once.
const MAX_WATCHED_JOBS: usize = 256;

type EventInterpreter = fn(&SseEvent) -> Option<JobState>;

/// A job's event stream, read in the background so the Space keeps the job
/// alive between status checks.
struct JobWatch {
    state: watch::Receiver<JobState>,
    reader: JoinHandle<()>,
    opened_at: Instant,
}

impl Drop for JobWatch {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Talks to a Gradio-style Space over its REST and event-stream API.
pub struct GradioSpaceClient {
    client: Client,
    /// No overall timeout: event streams stay open for the whole job.
    stream_client: Client,
    space_root: String,
    base_url: String,
    token: Option<String>,
    status_wait: Duration,
    watches: Mutex<HashMap<String, JobWatch>>,
}

#[derive(Serialize)]
struct CallRequest<'a> {
    data: &'a [Value],
}

#[derive(Serialize)]
struct QueueJoinRequest<'a> {
    data: &'a [Value],
    fn_index: u32,
    session_hash: &'a str,
    event_data: Option<Value>,
    trigger_id: Option<u32>,
}

impl GradioSpaceClient {
    pub fn new(
        space: &str,
        api_prefix: &str,
        token: Option<String>,
        request_timeout: Duration,
        status_wait: Duration,
    ) -> Result<Self, SpaceError> {
        let root = resolve_space_url(space)?;
        let prefix = api_prefix.trim().trim_end_matches('/');
        let base_url = if prefix.is_empty() {
            root.clone()
        } else if prefix.starts_with('/') {
            format!("{}{}", root, prefix)
        } else {
            format!("{}/{}", root, prefix)
        };

        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| SpaceError::RequestFailed(format!("client: {}", e)))?;
        let stream_client = Client::builder()
            .connect_timeout(request_timeout)
            .build()
            .map_err(|e| SpaceError::RequestFailed(format!("client: {}", e)))?;

        Ok(Self {
            client,
            stream_client,
            space_root: root,
            base_url,
            token: token.filter(|t| !t.trim().is_empty()),
            status_wait,
            watches: Mutex::new(HashMap::new()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Whether `url` points at this Space, so the token may travel with it.
    fn is_space_url(&self, url: &str) -> bool {
        url.strip_prefix(&self.space_root)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, SpaceError> {
        Self::dispatch(self.authorize(request)).await
    }

    async fn dispatch(request: RequestBuilder) -> Result<Response, SpaceError> {
        request
            .send()
            .await
            .map_err(|e| SpaceError::RequestFailed(sanitize_detail(&e.to_string())))
    }

    async fn rejected(response: Response) -> SpaceError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        SpaceError::Rejected {
            status,
            body: sanitize_detail(&body),
        }
    }

    async fn submit_named(&self, name: &str, payload: &[Value]) -> Result<JobHandle, SpaceError> {
        let response = self
            .send(
                self.client
                    .post(self.url(&format!("/call/{}", name)))
                    .json(&CallRequest { data: payload }),
            )
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let raw: RawJobHandle = response
            .json()
            .await
            .map_err(|e| SpaceError::InvalidResponse(e.to_string()))?;

        JobHandle::normalize(raw)
            .ok_or_else(|| SpaceError::InvalidResponse("no job id in response".to_string()))
    }

    async fn submit_indexed(
        &self,
        fn_index: u32,
        payload: &[Value],
    ) -> Result<JobHandle, SpaceError> {
        let session_hash = Uuid::new_v4().simple().to_string();

        let response = self
            .send(
                self.client
                    .post(self.url("/queue/join"))
                    .json(&QueueJoinRequest {
                        data: payload,
                        fn_index,
                        session_hash: &session_hash,
                        event_data: None,
                        trigger_id: None,
                    }),
            )
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let raw: RawJobHandle = response
            .json()
            .await
            .map_err(|e| SpaceError::InvalidResponse(e.to_string()))?;

        if JobHandle::normalize(raw).is_none() {
            return Err(SpaceError::InvalidResponse(
                "no event id in queue response".to_string(),
            ));
        }

        // queue status is streamed per session, not per event
        Ok(JobHandle::new(session_hash))
    }

    fn lock_watches(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, JobWatch>>, SpaceError> {
        self.watches
            .lock()
            .map_err(|_| SpaceError::RequestFailed("job watch state poisoned".to_string()))
    }

    /// Receiver for a live reader of this job's events, if one is still running
    /// or has already seen the terminal state.
    fn existing_watch(
        &self,
        handle: &JobHandle,
    ) -> Result<Option<watch::Receiver<JobState>>, SpaceError> {
        let mut watches = self.lock_watches()?;
        let Some(existing) = watches.get(handle.as_str()) else {
            return Ok(None);
        };
        if existing.reader.is_finished() && !existing.state.borrow().is_terminal() {
            // stream closed before the job ended; reconnect on this check
            watches.remove(handle.as_str());
            return Ok(None);
        }
        Ok(Some(existing.state.clone()))
    }

    fn start_watch(
        &self,
        handle: &JobHandle,
        response: Response,
        interpret: EventInterpreter,
    ) -> Result<watch::Receiver<JobState>, SpaceError> {
        let (sender, receiver) = watch::channel(JobState::pending());
        let job_id = handle.to_string();
        let reader = tokio::spawn(read_events(job_id.clone(), response, interpret, sender));

        let mut watches = self.lock_watches()?;
        watches.retain(|_, w| !w.reader.is_finished() || w.state.borrow().is_terminal());
        if watches.len() >= MAX_WATCHED_JOBS {
            let oldest = watches
                .iter()
                .min_by_key(|(_, w)| w.opened_at)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                tracing::warn!(job_id = %oldest, "Too many open job streams, dropping oldest");
                watches.remove(&oldest);
            }
        }
        watches.insert(
            job_id,
            JobWatch {
                state: receiver.clone(),
                reader,
                opened_at: Instant::now(),
            },
        );

        Ok(receiver)
    }

    /// Waits up to the status window for a terminal state and reports the
    /// latest one. Terminal jobs are forgotten once reported.
    async fn watched_status(
        &self,
        handle: &JobHandle,
        request: RequestBuilder,
        interpret: EventInterpreter,
    ) -> Result<JobState, SpaceError> {
        let mut receiver = match self.existing_watch(handle)? {
            Some(receiver) => receiver,
            None => {
                let response = self.open_status_stream(request, handle).await?;
                self.start_watch(handle, response, interpret)?
            }
        };

        let _ = tokio::time::timeout(self.status_wait, async {
            receiver.wait_for(JobState::is_terminal).await.is_ok()
        })
        .await;

        let state = receiver.borrow().clone();
        if state.is_terminal() {
            self.lock_watches()?.remove(handle.as_str());
        }
        Ok(state)
    }

    async fn open_status_stream(
        &self,
        request: RequestBuilder,
        handle: &JobHandle,
    ) -> Result<Response, SpaceError> {
        let response = self
            .send(request.header(reqwest::header::ACCEPT, "text/event-stream"))
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(SpaceError::JobNotFound(handle.to_string())),
            status if !status.is_success() => Err(SpaceError::RequestFailed(format!(
                "status stream returned {}",
                status
            ))),
            _ => Ok(response),
        }
    }

    fn artifact_url(&self, artifact: &AudioArtifact) -> Option<String> {
        artifact
            .url
            .clone()
            .or_else(|| artifact.path.as_ref().map(|p| self.url(&format!("/file={}", p))))
    }
}

/// Publishes every state seen on the stream until a terminal one arrives or the
/// stream ends.
async fn read_events(
    job_id: String,
    response: Response,
    interpret: EventInterpreter,
    state: watch::Sender<JobState>,
) {
    let mut stream = Box::pin(response.bytes_stream());
    let mut decoder = SseDecoder::new();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Job event stream failed");
                return;
            }
        };
        for event in decoder.feed(&chunk) {
            if let Some(next) = interpret(&event) {
                let terminal = next.is_terminal();
                state.send_replace(next);
                if terminal {
                    return;
                }
            }
        }
    }

    if let Some(next) = decoder.finish().and_then(|event| interpret(&event)) {
        state.send_replace(next);
    }
    tracing::debug!(job_id = %job_id, "Job event stream closed");
}

/// Event from the named call stream (`event: complete`, `event: error`, ...).
pub fn call_event_state(event: &SseEvent) -> Option<JobState> {
    match event.event_name()? {
        "complete" => Some(JobState::Complete {
            output: output_values(&event.data),
        }),
        "error" => Some(JobState::Failed {
            message: error_message(&event.data),
        }),
        "generating" => Some(JobState::Pending {
            stage: "PROCESSING".to_string(),
        }),
        _ => None,
    }
}

/// Event from the session queue stream, carried in a `msg` field.
pub fn queue_event_state(event: &SseEvent) -> Option<JobState> {
    let message: Value = serde_json::from_str(&event.data).ok()?;

    match message.get("msg")?.as_str()? {
        "estimation" => Some(JobState::Pending {
            stage: "QUEUED".to_string(),
        }),
        "process_starts" | "process_generating" => Some(JobState::Pending {
            stage: "PROCESSING".to_string(),
        }),
        "process_completed" => {
            let output = message.get("output").cloned().unwrap_or(Value::Null);
            let success = message
                .get("success")
                .and_then(Value::as_bool)
                .unwrap_or(true);
            if success {
                let data = output.get("data").cloned().unwrap_or(Value::Null);
                Some(JobState::Complete {
                    output: into_array(data),
                })
            } else {
                Some(JobState::Failed {
                    message: output
                        .get("error")
                        .and_then(Value::as_str)
                        .unwrap_or("space reported a failure")
                        .to_string(),
                })
            }
        }
        "unexpected_error" => Some(JobState::Failed {
            message: message
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unexpected error")
                .to_string(),
        }),
        _ => None,
    }
}

fn output_values(data: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(data) {
        Ok(value) => into_array(value),
        Err(_) if data.trim().is_empty() => Vec::new(),
        Err(_) => vec![Value::String(data.trim().to_string())],
    }
}

fn into_array(value: Value) -> Vec<Value> {
    match value {
        Value::Array(values) => values,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

fn error_message(data: &str) -> String {
    let trimmed = data.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(s)) if !s.trim().is_empty() => s,
        Ok(Value::Null) | Ok(Value::String(_)) => "space reported an error".to_string(),
        _ if trimmed.is_empty() => "space reported an error".to_string(),
        _ => sanitize_detail(trimmed),
    }
}

fn endpoint_names(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.get("endpoint").and_then(Value::as_str))
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

#[async_trait]
impl SpaceClient for GradioSpaceClient {
    async fn upload(&self, audio: &AudioUpload) -> Result<UploadedFile, SpaceError> {
        // Bytes clones share the buffer
        let file_part = || {
            multipart::Part::stream_with_length(audio.bytes.clone(), audio.len() as u64)
                .file_name(audio.file_name.clone())
        };
        let part = file_part()
            .mime_str(&audio.content_type)
            .or_else(|_| file_part().mime_str("application/octet-stream"))
            .map_err(|e| SpaceError::RequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new().part("files", part);

        tracing::debug!(
            file = %audio.file_name,
            bytes = audio.len(),
            "Uploading audio to space"
        );

        let response = self
            .send(self.client.post(self.url("/upload")).multipart(form))
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected(response).await);
        }

        let paths: Vec<String> = response
            .json()
            .await
            .map_err(|e| SpaceError::InvalidResponse(e.to_string()))?;

        let path = paths
            .into_iter()
            .next()
            .ok_or_else(|| SpaceError::InvalidResponse("upload returned no paths".to_string()))?;

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
        match endpoint {
            EndpointCandidate::Named(_) => {
                let name = endpoint.route_name().unwrap_or_default();
                self.submit_named(name, payload).await
            }
            EndpointCandidate::Index(index) => self.submit_indexed(*index, payload).await,
        }
    }

    async fn status(
        &self,
        endpoint: &EndpointCandidate,
        handle: &JobHandle,
    ) -> Result<JobState, SpaceError> {
        match endpoint {
            EndpointCandidate::Named(_) => {
                let name = endpoint.route_name().unwrap_or_default();
                let request = self
                    .stream_client
                    .get(self.url(&format!("/call/{}/{}", name, handle)));
                self.watched_status(handle, request, call_event_state).await
            }
            EndpointCandidate::Index(_) => {
                let request = self
                    .stream_client
                    .get(self.url("/queue/data"))
                    .query(&[("session_hash", handle.as_str())]);
                self.watched_status(handle, request, queue_event_state).await
            }
        }
    }

    async fn fetch_artifact(
        &self,
        artifact: &AudioArtifact,
    ) -> Result<ConversionResult, SpaceError> {
        let url = self
            .artifact_url(artifact)
            .ok_or_else(|| SpaceError::DownloadFailed("artifact has no location".to_string()))?;

        let request = self.client.get(&url);
        let response = if self.is_space_url(&url) {
            self.send(request).await?
        } else {
            Self::dispatch(request).await?
        };

        if !response.status().is_success() {
            return Err(SpaceError::DownloadFailed(format!(
                "status {}",
                response.status()
            )));
        }

        let header_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|ct| ct.starts_with("audio/"))
            .map(String::from);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SpaceError::DownloadFailed(e.to_string()))?;

        let content_type = header_type.or_else(|| artifact.mime_type.clone());
        Ok(ConversionResult::new(bytes, content_type.as_deref()))
    }

    async fn describe_api(&self) -> Result<ApiDescription, SpaceError> {
        let response = self.send(self.client.get(self.url("/info"))).await?;

        if !response.status().is_success() {
            return Err(SpaceError::RequestFailed(format!(
                "info returned {}",
                response.status()
            )));
        }

        let info: Value = response
            .json()
            .await
            .map_err(|e| SpaceError::InvalidResponse(e.to_string()))?;

        Ok(ApiDescription {
            named_endpoints: endpoint_names(info.get("named_endpoints")),
            unnamed_endpoints: endpoint_names(info.get("unnamed_endpoints")),
        })
    }
}

pub fn create_gradio_space_client(
    settings: &SpaceSettings,
) -> Result<GradioSpaceClient, SpaceError> {
    let space = settings
        .space_id
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| SpaceError::InvalidSpaceId("HF_SPACE is not set".to_string()))?;

    GradioSpaceClient::new(
        space,
        &settings.api_prefix,
        settings.token.clone(),
        Duration::from_secs(settings.request_timeout_secs),
        Duration::from_millis(settings.status_wait_ms),
    )
}
