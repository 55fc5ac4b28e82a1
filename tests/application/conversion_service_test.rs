use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parrot_relay::application::ports::SpaceClient;
use parrot_relay::application::services::{
    ConversionError, ConversionService, JobProgress, PollPolicy,
};
use parrot_relay::domain::{
    AudioUpload, ConversionParams, ConversionRequest, EndpointCandidate, JobHandle,
    PayloadShape,
};
use parrot_relay::infrastructure::space::MockSpaceClient;

fn request() -> ConversionRequest {
    ConversionRequest::new(
        AudioUpload::new("take.wav", "audio/wav", Bytes::from_static(b"RIFF voice")),
        ConversionParams::default(),
    )
}

fn service(space: &Arc<MockSpaceClient>, max_attempts: u32) -> ConversionService {
    let space: Arc<dyn SpaceClient> = space.clone();
    ConversionService::new(
        space,
        EndpointCandidate::ordered(None, &["/predict".to_string()], 2),
        PollPolicy {
            interval: Duration::ZERO,
            max_attempts,
        },
    )
}

#[tokio::test]
async fn given_accepting_space_when_starting_then_uploads_once_and_submits_full_payload() {
    let space = Arc::new(MockSpaceClient::new());

    let job = service(&space, 3).start(&request()).await.unwrap();

    assert_eq!(job.endpoint, EndpointCandidate::named("/predict"));
    assert_eq!(job.shape, PayloadShape::Full);
    assert_eq!(job.failed_attempts, 0);
    assert_eq!(space.upload_calls(), 1);
    assert_eq!(
        space.submissions(),
        vec![(EndpointCandidate::named("/predict"), 4)]
    );
}

#[tokio::test]
async fn given_space_accepting_only_pitch_on_index_zero_when_starting_then_falls_through() {
    let space = Arc::new(MockSpaceClient::new().accepting(|endpoint, payload| {
        *endpoint == EndpointCandidate::Index(0) && payload.len() == 2
    }));

    let job = service(&space, 3).start(&request()).await.unwrap();

    assert_eq!(job.endpoint, EndpointCandidate::Index(0));
    assert_eq!(job.shape, PayloadShape::PitchOnly);
    assert_eq!(job.failed_attempts, 4 + 2);
    assert_eq!(space.upload_calls(), 1);
}

#[tokio::test]
async fn given_restricted_shapes_when_starting_then_only_those_shapes_are_tried() {
    let space = Arc::new(MockSpaceClient::new().accepting(|_, _| false));
    let service = service(&space, 3).with_payload_shapes(vec![PayloadShape::AudioOnly]);

    let error = service.start(&request()).await.unwrap_err();

    assert!(matches!(error, ConversionError::Discovery(_)));
    assert_eq!(
        space.submissions(),
        vec![
            (EndpointCandidate::named("/predict"), 1),
            (EndpointCandidate::Index(0), 1),
            (EndpointCandidate::Index(1), 1),
        ]
    );
}

#[tokio::test]
async fn given_pending_job_when_checking_status_then_reports_stage_then_audio() {
    let space = Arc::new(MockSpaceClient::new().with_pending_polls(1));
    let service = service(&space, 3);
    let job = service.start(&request()).await.unwrap();

    let first = service.status(&job.endpoint, &job.handle).await.unwrap();
    let second = service.status(&job.endpoint, &job.handle).await.unwrap();

    assert_eq!(
        first,
        JobProgress::Pending {
            stage: "PROCESSING".to_string()
        }
    );
    let JobProgress::Ready(result) = second else {
        panic!("expected audio on second check");
    };
    assert_eq!(result.content_type, "audio/wav");
    assert_eq!(&result.bytes[..], b"RIFF voice");
}

#[tokio::test]
async fn given_unknown_handle_when_checking_status_then_job_not_found() {
    let space = Arc::new(MockSpaceClient::new());

    let error = service(&space, 3)
        .status(&EndpointCandidate::Index(0), &JobHandle::new("nope"))
        .await
        .unwrap_err();

    assert!(matches!(error, ConversionError::JobNotFound(id) if id == "nope"));
}

#[tokio::test]
async fn given_quick_job_when_converting_inline_then_returns_audio() {
    let space = Arc::new(MockSpaceClient::new().with_pending_polls(2));

    let result = service(&space, 3).convert(&request()).await.unwrap();

    assert_eq!(&result.bytes[..], b"RIFF voice");
    assert_eq!(space.status_calls(), 3);
}

#[tokio::test]
async fn given_slow_job_when_converting_inline_then_times_out_with_hint() {
    let space = Arc::new(MockSpaceClient::new().with_pending_polls(10));

    let error = service(&space, 3).convert(&request()).await.unwrap_err();

    assert!(matches!(error, ConversionError::TimedOut { attempts: 3 }));
    assert!(error.to_string().contains("shorter recording"));
    assert_eq!(space.status_calls(), 3);
}
