use std::cell::RefCell;

use parrot_relay::application::services::{DiscoveryError, discover};
use parrot_relay::domain::{EndpointCandidate, PayloadShape};

fn candidates() -> Vec<EndpointCandidate> {
    EndpointCandidate::ordered(None, &["/predict".to_string(), "/run".to_string()], 3)
}

#[tokio::test]
async fn given_space_accepting_single_pair_when_discovering_then_succeeds_after_row_major_failures() {
    let candidates = candidates();
    let shapes = PayloadShape::ALL;

    for (i, accepted_endpoint) in candidates.iter().enumerate() {
        for (j, accepted_shape) in shapes.iter().enumerate() {
            let tried = RefCell::new(Vec::new());

            let discovery = discover(&candidates, &shapes, |endpoint, shape| {
                tried.borrow_mut().push((endpoint.clone(), shape));
                let accepted = endpoint == *accepted_endpoint && shape == *accepted_shape;
                async move {
                    if accepted {
                        Ok("job-1")
                    } else {
                        Err("rejected")
                    }
                }
            })
            .await
            .unwrap();

            assert_eq!(discovery.endpoint, *accepted_endpoint);
            assert_eq!(discovery.shape, *accepted_shape);
            assert_eq!(discovery.value, "job-1");
            assert_eq!(discovery.failed_attempts, i * shapes.len() + j);

            let expected: Vec<_> = candidates
                .iter()
                .flat_map(|c| shapes.iter().map(move |s| (c.clone(), *s)))
                .take(i * shapes.len() + j + 1)
                .collect();
            assert_eq!(*tried.borrow(), expected);
        }
    }
}

#[tokio::test]
async fn given_space_rejecting_everything_when_discovering_then_error_lists_every_candidate() {
    let candidates = candidates();
    let mut calls = 0;

    let result = discover(&candidates, &PayloadShape::ALL, |endpoint, shape| {
        calls += 1;
        let message = format!("{} refused {}", endpoint, shape);
        async move { Err::<(), _>(message) }
    })
    .await;

    let Err(DiscoveryError::Exhausted {
        attempted,
        last_error,
    }) = result
    else {
        panic!("expected exhausted discovery");
    };
    assert_eq!(attempted, candidates);
    assert_eq!(last_error, "2 refused audio_only");
    assert_eq!(calls, candidates.len() * PayloadShape::ALL.len());
}

#[tokio::test]
async fn given_exhausted_discovery_when_formatting_then_message_names_candidates_and_last_error() {
    let candidates = vec![EndpointCandidate::named("predict"), EndpointCandidate::Index(0)];

    let error = discover(&candidates, &[PayloadShape::AudioOnly], |_, _| async {
        Err::<(), _>("HTTP 422")
    })
    .await
    .unwrap_err();

    assert_eq!(
        error.to_string(),
        "no endpoint accepted the job (tried: /predict, 0); last error: HTTP 422"
    );
}

#[tokio::test]
async fn given_no_candidates_when_discovering_then_reports_empty_configuration() {
    let mut calls = 0;

    let error = discover(&[], &PayloadShape::ALL, |_, _| {
        calls += 1;
        async { Ok::<_, String>(()) }
    })
    .await
    .unwrap_err();

    assert_eq!(calls, 0);
    assert!(error.to_string().contains("no endpoint candidates"));
}
