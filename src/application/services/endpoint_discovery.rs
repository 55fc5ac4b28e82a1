use std::fmt;
use std::future::Future;

use crate::domain::{EndpointCandidate, PayloadShape};

/// The first (endpoint, payload shape) pair the Space accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Discovery<T> {
    pub value: T,
    pub endpoint: EndpointCandidate,
    pub shape: PayloadShape,
    /// Rejected attempts before the accepted one.
    pub failed_attempts: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error(
        "no endpoint accepted the job (tried: {}); last error: {last_error}",
        join_candidates(.attempted)
    )]
    Exhausted {
        attempted: Vec<EndpointCandidate>,
        last_error: String,
    },
}

fn join_candidates(candidates: &[EndpointCandidate]) -> String {
    candidates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Tries every candidate against every payload shape, candidates in the outer
/// loop, and stops at the first accepted pair.
pub async fn discover<T, E, F, Fut>(
    candidates: &[EndpointCandidate],
    shapes: &[PayloadShape],
    mut attempt: F,
) -> Result<Discovery<T>, DiscoveryError>
where
    F: FnMut(EndpointCandidate, PayloadShape) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut failed_attempts = 0;
    let mut last_error: Option<String> = None;

    for endpoint in candidates {
        for shape in shapes {
            match attempt(endpoint.clone(), *shape).await {
                Ok(value) => {
                    tracing::info!(
                        endpoint = %endpoint,
                        shape = %shape,
                        failed_attempts,
                        "Space accepted submission"
                    );
                    return Ok(Discovery {
                        value,
                        endpoint: endpoint.clone(),
                        shape: *shape,
                        failed_attempts,
                    });
                }
                Err(e) => {
                    tracing::debug!(
                        endpoint = %endpoint,
                        shape = %shape,
                        error = %e,
                        "Submission rejected, trying next combination"
                    );
                    failed_attempts += 1;
                    last_error = Some(e.to_string());
                }
            }
        }
    }

    tracing::warn!(
        attempts = failed_attempts,
        "No endpoint candidate accepted the submission"
    );

    Err(DiscoveryError::Exhausted {
        attempted: candidates.to_vec(),
        last_error: last_error
            .unwrap_or_else(|| "no endpoint candidates or payload shapes configured".to_string()),
    })
}
