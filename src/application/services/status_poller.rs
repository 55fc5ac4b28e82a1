use std::future::Future;
use std::time::Duration;

use crate::domain::ConversionResult;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

/// Outcome of a single status check.
#[derive(Debug, Clone, PartialEq)]
pub enum JobProgress {
    Pending { stage: String },
    Ready(ConversionResult),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolledResult {
    pub result: ConversionResult,
    /// 1-based index of the poll that produced the result.
    pub attempts: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum PollError<E> {
    #[error(
        "conversion did not finish after {attempts} status checks; try again with a shorter recording"
    )]
    TimedOut { attempts: u32 },
    #[error("{0}")]
    Failed(E),
}

/// Repeats a status check at a fixed interval until it yields audio or the
/// attempt budget runs out.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusPoller {
    policy: PollPolicy,
}

impl StatusPoller {
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy }
    }

    pub async fn wait_for<E, F, Fut>(&self, mut poll: F) -> Result<PolledResult, PollError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<JobProgress, E>>,
    {
        for attempt in 1..=self.policy.max_attempts {
            match poll(attempt).await.map_err(PollError::Failed)? {
                JobProgress::Ready(result) => {
                    tracing::debug!(attempt, "Job completed");
                    return Ok(PolledResult {
                        result,
                        attempts: attempt,
                    });
                }
                JobProgress::Pending { stage } => {
                    tracing::debug!(attempt, stage = %stage, "Job still pending");
                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.interval).await;
                    }
                }
            }
        }

        Err(PollError::TimedOut {
            attempts: self.policy.max_attempts,
        })
    }
}
