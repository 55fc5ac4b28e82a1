use std::fmt;

use serde_json::Value;

pub const PENDING_STAGE: &str = "PENDING";

/// What the Space reports for a job at the moment it is polled.
#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    Pending { stage: String },
    Complete { output: Vec<Value> },
    Failed { message: String },
}

impl JobState {
    pub fn pending() -> Self {
        Self::Pending {
            stage: PENDING_STAGE.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobState::Pending { stage } => stage,
            JobState::Complete { .. } => "COMPLETED",
            JobState::Failed { .. } => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Pending { .. })
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
