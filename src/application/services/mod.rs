mod conversion_service;
mod endpoint_discovery;
mod status_poller;

pub use conversion_service::{ConversionError, ConversionService, SubmittedJob};
pub use endpoint_discovery::{Discovery, DiscoveryError, discover};
pub use status_poller::{
    DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL, JobProgress, PollError, PollPolicy,
    PolledResult, StatusPoller,
};
