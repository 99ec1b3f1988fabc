use sweep_domain::DomainError;
use sweep_tracker::TrackerError;
use thiserror::Error;

/// Errors that abort a whole run. Per-issue failures never surface here;
/// they are recorded in the batch result.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("configuration: {0}")]
    Configuration(String),

    #[error("search: {0}")]
    Search(#[from] TrackerError),
}

impl From<DomainError> for SweepError {
    fn from(e: DomainError) -> Self {
        Self::Configuration(e.to_string())
    }
}
