use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("issue not found: {0}")]
    NotFound(String),

    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}
