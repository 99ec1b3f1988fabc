/// Errors raised while building or validating a sweep configuration.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("invalid issue key: {0}")]
    InvalidIssueKey(String),

    #[error("search query is empty")]
    EmptyQuery,

    #[error("neither a workflow action nor a comment was given, nothing would change")]
    NothingToApply,

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
}
