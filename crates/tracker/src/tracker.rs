use async_trait::async_trait;

use sweep_domain::IssueRef;

use crate::error::TrackerError;

/// Remote issue tracker. Owns transport, authentication and pagination.
///
/// Implementations must tolerate sequential reuse across runs; concurrent
/// runs against one client are not required.
#[async_trait]
pub trait TrackerClient: Send + Sync {
    /// Human-readable site identity for log lines (usually the base URL).
    fn site(&self) -> &str;

    /// Run a query and return every matching issue together with the
    /// transitions available on it right now, in tracker order.
    async fn search(&self, query: &str) -> Result<Vec<IssueRef>, TrackerError>;

    /// Apply `transition_id` to `issue`, attaching `comment` if given.
    ///
    /// With `transition_id` of `None` only the comment is posted and the
    /// issue's status is left alone. Callers never pass `None` for both.
    async fn transition(
        &self,
        issue: &IssueRef,
        transition_id: Option<&str>,
        comment: Option<&str>,
    ) -> Result<(), TrackerError>;
}
