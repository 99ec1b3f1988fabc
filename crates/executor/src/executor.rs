use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use sweep_domain::{
    BatchResult, IssueFailure, IssueRef, OutcomeRecord, SearchQuery, TransitionRequest,
};
use sweep_tracker::{TrackerClient, TrackerError};

use crate::error::SweepError;
use crate::resolver::TransitionResolver;
use crate::sink::LogSink;

/// Prefix on every operator-facing line.
pub const LOG_PREFIX: &str = "[JIRA]";

/// Upper bound on any single tracker call unless overridden.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs one query and applies one workflow action (and/or comment) to every
/// issue it matches.
///
/// Issues are processed one at a time in search order. A failure on one
/// issue is recorded and the run moves on; only a missing tracker or a
/// failed search aborts the run.
pub struct BulkTransitionExecutor {
    tracker: Option<Arc<dyn TrackerClient>>,
    call_timeout: Duration,
}

impl BulkTransitionExecutor {
    /// `None` stands for a job with no tracker site configured; every run
    /// then fails with [`SweepError::Configuration`].
    #[must_use]
    pub fn new(tracker: Option<Arc<dyn TrackerClient>>) -> Self {
        Self {
            tracker,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Execute the search and update each match.
    ///
    /// Fatal errors are written to `sink` before they are returned. The
    /// pass/fail outcome of a finished run is [`BatchResult::is_success`].
    ///
    /// `cancel` is checked between issues, never during a tracker call. A
    /// cancelled run returns the records completed so far with
    /// `incomplete` set.
    pub async fn run(
        &self,
        query: &SearchQuery,
        request: &TransitionRequest,
        sink: &dyn LogSink,
        cancel: &CancellationToken,
    ) -> Result<BatchResult, SweepError> {
        let run_id = ulid::Ulid::new();
        let span = tracing::info_span!("bulk_transition", %run_id);
        self.run_batch(query, request, sink, cancel)
            .instrument(span)
            .await
    }

    async fn run_batch(
        &self,
        query: &SearchQuery,
        request: &TransitionRequest,
        sink: &dyn LogSink,
        cancel: &CancellationToken,
    ) -> Result<BatchResult, SweepError> {
        let Some(tracker) = self.tracker.as_deref() else {
            let err = SweepError::Configuration(
                "no tracker site is configured for this job".to_string(),
            );
            sink.write_line(&format!("{LOG_PREFIX} Could not find a tracker site: {err}"));
            tracing::error!(error = %err, "run aborted");
            return Err(err);
        };

        if let Some(action) = &request.transition_name {
            sink.write_line(&format!(
                "{LOG_PREFIX} Updating issues using workflow action {action}."
            ));
        }
        sink.write_line(&format!("{LOG_PREFIX} JQL: {query}"));
        if request.is_noop() {
            sink.write_line(&format!(
                "{LOG_PREFIX} No workflow action and no comment given, matching issues will not be changed."
            ));
            tracing::warn!("request has neither action nor comment");
        }

        let issues = match self.bounded(tracker.search(query.as_str())).await {
            Ok(issues) => issues,
            Err(e) => {
                sink.write_line(&format!(
                    "{LOG_PREFIX} Search on {} failed: {e}",
                    tracker.site()
                ));
                tracing::error!(site = tracker.site(), error = %e, "search failed");
                return Err(SweepError::Search(e));
            }
        };
        let issues = dedupe(issues, sink);

        sink.write_line(&format!(
            "{LOG_PREFIX} {} matching issue(s) on {}.",
            issues.len(),
            tracker.site()
        ));
        tracing::info!(found = issues.len(), "search complete");

        let mut batch = BatchResult::new(issues.len());
        for issue in &issues {
            if cancel.is_cancelled() {
                batch.mark_incomplete();
                sink.write_line(&format!(
                    "{LOG_PREFIX} Cancelled after {} of {} issue(s).",
                    batch.processed(),
                    batch.matched
                ));
                tracing::warn!(processed = batch.processed(), "run cancelled");
                break;
            }
            let record = self.process_issue(tracker, issue, request, sink).await;
            batch.push(record);
        }

        tracing::info!(
            succeeded = batch.succeeded(),
            failed = batch.failed_count(),
            incomplete = batch.incomplete,
            "run finished"
        );
        Ok(batch)
    }

    async fn process_issue(
        &self,
        tracker: &dyn TrackerClient,
        issue: &IssueRef,
        request: &TransitionRequest,
        sink: &dyn LogSink,
    ) -> OutcomeRecord {
        let key = &issue.key;

        let transition = match &request.transition_name {
            Some(action) => match TransitionResolver::resolve(issue, action) {
                Some(t) => Some(t),
                None => {
                    sink.write_line(&format!(
                        "{LOG_PREFIX} Issue {key} has no workflow action named '{action}' in status '{}'.",
                        issue.status.as_deref().unwrap_or("unknown")
                    ));
                    tracing::info!(issue = %key, action = %action, "transition not available");
                    return OutcomeRecord::failed(
                        key.clone(),
                        IssueFailure::TransitionNotAvailable {
                            action: action.clone(),
                        },
                    );
                }
            },
            None => None,
        };

        let comment = request.comment.as_deref();
        if transition.is_none() && comment.is_none() {
            return OutcomeRecord::applied(key.clone());
        }

        let call = tracker.transition(issue, transition.map(|t| t.id.as_str()), comment);
        if let Err(e) = self.bounded(call).await {
            sink.write_line(&format!("{LOG_PREFIX} Issue {key} could not be updated: {e}"));
            tracing::warn!(issue = %key, error = %e, "update failed");
            return OutcomeRecord::failed(
                key.clone(),
                IssueFailure::TransitionApply {
                    detail: e.to_string(),
                },
            );
        }

        match transition {
            Some(t) => {
                let line = match &t.to_status {
                    Some(status) => format!(
                        "{LOG_PREFIX} Issue {key} transitioned to \"{status}\" due to action \"{}\".",
                        t.name
                    ),
                    None => format!(
                        "{LOG_PREFIX} Issue {key} transitioned due to action \"{}\".",
                        t.name
                    ),
                };
                sink.write_line(&line);
            }
            None => sink.write_line(&format!("{LOG_PREFIX} Comment added to issue {key}.")),
        }
        tracing::debug!(issue = %key, "issue updated");
        OutcomeRecord::applied(key.clone())
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, TrackerError>>,
    ) -> Result<T, TrackerError> {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(TrackerError::Timeout(self.call_timeout)),
        }
    }
}

/// Drop repeated keys, keeping the first occurrence.
fn dedupe(issues: Vec<IssueRef>, sink: &dyn LogSink) -> Vec<IssueRef> {
    let mut seen = HashSet::new();
    issues
        .into_iter()
        .filter(|issue| {
            let first = seen.insert(issue.key.clone());
            if !first {
                sink.write_line(&format!(
                    "{LOG_PREFIX} Issue {} returned more than once, processing it once.",
                    issue.key
                ));
            }
            first
        })
        .collect()
}

/// Write the closing line for a finished batch.
pub fn report_summary(batch: &BatchResult, sink: &dyn LogSink) {
    if batch.incomplete {
        sink.write_line(&format!(
            "{LOG_PREFIX} Run was cancelled, {} of {} issue(s) processed ({} failed).",
            batch.processed(),
            batch.matched,
            batch.failed_count()
        ));
    } else if batch.failed_count() > 0 {
        sink.write_line(&format!(
            "{LOG_PREFIX} Unable to update some issues: {} of {} failed.",
            batch.failed_count(),
            batch.total_found
        ));
    } else {
        sink.write_line(&format!(
            "{LOG_PREFIX} {} issue(s) updated.",
            batch.succeeded()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use sweep_domain::IssueKey;

    fn issue(key: &str) -> IssueRef {
        IssueRef::new(IssueKey::new(key).unwrap())
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let sink = MemorySink::new();
        let issues = dedupe(
            vec![issue("ABC-1"), issue("ABC-2"), issue("ABC-1")],
            &sink,
        );
        let keys: Vec<&str> = issues.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["ABC-1", "ABC-2"]);
        assert!(sink.contains("ABC-1 returned more than once"));
    }

    #[test]
    fn summary_lines() {
        let sink = MemorySink::new();

        report_summary(&BatchResult::new(0), &sink);

        let mut partial = BatchResult::new(2);
        partial.push(OutcomeRecord::applied(IssueKey::new("ABC-1").unwrap()));
        partial.push(OutcomeRecord::failed(
            IssueKey::new("ABC-2").unwrap(),
            IssueFailure::TransitionApply {
                detail: "nope".to_string(),
            },
        ));
        report_summary(&partial, &sink);

        let mut cancelled = BatchResult::new(5);
        cancelled.mark_incomplete();
        report_summary(&cancelled, &sink);

        let lines = sink.lines();
        assert_eq!(lines[0], "[JIRA] 0 issue(s) updated.");
        assert_eq!(lines[1], "[JIRA] Unable to update some issues: 1 of 2 failed.");
        assert!(lines[2].contains("cancelled, 0 of 5"));
    }
}
