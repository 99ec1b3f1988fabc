use crate::issue::IssueKey;

/// Why a single issue could not be updated. Never fatal to the batch.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueFailure {
    #[error("transition not available for this issue (action '{action}')")]
    TransitionNotAvailable { action: String },

    #[error("update failed: {detail}")]
    TransitionApply { detail: String },
}

/// Result of processing one issue.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OutcomeRecord {
    pub issue: IssueKey,
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<IssueFailure>,
}

impl OutcomeRecord {
    pub fn applied(issue: IssueKey) -> Self {
        Self {
            issue,
            applied: true,
            failure: None,
        }
    }

    pub fn failed(issue: IssueKey, failure: IssueFailure) -> Self {
        Self {
            issue,
            applied: false,
            failure: Some(failure),
        }
    }

    pub fn failure_reason(&self) -> Option<String> {
        self.failure.as_ref().map(ToString::to_string)
    }
}

/// Aggregate of one bulk run, records in tracker search order.
///
/// `total_found == succeeded() + failed_count()` holds for every finished
/// batch. `matched` is the search hit count; it differs from `total_found`
/// only when the run was cancelled, in which case `total_found` covers the
/// issues actually processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    pub matched: usize,
    pub total_found: usize,
    pub records: Vec<OutcomeRecord>,
    pub incomplete: bool,
}

impl BatchResult {
    #[must_use]
    pub fn new(matched: usize) -> Self {
        Self {
            matched,
            total_found: matched,
            records: Vec::with_capacity(matched),
            incomplete: false,
        }
    }

    /// Stop the batch where it is. The unprocessed tail is dropped from
    /// `total_found` but stays counted in `matched`.
    pub fn mark_incomplete(&mut self) {
        self.incomplete = true;
        self.total_found = self.records.len();
    }

    pub fn push(&mut self, record: OutcomeRecord) {
        self.records.push(record);
    }

    pub fn processed(&self) -> usize {
        self.records.len()
    }

    pub fn succeeded(&self) -> usize {
        self.records.iter().filter(|r| r.applied).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &OutcomeRecord> {
        self.records.iter().filter(|r| !r.applied)
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    /// True when every found issue was processed and none failed.
    /// An empty search result is a success.
    pub fn is_success(&self) -> bool {
        !self.incomplete && self.failed_count() == 0
    }
}

#[derive(serde::Serialize)]
struct BatchSummary<'a> {
    matched: usize,
    total_found: usize,
    succeeded: usize,
    failed: Vec<&'a OutcomeRecord>,
    incomplete: bool,
    success: bool,
}

impl serde::Serialize for BatchResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        BatchSummary {
            matched: self.matched,
            total_found: self.total_found,
            succeeded: self.succeeded(),
            failed: self.failed().collect(),
            incomplete: self.incomplete,
            success: self.is_success(),
        }
        .serialize(serializer)
    }
}
