use std::collections::HashMap;

use sweep_domain::{IssueKey, IssueRef, Transition};

/// One call received by the tracker, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    Search(String),
    Transition {
        key: IssueKey,
        transition_id: Option<String>,
        comment: Option<String>,
    },
}

pub(crate) struct StoredIssue {
    pub key: IssueKey,
    pub status: String,
    pub comments: Vec<String>,
}

pub(crate) struct TrackerStore {
    /// Issues in creation order.
    pub issues: Vec<StoredIssue>,
    /// Transitions offered from each status.
    pub workflow: HashMap<String, Vec<Transition>>,
    /// Known queries and the keys they match, in result order.
    pub queries: HashMap<String, Vec<IssueKey>>,
    pub search_failure: Option<String>,
    /// Keys whose updates are refused, with the refusal message.
    pub rejections: HashMap<IssueKey, String>,
    pub calls: Vec<TrackerCall>,
}

impl TrackerStore {
    pub fn new() -> Self {
        Self {
            issues: Vec::new(),
            workflow: HashMap::new(),
            queries: HashMap::new(),
            search_failure: None,
            rejections: HashMap::new(),
            calls: Vec::new(),
        }
    }

    pub fn issue(&self, key: &IssueKey) -> Option<&StoredIssue> {
        self.issues.iter().find(|i| &i.key == key)
    }

    pub fn issue_mut(&mut self, key: &IssueKey) -> Option<&mut StoredIssue> {
        self.issues.iter_mut().find(|i| &i.key == key)
    }

    /// Snapshot an issue the way a search would report it.
    pub fn snapshot(&self, issue: &StoredIssue) -> IssueRef {
        IssueRef {
            key: issue.key.clone(),
            status: Some(issue.status.clone()),
            transitions: self
                .workflow
                .get(&issue.status)
                .cloned()
                .unwrap_or_default(),
        }
    }
}
