use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;

use sweep_domain::{IssueKey, IssueRef, Transition};
use sweep_tracker::TrackerError;

use crate::store::{StoredIssue, TrackerCall, TrackerStore};

#[derive(Debug, Clone)]
pub struct MemoryTrackerConfig {
    pub site: String,
    /// Artificial delay applied to every call.
    pub latency: Option<Duration>,
}

impl Default for MemoryTrackerConfig {
    fn default() -> Self {
        Self {
            site: "memory://tracker".to_string(),
            latency: None,
        }
    }
}

/// Tracker held entirely in memory, with a status-based workflow.
///
/// Each issue sits in a status; the transitions it offers are the ones
/// registered for that status. Applying a transition moves the issue to the
/// transition's target status when one is set.
pub struct MemoryTracker {
    store: Mutex<TrackerStore>,
    config: MemoryTrackerConfig,
}

impl MemoryTracker {
    #[must_use]
    pub fn new(config: MemoryTrackerConfig) -> Self {
        Self {
            store: Mutex::new(TrackerStore::new()),
            config,
        }
    }

    pub async fn add_status(&self, status: &str, transitions: Vec<Transition>) {
        self.store
            .lock()
            .await
            .workflow
            .insert(status.to_string(), transitions);
    }

    pub async fn add_issue(&self, key: IssueKey, status: &str) {
        let mut store = self.store.lock().await;
        if let Some(existing) = store.issue_mut(&key) {
            existing.status = status.to_string();
            return;
        }
        store.issues.push(StoredIssue {
            key,
            status: status.to_string(),
            comments: Vec::new(),
        });
    }

    /// Make `query` return `keys`, in that order. Unregistered queries are
    /// rejected the way a tracker rejects malformed JQL.
    pub async fn register_query(&self, query: &str, keys: Vec<IssueKey>) {
        self.store
            .lock()
            .await
            .queries
            .insert(query.to_string(), keys);
    }

    /// Make every search fail with a connection error.
    pub async fn fail_search(&self, message: &str) {
        self.store.lock().await.search_failure = Some(message.to_string());
    }

    /// Refuse every update to `key`.
    pub async fn reject_updates(&self, key: IssueKey, message: &str) {
        self.store
            .lock()
            .await
            .rejections
            .insert(key, message.to_string());
    }

    pub async fn calls(&self) -> Vec<TrackerCall> {
        self.store.lock().await.calls.clone()
    }

    pub async fn status(&self, key: &IssueKey) -> Option<String> {
        self.store
            .lock()
            .await
            .issue(key)
            .map(|i| i.status.clone())
    }

    pub async fn comments(&self, key: &IssueKey) -> Vec<String> {
        self.store
            .lock()
            .await
            .issue(key)
            .map(|i| i.comments.clone())
            .unwrap_or_default()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.config.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl sweep_tracker::TrackerClient for MemoryTracker {
    fn site(&self) -> &str {
        &self.config.site
    }

    async fn search(&self, query: &str) -> Result<Vec<IssueRef>, TrackerError> {
        self.simulate_latency().await;

        let mut store = self.store.lock().await;
        store.calls.push(TrackerCall::Search(query.to_string()));

        if let Some(message) = &store.search_failure {
            return Err(TrackerError::Connection(message.clone()));
        }

        let Some(keys) = store.queries.get(query) else {
            return Err(TrackerError::Rejected {
                status: 400,
                message: format!("error in the JQL query: '{query}'"),
            });
        };

        let results: Vec<IssueRef> = keys
            .iter()
            .filter_map(|key| store.issue(key))
            .map(|issue| store.snapshot(issue))
            .collect();
        tracing::debug!(query, hits = results.len(), "memory search");
        Ok(results)
    }

    async fn transition(
        &self,
        issue: &IssueRef,
        transition_id: Option<&str>,
        comment: Option<&str>,
    ) -> Result<(), TrackerError> {
        self.simulate_latency().await;

        let mut store = self.store.lock().await;
        store.calls.push(TrackerCall::Transition {
            key: issue.key.clone(),
            transition_id: transition_id.map(str::to_string),
            comment: comment.map(str::to_string),
        });

        if let Some(message) = store.rejections.get(&issue.key) {
            return Err(TrackerError::Rejected {
                status: 400,
                message: message.clone(),
            });
        }

        let Some(current) = store.issue(&issue.key) else {
            return Err(TrackerError::NotFound(issue.key.to_string()));
        };

        // Validate against the live status, not the caller's snapshot.
        let target = match transition_id {
            Some(id) => {
                let offered = store
                    .workflow
                    .get(&current.status)
                    .and_then(|ts| ts.iter().find(|t| t.id == id));
                let Some(transition) = offered else {
                    return Err(TrackerError::Rejected {
                        status: 400,
                        message: format!(
                            "transition id '{id}' is not valid for {} in status '{}'",
                            issue.key, current.status
                        ),
                    });
                };
                transition.to_status.clone()
            }
            None => None,
        };

        let Some(stored) = store.issue_mut(&issue.key) else {
            return Err(TrackerError::NotFound(issue.key.to_string()));
        };
        if let Some(body) = comment {
            stored.comments.push(body.to_string());
        }
        if let Some(status) = target {
            stored.status = status;
        }
        Ok(())
    }
}
