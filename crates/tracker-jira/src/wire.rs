//! Jira REST v2 request and response bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use sweep_domain::{IssueKey, IssueRef, Transition};
use sweep_tracker::TrackerError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchPage {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub issues: Vec<WireIssue>,
}

#[derive(Deserialize)]
pub(crate) struct WireIssue {
    pub key: String,
    #[serde(default)]
    pub fields: Option<WireFields>,
    #[serde(default)]
    pub transitions: Vec<WireTransition>,
}

#[derive(Deserialize)]
pub(crate) struct WireFields {
    #[serde(default)]
    pub status: Option<Named>,
}

#[derive(Deserialize)]
pub(crate) struct Named {
    pub name: String,
}

#[derive(Deserialize)]
pub(crate) struct WireTransition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub to: Option<Named>,
}

impl WireIssue {
    pub fn into_issue_ref(self) -> Result<IssueRef, TrackerError> {
        let key = IssueKey::new(&self.key).map_err(|e| TrackerError::Decode(e.to_string()))?;
        Ok(IssueRef {
            key,
            status: self.fields.and_then(|f| f.status).map(|s| s.name),
            transitions: self
                .transitions
                .into_iter()
                .map(|t| Transition {
                    id: t.id,
                    name: t.name,
                    to_status: t.to.map(|s| s.name),
                })
                .collect(),
        })
    }
}

#[derive(Serialize)]
pub(crate) struct TransitionBody<'a> {
    pub transition: IdRef<'a>,
}

#[derive(Serialize)]
pub(crate) struct IdRef<'a> {
    pub id: &'a str,
}

#[derive(Serialize)]
pub(crate) struct CommentBody<'a> {
    pub body: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    error_messages: Vec<String>,
    #[serde(default)]
    errors: BTreeMap<String, String>,
}

/// Condense a Jira error body into one line. Falls back to the raw text
/// when the body is not Jira's error JSON.
pub(crate) fn summarize_error(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return body.trim().to_string();
    };

    let mut parts = parsed.error_messages;
    parts.extend(
        parsed
            .errors
            .into_iter()
            .map(|(field, message)| format!("{field}: {message}")),
    );
    if parts.is_empty() {
        return body.trim().to_string();
    }
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_page_maps_to_issue_refs() {
        let raw = r#"{
            "startAt": 0,
            "maxResults": 50,
            "total": 1,
            "issues": [{
                "id": "10001",
                "key": "ABC-1",
                "fields": {"status": {"name": "Open", "id": "1"}},
                "transitions": [
                    {"id": "5", "name": "Resolve Issue", "to": {"name": "Resolved"}},
                    {"id": "2", "name": "Close Issue"}
                ]
            }]
        }"#;
        let page: SearchPage = serde_json::from_str(raw).unwrap();
        assert_eq!(page.total, 1);

        let issue = page.issues.into_iter().next().unwrap().into_issue_ref().unwrap();
        assert_eq!(issue.key.as_str(), "ABC-1");
        assert_eq!(issue.status.as_deref(), Some("Open"));
        assert_eq!(issue.transitions.len(), 2);
        assert_eq!(issue.transitions[0].to_status.as_deref(), Some("Resolved"));
        assert!(issue.transitions[1].to_status.is_none());
    }

    #[test]
    fn issue_without_fields_or_transitions() {
        let wire: WireIssue = serde_json::from_str(r#"{"key": "ABC-9"}"#).unwrap();
        let issue = wire.into_issue_ref().unwrap();
        assert!(issue.status.is_none());
        assert!(issue.transitions.is_empty());
    }

    #[test]
    fn malformed_key_is_decode_error() {
        let wire: WireIssue = serde_json::from_str(r#"{"key": "ABC 9"}"#).unwrap();
        assert!(matches!(wire.into_issue_ref(), Err(TrackerError::Decode(_))));
    }

    #[test]
    fn transition_body_shape() {
        let body = TransitionBody {
            transition: IdRef { id: "5" },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"transition": {"id": "5"}})
        );
    }

    #[test]
    fn summarize_jira_error_json() {
        let body = r#"{"errorMessages":["Error in the JQL Query: Expecting a field name"],"errors":{"resolution":"Resolution is required."}}"#;
        assert_eq!(
            summarize_error(body),
            "Error in the JQL Query: Expecting a field name; resolution: Resolution is required."
        );
    }

    #[test]
    fn summarize_falls_back_to_raw_text() {
        assert_eq!(summarize_error("  Bad Gateway \n"), "Bad Gateway");
        assert_eq!(summarize_error("{}"), "{}");
    }
}
