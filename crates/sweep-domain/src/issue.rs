use crate::error::DomainError;

/// Issue keys end up in URL paths, so only alphanumerics, hyphens and
/// underscores are accepted (e.g. "ABC-123").
fn is_valid_key(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 255
        && s.chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

/// Tracker-assigned issue identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssueKey(String);

impl IssueKey {
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        if !is_valid_key(raw) {
            return Err(DomainError::InvalidIssueKey(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for IssueKey {
    type Error = DomainError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<IssueKey> for String {
    fn from(key: IssueKey) -> String {
        key.0
    }
}

impl std::fmt::Display for IssueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IssueKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A workflow transition currently offered on an issue.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Transition {
    pub id: String,
    /// Operator-facing action name, e.g. "Resolve Issue".
    pub name: String,
    /// Status the issue lands in after the transition, when the tracker reports it.
    #[serde(default)]
    pub to_status: Option<String>,
}

impl Transition {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            to_status: None,
        }
    }

    #[must_use]
    pub fn to_status(mut self, status: impl Into<String>) -> Self {
        self.to_status = Some(status.into());
        self
    }
}

/// An issue as seen in a search snapshot: its key, current status and the
/// transitions available from that status at the time of the search.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IssueRef {
    pub key: IssueKey,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

impl IssueRef {
    pub fn new(key: IssueKey) -> Self {
        Self {
            key,
            status: None,
            transitions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }
}
