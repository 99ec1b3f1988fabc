use crate::error::DomainError;

/// Trim, and treat what is left as absent when it is empty.
#[must_use]
pub fn fix_empty_and_trim(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A search expression in the tracker's query language (JQL for Jira).
/// Never empty: an empty query is a configuration error, not a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What to do to every matched issue. Both parts are optional and
/// independent: a comment can be posted without changing state.
///
/// A request with neither part is a no-op per issue. It is accepted here so
/// library callers keep full control, but [`crate::SweepConfig::resolve`]
/// rejects it because it almost always means a misconfigured job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionRequest {
    pub transition_name: Option<String>,
    pub comment: Option<String>,
}

impl TransitionRequest {
    /// Build from raw text, normalizing blank values to absent.
    pub fn new(transition_name: Option<&str>, comment: Option<&str>) -> Self {
        Self {
            transition_name: fix_empty_and_trim(transition_name),
            comment: fix_empty_and_trim(comment),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.transition_name.is_none() && self.comment.is_none()
    }
}
