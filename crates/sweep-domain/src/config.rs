use std::collections::HashMap;
use std::path::Path;

use crate::error::DomainError;
use crate::expand::expand;
use crate::request::{SearchQuery, TransitionRequest, fix_empty_and_trim};

/// Result of checking a single user-facing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldCheck {
    Ok,
    Warning(String),
    Error(String),
}

impl FieldCheck {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// A query is required; there is nothing to sweep without one.
pub fn validate_query(value: &str) -> FieldCheck {
    if value.trim().is_empty() {
        return FieldCheck::Error(
            "Please set the JQL used to select the issues to update.".to_string(),
        );
    }
    FieldCheck::Ok
}

/// A missing action is allowed (comment-only runs) but worth flagging.
pub fn validate_transition_name(value: &str) -> FieldCheck {
    if value.trim().is_empty() {
        return FieldCheck::Warning(
            "No workflow action was specified, thus no status update will be made for any of the matching issues."
                .to_string(),
        );
    }
    FieldCheck::Ok
}

/// The three operator-facing fields of a sweep, before variable expansion.
/// Loadable from YAML:
///
/// ```yaml
/// jql_search: project = ABC AND fixVersion = "${VERSION}"
/// workflow_action_name: Resolve Issue
/// comment: Released in build $BUILD_NUMBER
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    #[serde(default)]
    pub jql_search: Option<String>,
    #[serde(default)]
    pub workflow_action_name: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl SweepConfig {
    pub fn new(
        jql_search: Option<&str>,
        workflow_action_name: Option<&str>,
        comment: Option<&str>,
    ) -> Self {
        Self {
            jql_search: fix_empty_and_trim(jql_search),
            workflow_action_name: fix_empty_and_trim(workflow_action_name),
            comment: fix_empty_and_trim(comment),
        }
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, DomainError> {
        let parsed: Self =
            serde_yaml::from_str(raw).map_err(|e| DomainError::InvalidConfig(e.to_string()))?;
        Ok(Self::new(
            parsed.jql_search.as_deref(),
            parsed.workflow_action_name.as_deref(),
            parsed.comment.as_deref(),
        ))
    }

    pub fn load(path: &Path) -> Result<Self, DomainError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// Fields set in `overrides` replace ours.
    #[must_use]
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            jql_search: overrides.jql_search.or(self.jql_search),
            workflow_action_name: overrides.workflow_action_name.or(self.workflow_action_name),
            comment: overrides.comment.or(self.comment),
        }
    }

    /// Field checks in display order, for surfacing to an operator.
    pub fn checks(&self) -> [(&'static str, FieldCheck); 2] {
        [
            (
                "jql_search",
                validate_query(self.jql_search.as_deref().unwrap_or_default()),
            ),
            (
                "workflow_action_name",
                validate_transition_name(self.workflow_action_name.as_deref().unwrap_or_default()),
            ),
        ]
    }

    /// Expand build variables and produce the executor inputs.
    ///
    /// Fails when the expanded query is empty, or when neither an action nor
    /// a comment is left after expansion.
    pub fn resolve(
        &self,
        env: &HashMap<String, String>,
    ) -> Result<(SearchQuery, TransitionRequest), DomainError> {
        let expand_field = |field: &Option<String>| {
            let expanded = field.as_deref().map(|v| expand(v, env));
            fix_empty_and_trim(expanded.as_deref())
        };

        let query = expand_field(&self.jql_search).ok_or(DomainError::EmptyQuery)?;
        let query = SearchQuery::new(&query)?;

        let request = TransitionRequest {
            transition_name: expand_field(&self.workflow_action_name),
            comment: expand_field(&self.comment),
        };
        if request.is_noop() {
            return Err(DomainError::NothingToApply);
        }

        Ok((query, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env() -> HashMap<String, String> {
        HashMap::from([
            ("VERSION".to_string(), "2.4.0".to_string()),
            ("BUILD_NUMBER".to_string(), "118".to_string()),
            ("EMPTY".to_string(), String::new()),
        ])
    }

    #[test]
    fn query_validation() {
        assert!(validate_query("").is_error());
        assert!(validate_query("   ").is_error());
        assert_eq!(validate_query("project = ABC"), FieldCheck::Ok);
    }

    #[test]
    fn transition_name_validation_only_warns() {
        let check = validate_transition_name(" ");
        assert!(matches!(check, FieldCheck::Warning(_)));
        assert!(!check.is_error());
        assert_eq!(validate_transition_name("Resolve Issue"), FieldCheck::Ok);
    }

    #[test]
    fn new_normalizes_fields() {
        let config = SweepConfig::new(Some(" project = ABC "), Some(""), Some("  done "));
        assert_eq!(config.jql_search.as_deref(), Some("project = ABC"));
        assert!(config.workflow_action_name.is_none());
        assert_eq!(config.comment.as_deref(), Some("done"));
    }

    #[test]
    fn resolve_expands_every_field() {
        let config = SweepConfig::new(
            Some("project = ABC AND fixVersion = \"${VERSION}\""),
            Some("Resolve Issue"),
            Some("Released in build $BUILD_NUMBER"),
        );
        let (query, request) = config.resolve(&env()).unwrap();
        assert_eq!(query.as_str(), "project = ABC AND fixVersion = \"2.4.0\"");
        assert_eq!(request.transition_name.as_deref(), Some("Resolve Issue"));
        assert_eq!(request.comment.as_deref(), Some("Released in build 118"));
    }

    #[test]
    fn resolve_rejects_missing_query() {
        let config = SweepConfig::new(None, Some("Close Issue"), None);
        assert!(matches!(config.resolve(&env()), Err(DomainError::EmptyQuery)));
    }

    #[test]
    fn resolve_rejects_query_that_expands_to_nothing() {
        let config = SweepConfig::new(Some("$EMPTY"), Some("Close Issue"), None);
        assert!(matches!(config.resolve(&env()), Err(DomainError::EmptyQuery)));
    }

    #[test]
    fn resolve_rejects_nothing_to_apply() {
        let config = SweepConfig::new(Some("project = ABC"), Some("${EMPTY}"), None);
        assert!(matches!(
            config.resolve(&env()),
            Err(DomainError::NothingToApply)
        ));
    }

    #[test]
    fn resolve_allows_comment_only() {
        let config = SweepConfig::new(Some("project = ABC"), None, Some("seen by CI"));
        let (_, request) = config.resolve(&env()).unwrap();
        assert!(request.transition_name.is_none());
        assert_eq!(request.comment.as_deref(), Some("seen by CI"));
    }

    #[test]
    fn merge_prefers_overrides() {
        let base = SweepConfig::new(Some("project = ABC"), Some("Close Issue"), Some("base"));
        let merged = base.merge(SweepConfig::new(None, Some("Resolve Issue"), None));
        assert_eq!(merged.jql_search.as_deref(), Some("project = ABC"));
        assert_eq!(merged.workflow_action_name.as_deref(), Some("Resolve Issue"));
        assert_eq!(merged.comment.as_deref(), Some("base"));
    }

    #[test]
    fn checks_report_both_fields() {
        let [(q_name, q), (a_name, a)] = SweepConfig::default().checks();
        assert_eq!(q_name, "jql_search");
        assert!(q.is_error());
        assert_eq!(a_name, "workflow_action_name");
        assert!(matches!(a, FieldCheck::Warning(_)));
    }

    #[test]
    fn yaml_round_trip_normalizes() {
        let config = SweepConfig::from_yaml_str(
            "jql_search: \"  project = ABC  \"\nworkflow_action_name: \"\"\ncomment: closed\n",
        )
        .unwrap();
        assert_eq!(config.jql_search.as_deref(), Some("project = ABC"));
        assert!(config.workflow_action_name.is_none());
        assert_eq!(config.comment.as_deref(), Some("closed"));
    }

    #[test]
    fn yaml_rejects_unknown_fields() {
        let result = SweepConfig::from_yaml_str("jql: project = ABC\n");
        assert!(matches!(result, Err(DomainError::InvalidConfig(_))));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "jql_search: project = OPS").unwrap();
        writeln!(file, "workflow_action_name: Close Issue").unwrap();

        let config = SweepConfig::load(file.path()).unwrap();
        assert_eq!(config.jql_search.as_deref(), Some("project = OPS"));
        assert_eq!(config.workflow_action_name.as_deref(), Some("Close Issue"));
        assert!(config.comment.is_none());
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SweepConfig::load(&dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(DomainError::Io(_))));
    }
}
