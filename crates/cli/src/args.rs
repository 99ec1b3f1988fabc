use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use sweep_domain::{DomainError, SweepConfig};
use sweep_tracker_jira::JiraConfig;

/// Transition every issue matching a JQL query, optionally leaving a comment.
///
/// Text in --jql, --action and --comment may reference build variables as
/// $NAME or ${NAME}; they are expanded from the environment and --var pairs.
#[derive(Debug, Parser)]
#[command(name = "jira-sweep", version)]
pub struct Cli {
    /// JQL selecting the issues to update.
    #[arg(long)]
    pub jql: Option<String>,

    /// Workflow action to apply, e.g. "Resolve Issue". Matched case-insensitively.
    #[arg(long)]
    pub action: Option<String>,

    /// Comment to add to every matched issue.
    #[arg(long)]
    pub comment: Option<String>,

    /// YAML file with jql_search / workflow_action_name / comment. Flags win.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Extra variable for expansion, overriding the environment.
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Jira site root. Without it the run fails as misconfigured.
    #[arg(long, env = "JIRA_URL")]
    pub site: Option<String>,

    #[arg(long, env = "JIRA_USER")]
    pub user: Option<String>,

    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Timeout for each HTTP request.
    #[arg(long, default_value_t = 30)]
    pub http_timeout_secs: u64,

    /// Timeout for each tracker operation (a paginated search counts as one).
    #[arg(long, default_value_t = 120)]
    pub call_timeout_secs: u64,

    /// Search page size.
    #[arg(long, default_value_t = 50)]
    pub page_size: u32,

    /// Print the batch result as JSON on stdout; progress goes to stderr.
    #[arg(long)]
    pub json: bool,

    /// Only validate the configured fields, do not contact the tracker.
    #[arg(long)]
    pub check: bool,
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

impl Cli {
    /// Config file (if any) overlaid with the flags given on the command line.
    pub fn sweep_config(&self) -> Result<SweepConfig, DomainError> {
        let base = match &self.config {
            Some(path) => SweepConfig::load(path)?,
            None => SweepConfig::default(),
        };
        Ok(base.merge(SweepConfig::new(
            self.jql.as_deref(),
            self.action.as_deref(),
            self.comment.as_deref(),
        )))
    }

    /// `None` when no site is configured.
    pub fn jira_config(&self) -> Option<JiraConfig> {
        let base_url = self.site.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some(JiraConfig {
            base_url: base_url.to_string(),
            username: self.user.clone(),
            api_token: self.token.clone(),
            timeout: Duration::from_secs(self.http_timeout_secs),
            max_results: self.page_size,
        })
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}
