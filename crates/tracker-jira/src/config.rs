use std::time::Duration;

/// Connection settings for a Jira site.
#[derive(Clone)]
pub struct JiraConfig {
    /// Site root, e.g. `https://jira.example.com`.
    pub base_url: String,
    /// With `api_token`, sent as basic auth. Without it the token is a bearer token.
    pub username: Option<String>,
    pub api_token: Option<String>,
    /// Per-request timeout enforced by the HTTP client.
    pub timeout: Duration,
    /// Search page size. Jira may cap it lower.
    pub max_results: u32,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            username: None,
            api_token: None,
            timeout: Duration::from_secs(30),
            max_results: 50,
        }
    }
}

impl std::fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("max_results", &self.max_results)
            .finish()
    }
}
