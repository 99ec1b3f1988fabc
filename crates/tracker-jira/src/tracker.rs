use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response};

use sweep_domain::IssueRef;
use sweep_tracker::TrackerError;

use crate::config::JiraConfig;
use crate::error::{map_reqwest_err, map_status};
use crate::wire::{CommentBody, IdRef, SearchPage, TransitionBody};

const SEARCH_PATH: &str = "/rest/api/2/search";

/// Jira REST v2 client.
pub struct JiraTracker {
    client: Client,
    base_url: String,
    authorization: Option<String>,
    max_results: u32,
    timeout: Duration,
}

impl JiraTracker {
    pub fn new(config: JiraConfig) -> Result<Self, TrackerError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("jira-sweep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TrackerError::Connection(e.to_string()))?;

        let authorization = match (&config.username, &config.api_token) {
            (Some(user), Some(token)) => Some(format!(
                "Basic {}",
                BASE64_STANDARD.encode(format!("{user}:{token}"))
            )),
            (None, Some(token)) => Some(format!("Bearer {token}")),
            _ => None,
        };

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization,
            max_results: config.max_results.max(1),
            timeout: config.timeout,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, format!("{}{path}", self.base_url))
            .header(ACCEPT, "application/json");
        match &self.authorization {
            Some(value) => request.header(AUTHORIZATION, value),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, TrackerError> {
        let response = request
            .send()
            .await
            .map_err(|e| map_reqwest_err(e, self.timeout))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, &body));
        }
        Ok(response)
    }

    async fn search_page(&self, query: &str, start_at: u32) -> Result<SearchPage, TrackerError> {
        let start = start_at.to_string();
        let max = self.max_results.to_string();
        let request = self.request(Method::GET, SEARCH_PATH).query(&[
            ("jql", query),
            ("startAt", start.as_str()),
            ("maxResults", max.as_str()),
            ("fields", "status"),
            ("expand", "transitions"),
        ]);
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| map_reqwest_err(e, self.timeout))
    }

    async fn add_comment(&self, issue: &IssueRef, body: &str) -> Result<(), TrackerError> {
        let path = format!("/rest/api/2/issue/{}/comment", issue.key);
        self.send(self.request(Method::POST, &path).json(&CommentBody { body }))
            .await?;
        tracing::debug!(issue = %issue.key, "comment added");
        Ok(())
    }

    async fn do_transition(&self, issue: &IssueRef, id: &str) -> Result<(), TrackerError> {
        let path = format!("/rest/api/2/issue/{}/transitions", issue.key);
        let body = TransitionBody {
            transition: IdRef { id },
        };
        self.send(self.request(Method::POST, &path).json(&body))
            .await?;
        tracing::debug!(issue = %issue.key, transition_id = id, "transition applied");
        Ok(())
    }
}

#[async_trait]
impl sweep_tracker::TrackerClient for JiraTracker {
    fn site(&self) -> &str {
        &self.base_url
    }

    async fn search(&self, query: &str) -> Result<Vec<IssueRef>, TrackerError> {
        let mut issues = Vec::new();
        let mut start_at = 0u32;

        loop {
            let page = self.search_page(query, start_at).await?;
            let fetched = u32::try_from(page.issues.len()).unwrap_or(u32::MAX);
            for wire in page.issues {
                issues.push(wire.into_issue_ref()?);
            }
            start_at = start_at.saturating_add(fetched);
            tracing::debug!(start_at, total = page.total, "search page fetched");

            if fetched == 0 || start_at >= page.total {
                break;
            }
        }

        Ok(issues)
    }

    /// Comment first, then transition, as two calls. Transition screens
    /// often lack a comment field, so the comment is not folded into the
    /// transition request. A comment that lands before a refused transition
    /// stays on the issue.
    async fn transition(
        &self,
        issue: &IssueRef,
        transition_id: Option<&str>,
        comment: Option<&str>,
    ) -> Result<(), TrackerError> {
        if let Some(body) = comment {
            self.add_comment(issue, body).await?;
        }
        if let Some(id) = transition_id {
            self.do_transition(issue, id).await?;
        }
        Ok(())
    }
}
