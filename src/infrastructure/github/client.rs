//! GitHub REST client implementing the `IssueSource` port.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::errors::SyncError;
use crate::domain::models::{SourceConfig, SourceIssue, SourceRepository};
use crate::domain::ports::{IssueSource, SourceError};
use crate::infrastructure::github::types::{GhIssue, GhRepository, GhSearchResults, GhUser};

/// GitHub caps `per_page` at 100 across its list endpoints.
const MAX_PAGE_SIZE: usize = 100;

/// HTTP adapter for the source issue tracker.
pub struct GithubClient {
    http: Client,
    base_url: String,
    token: String,
    assigned_search_limit: usize,
    repo_page_size: usize,
}

impl GithubClient {
    pub fn new(config: &SourceConfig) -> Result<Self, SyncError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );

        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("issuesync/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| SyncError::Configuration(format!("failed to build GitHub client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            assigned_search_limit: config.assigned_search_limit,
            repo_page_size: config.repo_page_size,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, SourceError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| SourceError::Transport {
                method: "GET",
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        debug!(method = "GET", endpoint, status = status.as_u16(), "source API call");
        if !status.is_success() {
            return Err(SourceError::Api {
                method: "GET",
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| SourceError::Transport {
            method: "GET",
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|e| SourceError::Decode {
            method: "GET",
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl IssueSource for GithubClient {
    async fn current_actor(&self) -> Result<String, SourceError> {
        let user: GhUser = self.get_json("/user").await?;
        Ok(user.login)
    }

    async fn assigned_issues(&self, login: &str) -> Result<Vec<SourceIssue>, SourceError> {
        let per_page = self.assigned_search_limit.min(MAX_PAGE_SIZE);
        let endpoint = format!(
            "/search/issues?q=assignee:{login}+is:issue&sort=updated&order=desc&per_page={per_page}"
        );
        let results: GhSearchResults = self.get_json(&endpoint).await?;
        Ok(results
            .items
            .into_iter()
            .filter(|item| !item.is_pull_request())
            .take(self.assigned_search_limit)
            .map(|item| item.into_issue(None))
            .collect())
    }

    async fn owned_repositories(
        &self,
        login: &str,
    ) -> Result<Vec<SourceRepository>, SourceError> {
        let repos: Vec<GhRepository> =
            self.get_json("/user/repos?type=owner&per_page=100").await?;
        Ok(repos
            .into_iter()
            .filter(|repo| repo.owner.login == login)
            .map(GhRepository::into_repository)
            .collect())
    }

    async fn repository_issues(
        &self,
        repo: &SourceRepository,
    ) -> Result<Vec<SourceIssue>, SourceError> {
        let per_page = self.repo_page_size.min(MAX_PAGE_SIZE);
        let endpoint = format!(
            "/repos/{}/{}/issues?state=all&sort=updated&direction=desc&per_page={per_page}",
            repo.owner, repo.name
        );
        let issues: Vec<GhIssue> = self.get_json(&endpoint).await?;
        Ok(issues
            .into_iter()
            .filter(|item| !item.is_pull_request())
            .map(|item| item.into_issue(Some(repo.clone())))
            .collect())
    }
}
