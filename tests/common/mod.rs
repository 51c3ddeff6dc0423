//! Shared test fixtures: a scripted issue source and issue builders.

#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;

use issuesync::domain::models::{IssueState, SourceIssue, SourceRepository};
use issuesync::domain::ports::{IssueSource, SourceError};

/// An `IssueSource` that replays fixed feeds, with per-feed failure toggles.
#[derive(Debug, Default)]
pub struct ScriptedIssueSource {
    pub actor: String,
    pub assigned: Vec<SourceIssue>,
    pub repositories: Vec<SourceRepository>,
    pub repo_issues: HashMap<String, Vec<SourceIssue>>,
    pub fail_actor: bool,
    pub fail_assigned: bool,
}

impl ScriptedIssueSource {
    pub fn for_actor(actor: &str) -> Self {
        Self {
            actor: actor.to_string(),
            ..Self::default()
        }
    }
}

fn api_error(endpoint: &str, status: u16) -> SourceError {
    SourceError::Api {
        method: "GET",
        endpoint: endpoint.to_string(),
        status,
    }
}

#[async_trait]
impl IssueSource for ScriptedIssueSource {
    async fn current_actor(&self) -> Result<String, SourceError> {
        if self.fail_actor {
            return Err(api_error("/user", 401));
        }
        Ok(self.actor.clone())
    }

    async fn assigned_issues(&self, _login: &str) -> Result<Vec<SourceIssue>, SourceError> {
        if self.fail_assigned {
            return Err(api_error("/search/issues", 403));
        }
        Ok(self.assigned.clone())
    }

    async fn owned_repositories(
        &self,
        _login: &str,
    ) -> Result<Vec<SourceRepository>, SourceError> {
        Ok(self.repositories.clone())
    }

    async fn repository_issues(
        &self,
        repo: &SourceRepository,
    ) -> Result<Vec<SourceIssue>, SourceError> {
        Ok(self.repo_issues.get(&repo.name).cloned().unwrap_or_default())
    }
}

/// An open issue in the named repository, carrying only the repository URL
/// (the shape the search feed produces).
pub fn searched_issue(id: i64, title: &str, repo: &str, state: IssueState) -> SourceIssue {
    SourceIssue {
        id,
        number: id,
        title: title.to_string(),
        body: Some(format!("Body of {title}.")),
        state,
        labels: vec![],
        html_url: format!("https://github.com/me/{repo}/issues/{id}"),
        repository: None,
        repository_url: Some(format!("https://api.github.com/repos/me/{repo}")),
        due_on: None,
    }
}

pub fn repository(id: i64, name: &str, archived: bool) -> SourceRepository {
    SourceRepository {
        id,
        owner: "me".to_string(),
        name: name.to_string(),
        description: Some(format!("The {name} repository")),
        archived,
    }
}
