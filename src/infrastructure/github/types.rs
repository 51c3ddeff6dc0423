//! Wire types for the GitHub REST API.
//!
//! Only the fields the reconciler consumes are modeled; everything else in
//! GitHub's (large) issue payloads is ignored by serde.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::models::{IssueState, SourceIssue, SourceRepository};

#[derive(Debug, Clone, Deserialize)]
pub struct GhUser {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GhOwner {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GhRepository {
    pub id: i64,
    pub name: String,
    pub owner: GhOwner,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

impl GhRepository {
    pub fn into_repository(self) -> SourceRepository {
        SourceRepository {
            id: self.id,
            owner: self.owner.login,
            name: self.name,
            description: self.description,
            archived: self.archived,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GhLabel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GhMilestone {
    #[serde(default)]
    pub due_on: Option<DateTime<Utc>>,
}

/// An issue as returned by both the search and the per-repository listing
/// endpoints. Pull requests appear on both and are recognizable by the
/// `pull_request` member.
#[derive(Debug, Clone, Deserialize)]
pub struct GhIssue {
    pub id: i64,
    pub number: i64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub state: String,
    #[serde(default)]
    pub labels: Vec<GhLabel>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub milestone: Option<GhMilestone>,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl GhIssue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Convert to the domain model, attaching the repository identity when
    /// the caller knows it (the per-repository listing does; search does not).
    pub fn into_issue(self, repository: Option<SourceRepository>) -> SourceIssue {
        let state = if self.state == "closed" {
            IssueState::Closed
        } else {
            IssueState::Open
        };
        SourceIssue {
            id: self.id,
            number: self.number,
            title: self.title,
            body: self.body,
            state,
            labels: self.labels.into_iter().map(|label| label.name).collect(),
            html_url: self.html_url,
            repository,
            repository_url: self.repository_url,
            due_on: self.milestone.and_then(|m| m.due_on),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GhSearchResults {
    #[serde(default)]
    pub items: Vec<GhIssue>,
}
