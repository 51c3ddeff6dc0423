//! Source-issue domain model.
//!
//! A read-only view of an issue as supplied by the external tracker. It
//! lives for exactly one reconciliation cycle and is never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Open/closed state of a source issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    Open,
    Closed,
}

impl Default for IssueState {
    fn default() -> Self {
        Self::Open
    }
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// Repository identity attached to a source issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRepository {
    /// Tracker-assigned numeric id.
    pub id: i64,
    /// Login of the owning account.
    pub owner: String,
    /// Repository name (unqualified).
    pub name: String,
    pub description: Option<String>,
    /// Archived repositories map to a done-equivalent project lifecycle.
    pub archived: bool,
}

/// A unit of work tracked by the external issue tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceIssue {
    /// Tracker-global id, used only to deduplicate across fetch feeds.
    pub id: i64,
    /// Issue number within its repository.
    pub number: i64,
    pub title: String,
    pub body: Option<String>,
    pub state: IssueState,
    /// Label names, as supplied by the tracker.
    pub labels: Vec<String>,
    /// Link back to the issue, embedded in the task's provenance footer.
    pub html_url: String,
    /// Nested repository detail. Absent for issues that arrived through a
    /// search feed, which omits nested repository data.
    pub repository: Option<SourceRepository>,
    /// API URL of the owning repository; the trailing segment is the
    /// fallback source of the repository name.
    pub repository_url: Option<String>,
    /// Milestone due date, when the issue carries one.
    pub due_on: Option<DateTime<Utc>>,
}

impl SourceIssue {
    /// Repository name for this issue: the nested repository's name when
    /// present, otherwise the trailing segment of the repository URL.
    /// `None` when neither is available.
    pub fn repo_name(&self) -> Option<String> {
        if let Some(repo) = &self.repository {
            return Some(repo.name.clone());
        }
        self.repository_url
            .as_deref()
            .and_then(|url| url.trim_end_matches('/').rsplit('/').next())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
    }
}
