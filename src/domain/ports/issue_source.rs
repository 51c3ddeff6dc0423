//! Source issue-tracker port.

use async_trait::async_trait;

use crate::domain::models::{SourceIssue, SourceRepository};
use crate::domain::ports::errors::SourceError;

/// Read-only access to the external issue tracker.
///
/// All listings are bounded: implementations return the most recently
/// updated slice of results, never a full history.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Login of the authenticated actor.
    async fn current_actor(&self) -> Result<String, SourceError>;

    /// Issues assigned to the actor, most recently updated first, capped
    /// at the configured search limit. Pull requests are filtered out.
    async fn assigned_issues(&self, login: &str) -> Result<Vec<SourceIssue>, SourceError>;

    /// Repositories owned by the actor.
    async fn owned_repositories(&self, login: &str)
        -> Result<Vec<SourceRepository>, SourceError>;

    /// One bounded page of issues (all states) for a repository, with the
    /// repository identity attached to each issue. Pull requests are
    /// filtered out.
    async fn repository_issues(
        &self,
        repo: &SourceRepository,
    ) -> Result<Vec<SourceIssue>, SourceError>;
}
