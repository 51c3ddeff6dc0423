//! Identity and normalization.
//!
//! Pure functions that derive the stable lookup keys the reconciler uses:
//! a normalized name key for projects and a dedup key for tasks. The dedup
//! strategy is a deployment-level decision made once in configuration; the
//! engine never mixes strategies within a running instance, since mixed
//! keys are a known source of duplicate tasks.

use serde::{Deserialize, Serialize};

use crate::domain::models::{SinkTask, SourceIssue};

/// Normalize a name for matching: lower-cased, `-`/`_` mapped to spaces,
/// surrounding whitespace trimmed and inner runs collapsed.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// How task identity is derived from a source issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupStrategy {
    /// Key on `(project id, normalized title)`. Works against sinks that do
    /// not persist a caller-supplied identity token.
    #[default]
    Title,
    /// Key on `(normalized repository name, issue number)`, written to the
    /// sink's `uid` field on create. The repository name is used rather
    /// than its numeric id so the key stays computable for issues arriving
    /// through search results, which carry no nested repository object.
    Uid,
}

impl DedupStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Uid => "uid",
        }
    }

    /// Dedup key for a source issue, given the resolved project id and the
    /// normalized repository key.
    pub fn issue_key(&self, project_id: i64, repo_key: &str, issue: &SourceIssue) -> String {
        match self {
            Self::Title => format!("{}|{}", project_id, normalize(&issue.title)),
            Self::Uid => format!("{}#{}", repo_key, issue.number),
        }
    }

    /// Dedup key for an existing sink task, or `None` when the task cannot
    /// participate in matching under this strategy (no `uid` persisted).
    pub fn task_key(&self, task: &SinkTask) -> Option<String> {
        match self {
            Self::Title => Some(format!("{}|{}", task.project_id, normalize(&task.name))),
            Self::Uid => task.uid.clone(),
        }
    }

    /// Identity token to persist on newly created tasks. `None` in title
    /// mode, where the task name itself carries the identity.
    pub fn issue_uid(&self, repo_key: &str, issue: &SourceIssue) -> Option<String> {
        match self {
            Self::Title => None,
            Self::Uid => Some(format!("{}#{}", repo_key, issue.number)),
        }
    }
}
