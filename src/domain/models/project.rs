//! Sink-project domain model.

use serde::{Deserialize, Serialize};

use crate::domain::models::TaskPriority;

/// Lifecycle status of a sink project.
///
/// The vocabulary belongs to the sink; the reconciler only ever writes
/// `Planned` (new repositories) and `Done` (archived repositories).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectLifecycle {
    Planned,
    InProgress,
    Done,
}

impl Default for ProjectLifecycle {
    fn default() -> Self {
        Self::Planned
    }
}

impl ProjectLifecycle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

/// A project as it exists in the sink.
///
/// Invariant: at most one project per normalized repository name; the
/// engine enforces this by consulting the snapshot index before creating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkProject {
    /// Sink-assigned numeric id.
    pub id: i64,
    pub name: String,
}

/// Payload for creating a sink project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub status: ProjectLifecycle,
    pub priority: TaskPriority,
}

impl NewProject {
    /// Build a project for a repository, synthesizing a description when
    /// the repository detail carries none.
    pub fn for_repository(name: &str, description: Option<&str>, archived: bool) -> Self {
        let description = match description {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => format!("Imported GitHub repository: {name}"),
        };
        Self {
            name: name.to_string(),
            description,
            status: if archived {
                ProjectLifecycle::Done
            } else {
                ProjectLifecycle::Planned
            },
            priority: TaskPriority::Medium,
        }
    }
}
