//! Wire types for the sink task API.
//!
//! The sink's wire representation of status is not stable: depending on
//! the deployment it returns integer codes or enum strings, and list
//! endpoints answer with either a bare array or an object-wrapped array.
//! Everything here decodes those shapes into the engine's two-state model
//! and encodes the engine's writes back into the integer codes the service
//! accepts.

use serde::{Deserialize, Serialize};

use crate::domain::models::{NewProject, NewTask, SinkProject, SinkTask, TaskStatus};

/// Integer codes the sink accepts on writes.
pub const STATUS_CODE_OPEN: i64 = 0;
pub const STATUS_CODE_DONE: i64 = 2;

/// Encode an engine status for the wire.
pub fn encode_status(status: TaskStatus) -> i64 {
    match status {
        TaskStatus::Open => STATUS_CODE_OPEN,
        TaskStatus::Done => STATUS_CODE_DONE,
    }
}

/// A task status as the sink returns it: integer code or enum string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireStatus {
    Code(i64),
    Name(String),
}

impl Default for WireStatus {
    fn default() -> Self {
        Self::Code(STATUS_CODE_OPEN)
    }
}

impl WireStatus {
    /// Collapse onto the engine's two states. Codes 2 (completed) and 3
    /// (archived) are done-equivalent; done-like strings likewise. Unknown
    /// values lean open so a closed source issue can still drive a
    /// completing patch.
    pub fn decode(&self) -> TaskStatus {
        match self {
            Self::Code(2 | 3) => TaskStatus::Done,
            Self::Code(_) => TaskStatus::Open,
            Self::Name(name) => match name.to_lowercase().as_str() {
                "done" | "completed" | "complete" | "archived" => TaskStatus::Done,
                _ => TaskStatus::Open,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireProject {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl WireProject {
    pub fn into_project(self) -> SinkProject {
        SinkProject {
            id: self.id,
            name: self.name,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireTask {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: WireStatus,
    #[serde(default)]
    pub project_id: i64,
    #[serde(default)]
    pub uid: Option<String>,
}

impl WireTask {
    pub fn into_task(self) -> SinkTask {
        SinkTask {
            id: self.id,
            name: self.name,
            status: self.status.decode(),
            project_id: self.project_id,
            uid: self.uid,
        }
    }
}

/// Project listings arrive as `{"projects": [...]}` or a bare array; both
/// are legitimate, neither is a failure path.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProjectList {
    Wrapped { projects: Vec<WireProject> },
    Bare(Vec<WireProject>),
}

impl ProjectList {
    pub fn into_projects(self) -> Vec<SinkProject> {
        let items = match self {
            Self::Wrapped { projects } => projects,
            Self::Bare(items) => items,
        };
        items.into_iter().map(WireProject::into_project).collect()
    }
}

/// Task listings arrive as `{"tasks": [...]}` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TaskList {
    Wrapped { tasks: Vec<WireTask> },
    Bare(Vec<WireTask>),
}

impl TaskList {
    pub fn into_tasks(self) -> Vec<SinkTask> {
        let items = match self {
            Self::Wrapped { tasks } => tasks,
            Self::Bare(items) => items,
        };
        items.into_iter().map(WireTask::into_task).collect()
    }
}

#[derive(Debug, Serialize)]
pub struct CreateProjectBody<'a> {
    pub name: &'a str,
    pub status: &'a str,
    pub description: &'a str,
    pub priority: &'a str,
}

impl<'a> From<&'a NewProject> for CreateProjectBody<'a> {
    fn from(project: &'a NewProject) -> Self {
        Self {
            name: &project.name,
            status: project.status.as_str(),
            description: &project.description,
            priority: project.priority.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WireTag<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CreateTaskBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<&'a str>,
    pub name: &'a str,
    pub note: &'a str,
    pub status: i64,
    pub priority: &'a str,
    pub project_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub tags: Vec<WireTag<'a>>,
}

impl<'a> From<&'a NewTask> for CreateTaskBody<'a> {
    fn from(task: &'a NewTask) -> Self {
        Self {
            uid: task.uid.as_deref(),
            name: &task.name,
            note: &task.note,
            status: encode_status(task.status),
            priority: task.priority.as_str(),
            project_id: task.project_id,
            due_date: task.due_date.map(|due| due.to_rfc3339()),
            tags: task.tags.iter().map(|name| WireTag { name }).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PatchStatusBody {
    pub status: i64,
}
