//! Sink task-service port.

use async_trait::async_trait;

use crate::domain::models::{NewProject, NewTask, SinkProject, SinkTask, TaskStatus};
use crate::domain::ports::errors::SinkError;

/// The task service's CRUD surface as the engine uses it: five operations,
/// each a single request/response with no retry.
#[async_trait]
pub trait TaskSink: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<SinkProject>, SinkError>;

    async fn list_tasks(&self) -> Result<Vec<SinkTask>, SinkError>;

    /// Create a project and return it with its sink-assigned id.
    async fn create_project(&self, project: &NewProject) -> Result<SinkProject, SinkError>;

    /// Create a task. The response body carries nothing the engine needs:
    /// a task created this cycle is never patched this cycle.
    async fn create_task(&self, task: &NewTask) -> Result<(), SinkError>;

    /// Patch a task's status.
    async fn update_task_status(&self, task_id: i64, status: TaskStatus)
        -> Result<(), SinkError>;
}
