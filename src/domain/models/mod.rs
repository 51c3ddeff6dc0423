//! Domain models.

pub mod config;
pub mod issue;
pub mod project;
pub mod task;

pub use config::{Config, LoggingConfig, SinkConfig, SourceConfig, SyncConfig};
pub use issue::{IssueState, SourceIssue, SourceRepository};
pub use project::{NewProject, ProjectLifecycle, SinkProject};
pub use task::{NewTask, SinkTask, TaskPriority, TaskStatus};
