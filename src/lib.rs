//! Issuesync - GitHub-to-task-service reconciler
//!
//! Issuesync mirrors GitHub issues into a personal task-management service
//! on a fixed interval: it pulls a bounded working set of issues, compares
//! them against the service's current projects and tasks, and creates or
//! updates tasks without duplicating work or clobbering edits other than
//! status.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure business logic and domain models
//! - **Service Layer** (`services`): Snapshot loading, reconciliation, cycle driving
//! - **Infrastructure Layer** (`infrastructure`): GitHub and sink HTTP adapters, config
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use issuesync::services::CycleDriver;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load config, build adapters, run one cycle
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::identity::{normalize, DedupStrategy};
pub use domain::models::{
    Config, IssueState, LoggingConfig, NewProject, NewTask, ProjectLifecycle, SinkConfig,
    SinkProject, SinkTask, SourceConfig, SourceIssue, SourceRepository, SyncConfig, TaskPriority,
    TaskStatus,
};
pub use domain::ports::{IssueSource, SinkError, SourceError, TaskSink};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{CycleDriver, CycleSummary, Reconciler, Snapshot};
