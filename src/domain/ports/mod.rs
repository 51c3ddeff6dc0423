//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the async trait interfaces that infrastructure
//! adapters must implement:
//! - `IssueSource`: read-only access to the external issue tracker
//! - `TaskSink`: CRUD surface of the task-management service
//!
//! These traits are the seams that keep the reconciliation engine
//! independent of the concrete HTTP collaborators.

pub mod errors;
pub mod issue_source;
pub mod task_sink;

pub use errors::{SinkError, SourceError};
pub use issue_source::IssueSource;
pub use task_sink::TaskSink;
