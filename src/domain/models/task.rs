//! Sink-task domain model.
//!
//! The engine sees exactly two task states: open-equivalent and
//! done-equivalent. Whatever the sink uses on the wire (integer codes,
//! enum strings, or a mix) is decoded to this enum inside the sink
//! gateway and never reaches the reconciler.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a task as the reconciler understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Open
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Done => "done",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Priority tier for tasks and projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" | "normal" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Infer a priority from source-issue label names: any label containing
    /// "urgent" or "high" (case-insensitive) yields `High`, otherwise
    /// `Medium`. Monotonic, so label order does not matter.
    pub fn from_labels(labels: &[String]) -> Self {
        let urgent = labels.iter().any(|label| {
            let label = label.to_lowercase();
            label.contains("urgent") || label.contains("high")
        });
        if urgent {
            Self::High
        } else {
            Self::Medium
        }
    }
}

/// A task as it exists in the sink.
///
/// Only the fields the reconciler reads are modeled; everything else the
/// sink stores (notes, tags, priority edits) is deliberately left alone so
/// sink-side edits other than status are never clobbered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkTask {
    /// Sink-assigned numeric id. Placeholder ids (<= 0) mark tasks
    /// registered in the in-cycle index by a create this cycle.
    pub id: i64,
    pub name: String,
    pub status: TaskStatus,
    /// Owning project id; 0 when the sink reports none.
    pub project_id: i64,
    /// Caller-supplied identity token, when the sink persisted one.
    pub uid: Option<String>,
}

/// Payload for creating a sink task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub uid: Option<String>,
    pub name: String,
    pub note: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub project_id: i64,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}
