//! Per-cycle snapshot of the sink's projects and tasks.
//!
//! The snapshot is read fresh at the start of every cycle and discarded at
//! cycle end; there is no cross-cycle cache, so every cycle self-heals from
//! the sink's current truth. During the cycle it doubles as the engine's
//! write-through registry: newly created projects and tasks are inserted
//! immediately so later issues in the same cycle see them.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::identity::{normalize, DedupStrategy};
use crate::domain::models::SinkTask;
use crate::domain::ports::TaskSink;

/// In-memory indexes over the sink's current state.
#[derive(Debug, Default)]
pub struct Snapshot {
    /// normalized project name -> project id
    projects: HashMap<String, i64>,
    /// dedup key -> task
    tasks: HashMap<String, SinkTask>,
}

impl Snapshot {
    /// An empty snapshot, as used when both sink reads fail.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load both indexes from the sink.
    ///
    /// Fails soft: a read error on either resource yields an empty index
    /// for it, logged as a warning. The cycle then proceeds degraded; the
    /// sink remains authoritative, so the next cycle's fresh read corrects
    /// anything over-created this cycle.
    pub async fn load<S: TaskSink + ?Sized>(sink: &S, strategy: DedupStrategy) -> Self {
        let mut snapshot = Self::default();

        match sink.list_projects().await {
            Ok(projects) => {
                for project in projects {
                    snapshot.projects.insert(normalize(&project.name), project.id);
                }
            }
            Err(err) if err.is_not_found() => {
                debug!("sink has no projects resource; treating as empty");
            }
            Err(err) => {
                warn!(error = %err, "project snapshot read failed; proceeding with empty project index");
            }
        }

        match sink.list_tasks().await {
            Ok(tasks) => {
                for task in tasks {
                    let Some(key) = strategy.task_key(&task) else {
                        debug!(task = %task.name, "task has no dedup key under the configured strategy");
                        continue;
                    };
                    snapshot.tasks.insert(key, task);
                }
            }
            Err(err) if err.is_not_found() => {
                debug!("sink has no tasks resource; treating as empty");
            }
            Err(err) => {
                warn!(error = %err, "task snapshot read failed; proceeding with empty task index");
            }
        }

        snapshot
    }

    pub fn project_id(&self, key: &str) -> Option<i64> {
        self.projects.get(key).copied()
    }

    /// Record a project created this cycle so later issues from the same
    /// repository reuse its id instead of racing a second creation.
    pub fn register_project(&mut self, key: String, id: i64) {
        self.projects.insert(key, id);
    }

    pub fn task(&self, key: &str) -> Option<&SinkTask> {
        self.tasks.get(key)
    }

    /// Record a task created or updated this cycle under its dedup key.
    pub fn register_task(&mut self, key: String, task: SinkTask) {
        self.tasks.insert(key, task);
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}
