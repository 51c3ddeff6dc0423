//! In-memory sink for testing.
//!
//! Records every mutating call and serves seeded state, with per-operation
//! failure toggles for exercising the engine's soft-failure paths.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::models::{NewProject, NewTask, SinkProject, SinkTask, TaskStatus};
use crate::domain::ports::{SinkError, TaskSink};

#[derive(Debug, Default)]
struct MockState {
    projects: Vec<SinkProject>,
    tasks: Vec<SinkTask>,
    created_projects: Vec<NewProject>,
    created_tasks: Vec<NewTask>,
    status_patches: Vec<(i64, TaskStatus)>,
    fail_list_projects: bool,
    fail_list_tasks: bool,
    fail_create_project: bool,
    fail_create_task: bool,
    fail_update_status: bool,
    next_project_id: i64,
}

/// In-memory `TaskSink` for tests.
#[derive(Debug, Default)]
pub struct MockTaskSink {
    state: Mutex<MockState>,
}

impl MockTaskSink {
    pub fn new() -> Self {
        let sink = Self::default();
        sink.lock().next_project_id = 1000;
        sink
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock sink state lock poisoned")
    }

    pub fn seed_project(&self, id: i64, name: &str) {
        self.lock().projects.push(SinkProject {
            id,
            name: name.to_string(),
        });
    }

    pub fn seed_task(&self, task: SinkTask) {
        self.lock().tasks.push(task);
    }

    pub fn fail_list_projects(&self, fail: bool) {
        self.lock().fail_list_projects = fail;
    }

    pub fn fail_list_tasks(&self, fail: bool) {
        self.lock().fail_list_tasks = fail;
    }

    pub fn fail_create_project(&self, fail: bool) {
        self.lock().fail_create_project = fail;
    }

    pub fn fail_create_task(&self, fail: bool) {
        self.lock().fail_create_task = fail;
    }

    pub fn fail_update_status(&self, fail: bool) {
        self.lock().fail_update_status = fail;
    }

    pub fn created_projects(&self) -> Vec<NewProject> {
        self.lock().created_projects.clone()
    }

    pub fn created_tasks(&self) -> Vec<NewTask> {
        self.lock().created_tasks.clone()
    }

    pub fn status_patches(&self) -> Vec<(i64, TaskStatus)> {
        self.lock().status_patches.clone()
    }

    fn injected(method: &'static str, endpoint: &str) -> SinkError {
        SinkError::Api {
            method,
            endpoint: endpoint.to_string(),
            status: 500,
        }
    }
}

#[async_trait]
impl TaskSink for MockTaskSink {
    async fn list_projects(&self) -> Result<Vec<SinkProject>, SinkError> {
        let state = self.lock();
        if state.fail_list_projects {
            return Err(Self::injected("GET", "/projects?status=all"));
        }
        Ok(state.projects.clone())
    }

    async fn list_tasks(&self) -> Result<Vec<SinkTask>, SinkError> {
        let state = self.lock();
        if state.fail_list_tasks {
            return Err(Self::injected("GET", "/tasks?type=all"));
        }
        Ok(state.tasks.clone())
    }

    async fn create_project(&self, project: &NewProject) -> Result<SinkProject, SinkError> {
        let mut state = self.lock();
        if state.fail_create_project {
            return Err(Self::injected("POST", "/project"));
        }
        let id = state.next_project_id;
        state.next_project_id += 1;
        let created = SinkProject {
            id,
            name: project.name.clone(),
        };
        state.projects.push(created.clone());
        state.created_projects.push(project.clone());
        Ok(created)
    }

    async fn create_task(&self, task: &NewTask) -> Result<(), SinkError> {
        let mut state = self.lock();
        if state.fail_create_task {
            return Err(Self::injected("POST", "/task"));
        }
        state.created_tasks.push(task.clone());
        Ok(())
    }

    async fn update_task_status(
        &self,
        task_id: i64,
        status: TaskStatus,
    ) -> Result<(), SinkError> {
        let mut state = self.lock();
        if state.fail_update_status {
            return Err(Self::injected("PATCH", "/task"));
        }
        state.status_patches.push((task_id, status));
        if let Some(task) = state.tasks.iter_mut().find(|task| task.id == task_id) {
            task.status = status;
        }
        Ok(())
    }
}
