//! Reconciliation engine.
//!
//! Owns every policy decision in the system: project resolution and
//! creation, task identity lookup, create-vs-update-vs-skip, and the
//! translation of source issue state into sink task status. The engine is
//! a sequential fold over the cycle's issue list: in-cycle index updates
//! must be visible to subsequent issues, so issues are never processed
//! concurrently.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::domain::identity::{normalize, DedupStrategy};
use crate::domain::models::{
    NewProject, NewTask, SinkTask, SourceIssue, SyncConfig, TaskPriority, TaskStatus,
};
use crate::domain::ports::TaskSink;
use crate::services::snapshot::Snapshot;

/// Engine options, fixed for the lifetime of a cycle.
#[derive(Debug, Clone)]
pub struct ReconcilerOptions {
    /// Log mutating actions instead of performing them.
    pub dry_run: bool,
    /// Task identity derivation; one strategy per deployment.
    pub dedup_strategy: DedupStrategy,
    /// Fixed tag attached to every created task alongside the repo name.
    pub source_tag: String,
}

impl Default for ReconcilerOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            dedup_strategy: DedupStrategy::default(),
            source_tag: "github".to_string(),
        }
    }
}

impl From<&SyncConfig> for ReconcilerOptions {
    fn from(sync: &SyncConfig) -> Self {
        Self {
            dry_run: sync.dry_run,
            dedup_strategy: sync.dedup_strategy,
            source_tag: sync.source_tag.clone(),
        }
    }
}

/// Why an issue was skipped without reaching a terminal decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No repository identity was derivable from the issue.
    NoRepository,
    /// The project create failed; no placeholder id is fabricated in real
    /// runs, so the issue has nowhere to live this cycle.
    ProjectCreateFailed,
    /// The task create failed.
    TaskCreateFailed,
    /// The status patch failed.
    StatusPatchFailed,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoRepository => "no_repository",
            Self::ProjectCreateFailed => "project_create_failed",
            Self::TaskCreateFailed => "task_create_failed",
            Self::StatusPatchFailed => "status_patch_failed",
        }
    }

    /// Whether this skip represents a failed sink write (as opposed to an
    /// issue the engine chose not to act on).
    pub fn is_write_failure(&self) -> bool {
        !matches!(self, Self::NoRepository)
    }
}

/// Terminal decision for one issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueAction {
    /// A new task was created (or would be, in a simulated run).
    Created,
    /// Status drift was corrected with one patch.
    StatusUpdated(TaskStatus),
    /// Task exists and statuses already agree.
    InSync,
    Skipped(SkipReason),
}

/// Outcome of reconciling one issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueOutcome {
    pub action: IssueAction,
    /// Whether resolving this issue created (or simulated creating) a
    /// project as a side effect.
    pub created_project: bool,
}

impl IssueOutcome {
    fn skipped(reason: SkipReason, created_project: bool) -> Self {
        Self {
            action: IssueAction::Skipped(reason),
            created_project,
        }
    }
}

/// The reconciliation engine. Holds the cycle's snapshot and writes
/// through it; discarded with the snapshot at cycle end.
pub struct Reconciler<S: TaskSink + ?Sized> {
    sink: Arc<S>,
    snapshot: Snapshot,
    options: ReconcilerOptions,
    /// Synthetic ids handed out for simulated creations, counting down
    /// from -1 so they can never collide with sink-assigned ids.
    next_placeholder_id: i64,
}

impl<S: TaskSink + ?Sized> Reconciler<S> {
    pub fn new(sink: Arc<S>, snapshot: Snapshot, options: ReconcilerOptions) -> Self {
        Self {
            sink,
            snapshot,
            options,
            next_placeholder_id: -1,
        }
    }

    /// Reconcile one source issue against the sink.
    ///
    /// Sink write failures are logged and reflected in the outcome; they
    /// never abort the cycle, and nothing is retried until the next cycle
    /// re-derives the work from fresh state.
    pub async fn reconcile(&mut self, issue: &SourceIssue) -> IssueOutcome {
        let Some(repo_name) = issue.repo_name() else {
            debug!(issue = issue.number, title = %issue.title, "no repository identity; skipping issue");
            return IssueOutcome::skipped(SkipReason::NoRepository, false);
        };
        let repo_key = normalize(&repo_name);
        let target_status = if issue.state.is_closed() {
            TaskStatus::Done
        } else {
            TaskStatus::Open
        };

        let (project_id, created_project) = match self.resolve_project(issue, &repo_name, &repo_key).await {
            Some(resolved) => resolved,
            None => return IssueOutcome::skipped(SkipReason::ProjectCreateFailed, false),
        };

        let dedup_key = self
            .options
            .dedup_strategy
            .issue_key(project_id, &repo_key, issue);

        let existing = self.snapshot.task(&dedup_key).cloned();
        let action = match existing {
            Some(existing) => {
                self.correct_drift(&dedup_key, &existing, target_status).await
            }
            None => {
                self.create_task(issue, project_id, &repo_key, &repo_name, target_status, &dedup_key)
                    .await
            }
        };

        IssueOutcome { action, created_project }
    }

    /// Resolve the issue's project id, creating the project when the
    /// snapshot has no entry for the repository. Returns `None` only when
    /// a real create fails.
    async fn resolve_project(
        &mut self,
        issue: &SourceIssue,
        repo_name: &str,
        repo_key: &str,
    ) -> Option<(i64, bool)> {
        if let Some(id) = self.snapshot.project_id(repo_key) {
            return Some((id, false));
        }

        let (description, archived) = issue
            .repository
            .as_ref()
            .map(|repo| (repo.description.clone(), repo.archived))
            .unwrap_or((None, false));
        let project = NewProject::for_repository(repo_name, description.as_deref(), archived);

        if self.options.dry_run {
            let id = self.next_placeholder_id;
            self.next_placeholder_id -= 1;
            info!(
                project = %project.name,
                lifecycle = project.status.as_str(),
                placeholder_id = id,
                "dry run: would create project"
            );
            self.snapshot.register_project(repo_key.to_string(), id);
            return Some((id, true));
        }

        match self.sink.create_project(&project).await {
            Ok(created) => {
                info!(project = %created.name, id = created.id, lifecycle = project.status.as_str(), "created project");
                self.snapshot.register_project(repo_key.to_string(), created.id);
                Some((created.id, true))
            }
            Err(err) => {
                error!(project = %project.name, error = %err, "project create failed; skipping issue");
                None
            }
        }
    }

    /// Apply the status drift rule to an existing task: at most one patch,
    /// and only when source and sink disagree across the open/done divide.
    async fn correct_drift(
        &mut self,
        dedup_key: &str,
        existing: &SinkTask,
        target_status: TaskStatus,
    ) -> IssueAction {
        let patch_to = match (target_status, existing.status) {
            (TaskStatus::Done, TaskStatus::Open) => TaskStatus::Done,
            (TaskStatus::Open, TaskStatus::Done) => TaskStatus::Open,
            _ => {
                debug!(task = %existing.name, status = existing.status.as_str(), "in sync");
                return IssueAction::InSync;
            }
        };

        // Tasks registered by a create this cycle have no sink-assigned id
        // yet; their create already carried the first occurrence's status,
        // and the next cycle reconciles from fresh sink truth.
        if existing.id <= 0 {
            debug!(task = %existing.name, "task created this cycle; deferring status to next cycle");
            return IssueAction::InSync;
        }

        if self.options.dry_run {
            info!(
                task = %existing.name,
                id = existing.id,
                to = patch_to.as_str(),
                "dry run: would update task status"
            );
            let mut updated = existing.clone();
            updated.status = patch_to;
            self.snapshot.register_task(dedup_key.to_string(), updated);
            return IssueAction::StatusUpdated(patch_to);
        }

        match self.sink.update_task_status(existing.id, patch_to).await {
            Ok(()) => {
                info!(task = %existing.name, id = existing.id, to = patch_to.as_str(), "updated task status");
                let mut updated = existing.clone();
                updated.status = patch_to;
                self.snapshot.register_task(dedup_key.to_string(), updated);
                IssueAction::StatusUpdated(patch_to)
            }
            Err(err) => {
                error!(task = %existing.name, id = existing.id, error = %err, "status patch failed");
                IssueAction::Skipped(SkipReason::StatusPatchFailed)
            }
        }
    }

    async fn create_task(
        &mut self,
        issue: &SourceIssue,
        project_id: i64,
        repo_key: &str,
        repo_name: &str,
        target_status: TaskStatus,
        dedup_key: &str,
    ) -> IssueAction {
        let task = self.build_task(issue, project_id, repo_key, repo_name, target_status);

        if self.options.dry_run {
            let id = self.next_placeholder_id;
            self.next_placeholder_id -= 1;
            info!(
                task = %task.name,
                status = target_status.as_str(),
                priority = task.priority.as_str(),
                placeholder_id = id,
                "dry run: would create task"
            );
            self.register_created(dedup_key, id, &task);
            return IssueAction::Created;
        }

        match self.sink.create_task(&task).await {
            Ok(()) => {
                info!(
                    task = %task.name,
                    status = target_status.as_str(),
                    priority = task.priority.as_str(),
                    project_id,
                    "created task"
                );
                // The sink-assigned id is not needed this cycle; register a
                // placeholder entry so a second issue mapping to the same
                // key is treated as already-existing.
                self.register_created(dedup_key, 0, &task);
                IssueAction::Created
            }
            Err(err) => {
                error!(task = %task.name, error = %err, "task create failed");
                IssueAction::Skipped(SkipReason::TaskCreateFailed)
            }
        }
    }

    fn register_created(&mut self, dedup_key: &str, id: i64, task: &NewTask) {
        self.snapshot.register_task(
            dedup_key.to_string(),
            SinkTask {
                id,
                name: task.name.clone(),
                status: task.status,
                project_id: task.project_id,
                uid: task.uid.clone(),
            },
        );
    }

    fn build_task(
        &self,
        issue: &SourceIssue,
        project_id: i64,
        repo_key: &str,
        repo_name: &str,
        status: TaskStatus,
    ) -> NewTask {
        let mut note = issue.body.clone().unwrap_or_default();
        note.push_str(&format!(
            "\n\n**GitHub Source**: [Issue #{}]({})",
            issue.number, issue.html_url
        ));

        NewTask {
            uid: self.options.dedup_strategy.issue_uid(repo_key, issue),
            name: issue.title.clone(),
            note,
            status,
            priority: TaskPriority::from_labels(&issue.labels),
            project_id,
            due_date: issue.due_on,
            tags: vec![repo_name.to_string(), self.options.source_tag.clone()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::IssueState;
    use crate::infrastructure::sink::MockTaskSink;
    use chrono::{TimeZone, Utc};

    fn issue(number: i64, title: &str, state: IssueState) -> SourceIssue {
        SourceIssue {
            id: number,
            number,
            title: title.to_string(),
            body: Some("Something is broken.".to_string()),
            state,
            labels: vec!["bug".to_string()],
            html_url: format!("https://github.com/me/widgets/issues/{number}"),
            repository: None,
            repository_url: Some("https://api.github.com/repos/me/widgets".to_string()),
            due_on: None,
        }
    }

    fn issue_with_repo(number: i64, title: &str, state: IssueState, archived: bool) -> SourceIssue {
        let mut issue = issue(number, title, state);
        issue.repository = Some(crate::domain::models::SourceRepository {
            id: 900,
            owner: "me".to_string(),
            name: "widgets".to_string(),
            description: Some("gadget factory".to_string()),
            archived,
        });
        issue
    }

    async fn engine_with(
        sink: &Arc<MockTaskSink>,
        options: ReconcilerOptions,
    ) -> Reconciler<MockTaskSink> {
        let snapshot = Snapshot::load(sink.as_ref(), options.dedup_strategy).await;
        Reconciler::new(sink.clone(), snapshot, options)
    }

    #[tokio::test]
    async fn new_issue_in_known_project_creates_one_task() {
        let sink = Arc::new(MockTaskSink::new());
        sink.seed_project(7, "widgets");
        let mut engine = engine_with(&sink, ReconcilerOptions::default()).await;

        let outcome = engine.reconcile(&issue(12, "Fix crash", IssueState::Open)).await;

        assert_eq!(outcome.action, IssueAction::Created);
        assert!(!outcome.created_project);
        assert_eq!(sink.created_projects().len(), 0);
        let created = sink.created_tasks();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].project_id, 7);
        assert_eq!(created[0].status, TaskStatus::Open);
        assert_eq!(created[0].priority, TaskPriority::Medium);
        assert!(created[0].note.contains("**GitHub Source**"));
        assert_eq!(created[0].tags, vec!["widgets".to_string(), "github".to_string()]);
    }

    #[tokio::test]
    async fn unknown_repository_creates_project_exactly_once() {
        let sink = Arc::new(MockTaskSink::new());
        let mut engine = engine_with(&sink, ReconcilerOptions::default()).await;

        let first = engine.reconcile(&issue(1, "First", IssueState::Open)).await;
        let second = engine.reconcile(&issue(2, "Second", IssueState::Open)).await;

        assert!(first.created_project);
        assert!(!second.created_project);
        assert_eq!(sink.created_projects().len(), 1);
        let created = sink.created_tasks();
        assert_eq!(created.len(), 2);
        // Both tasks landed in the project created for the first issue.
        assert_eq!(created[0].project_id, created[1].project_id);
    }

    #[tokio::test]
    async fn archived_repository_creates_done_project() {
        let sink = Arc::new(MockTaskSink::new());
        let mut engine = engine_with(&sink, ReconcilerOptions::default()).await;

        engine
            .reconcile(&issue_with_repo(1, "Old bug", IssueState::Open, true))
            .await;

        let projects = sink.created_projects();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].status, crate::domain::models::ProjectLifecycle::Done);
        assert_eq!(projects[0].description, "gadget factory");
    }

    #[tokio::test]
    async fn duplicate_issue_in_same_cycle_creates_one_task() {
        let sink = Arc::new(MockTaskSink::new());
        sink.seed_project(7, "widgets");
        let mut engine = engine_with(&sink, ReconcilerOptions::default()).await;

        let first = engine.reconcile(&issue(12, "Fix crash", IssueState::Open)).await;
        let second = engine.reconcile(&issue(12, "Fix crash", IssueState::Open)).await;

        assert_eq!(first.action, IssueAction::Created);
        assert_eq!(second.action, IssueAction::InSync);
        assert_eq!(sink.created_tasks().len(), 1);
    }

    #[tokio::test]
    async fn closed_issue_patches_open_task_to_done() {
        let sink = Arc::new(MockTaskSink::new());
        sink.seed_project(7, "widgets");
        sink.seed_task(SinkTask {
            id: 41,
            name: "Fix crash".to_string(),
            status: TaskStatus::Open,
            project_id: 7,
            uid: None,
        });
        let mut engine = engine_with(&sink, ReconcilerOptions::default()).await;

        let outcome = engine.reconcile(&issue(12, "Fix crash", IssueState::Closed)).await;

        assert_eq!(outcome.action, IssueAction::StatusUpdated(TaskStatus::Done));
        assert_eq!(sink.status_patches(), vec![(41, TaskStatus::Done)]);
        assert_eq!(sink.created_tasks().len(), 0);
    }

    #[tokio::test]
    async fn reopened_issue_patches_done_task_to_open() {
        let sink = Arc::new(MockTaskSink::new());
        sink.seed_project(7, "widgets");
        sink.seed_task(SinkTask {
            id: 41,
            name: "Fix crash".to_string(),
            status: TaskStatus::Done,
            project_id: 7,
            uid: None,
        });
        let mut engine = engine_with(&sink, ReconcilerOptions::default()).await;

        let outcome = engine.reconcile(&issue(12, "Fix crash", IssueState::Open)).await;

        assert_eq!(outcome.action, IssueAction::StatusUpdated(TaskStatus::Open));
        assert_eq!(sink.status_patches(), vec![(41, TaskStatus::Open)]);
    }

    #[tokio::test]
    async fn matching_statuses_patch_nothing() {
        let sink = Arc::new(MockTaskSink::new());
        sink.seed_project(7, "widgets");
        sink.seed_task(SinkTask {
            id: 41,
            name: "Fix crash".to_string(),
            status: TaskStatus::Open,
            project_id: 7,
            uid: None,
        });
        let mut engine = engine_with(&sink, ReconcilerOptions::default()).await;

        let outcome = engine.reconcile(&issue(12, "Fix crash", IssueState::Open)).await;

        assert_eq!(outcome.action, IssueAction::InSync);
        assert!(sink.status_patches().is_empty());
        assert!(sink.created_tasks().is_empty());
    }

    #[tokio::test]
    async fn project_create_failure_skips_issue_without_placeholder() {
        let sink = Arc::new(MockTaskSink::new());
        sink.fail_create_project(true);
        let mut engine = engine_with(&sink, ReconcilerOptions::default()).await;

        let outcome = engine.reconcile(&issue(1, "First", IssueState::Open)).await;

        assert_eq!(
            outcome.action,
            IssueAction::Skipped(SkipReason::ProjectCreateFailed)
        );
        assert!(sink.created_tasks().is_empty());
    }

    #[tokio::test]
    async fn task_create_failure_is_isolated_per_issue() {
        let sink = Arc::new(MockTaskSink::new());
        sink.seed_project(7, "widgets");
        sink.fail_create_task(true);
        let mut engine = engine_with(&sink, ReconcilerOptions::default()).await;

        let first = engine.reconcile(&issue(1, "Broken", IssueState::Open)).await;
        sink.fail_create_task(false);
        let second = engine.reconcile(&issue(2, "Fine", IssueState::Open)).await;

        assert_eq!(first.action, IssueAction::Skipped(SkipReason::TaskCreateFailed));
        assert_eq!(second.action, IssueAction::Created);
        assert_eq!(sink.created_tasks().len(), 1);
    }

    #[tokio::test]
    async fn dry_run_performs_no_mutating_calls_but_keeps_state_consistent() {
        let sink = Arc::new(MockTaskSink::new());
        let options = ReconcilerOptions {
            dry_run: true,
            ..ReconcilerOptions::default()
        };
        let mut engine = engine_with(&sink, options).await;

        let first = engine.reconcile(&issue(1, "First", IssueState::Open)).await;
        let second = engine.reconcile(&issue(2, "Second", IssueState::Open)).await;
        let duplicate = engine.reconcile(&issue(1, "First", IssueState::Open)).await;

        assert_eq!(first.action, IssueAction::Created);
        assert!(first.created_project);
        // Later issues resolve against the synthetic project id.
        assert_eq!(second.action, IssueAction::Created);
        assert!(!second.created_project);
        assert_eq!(duplicate.action, IssueAction::InSync);
        assert!(sink.created_projects().is_empty());
        assert!(sink.created_tasks().is_empty());
        assert!(sink.status_patches().is_empty());
    }

    #[tokio::test]
    async fn uid_strategy_stamps_created_tasks() {
        let sink = Arc::new(MockTaskSink::new());
        sink.seed_project(7, "widgets");
        let options = ReconcilerOptions {
            dedup_strategy: DedupStrategy::Uid,
            ..ReconcilerOptions::default()
        };
        let mut engine = engine_with(&sink, options).await;

        engine.reconcile(&issue(12, "Fix crash", IssueState::Open)).await;

        let created = sink.created_tasks();
        assert_eq!(created[0].uid.as_deref(), Some("widgets#12"));
    }

    #[tokio::test]
    async fn milestone_due_date_is_carried_onto_the_task() {
        let sink = Arc::new(MockTaskSink::new());
        sink.seed_project(7, "widgets");
        let mut engine = engine_with(&sink, ReconcilerOptions::default()).await;

        let due = Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).single().unwrap();
        let mut overdue = issue(12, "Ship it", IssueState::Open);
        overdue.due_on = Some(due);
        engine.reconcile(&overdue).await;

        assert_eq!(sink.created_tasks()[0].due_date, Some(due));
    }

    #[tokio::test]
    async fn urgent_label_creates_high_priority_task() {
        let sink = Arc::new(MockTaskSink::new());
        sink.seed_project(7, "widgets");
        let mut engine = engine_with(&sink, ReconcilerOptions::default()).await;

        let mut urgent = issue(12, "Hotfix", IssueState::Open);
        urgent.labels = vec!["Urgent-Fix".to_string()];
        engine.reconcile(&urgent).await;

        assert_eq!(sink.created_tasks()[0].priority, TaskPriority::High);
    }

    #[tokio::test]
    async fn issue_without_repository_identity_is_skipped() {
        let sink = Arc::new(MockTaskSink::new());
        let mut engine = engine_with(&sink, ReconcilerOptions::default()).await;

        let mut orphan = issue(1, "Lost", IssueState::Open);
        orphan.repository_url = None;
        let outcome = engine.reconcile(&orphan).await;

        assert_eq!(outcome.action, IssueAction::Skipped(SkipReason::NoRepository));
        assert!(sink.created_projects().is_empty());
        assert!(sink.created_tasks().is_empty());
    }
}
