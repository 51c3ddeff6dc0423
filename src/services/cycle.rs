//! Cycle driver.
//!
//! Orchestrates one reconciliation pass: fetch the actor, collect the
//! bounded issue working set from both source feeds, load the sink
//! snapshot, fold the engine over the issues, and emit one summary event.
//! The outer loop serializes cycles by awaiting each run before the next
//! tick; nothing here is re-entrant.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::errors::SyncResult;
use crate::domain::models::{SourceIssue, SyncConfig};
use crate::domain::ports::{IssueSource, TaskSink};
use crate::services::reconciler::{IssueAction, IssueOutcome, Reconciler, ReconcilerOptions};
use crate::services::snapshot::Snapshot;

/// Aggregated result of one reconciliation cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub issues_processed: usize,
    pub projects_created: usize,
    pub tasks_created: usize,
    pub statuses_updated: usize,
    pub in_sync: usize,
    pub skipped: usize,
    pub write_failures: usize,
}

impl CycleSummary {
    fn new(run_id: Uuid, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            started_at,
            finished_at: started_at,
            issues_processed: 0,
            projects_created: 0,
            tasks_created: 0,
            statuses_updated: 0,
            in_sync: 0,
            skipped: 0,
            write_failures: 0,
        }
    }

    fn record(&mut self, outcome: &IssueOutcome) {
        self.issues_processed += 1;
        if outcome.created_project {
            self.projects_created += 1;
        }
        match outcome.action {
            IssueAction::Created => self.tasks_created += 1,
            IssueAction::StatusUpdated(_) => self.statuses_updated += 1,
            IssueAction::InSync => self.in_sync += 1,
            IssueAction::Skipped(reason) => {
                if reason.is_write_failure() {
                    self.write_failures += 1;
                } else {
                    self.skipped += 1;
                }
            }
        }
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Drives reconciliation cycles against a source and a sink.
pub struct CycleDriver<Src: IssueSource, Snk: TaskSink> {
    source: Arc<Src>,
    sink: Arc<Snk>,
    sync: SyncConfig,
}

impl<Src: IssueSource, Snk: TaskSink> CycleDriver<Src, Snk> {
    pub fn new(source: Arc<Src>, sink: Arc<Snk>, sync: SyncConfig) -> Self {
        Self { source, sink, sync }
    }

    /// Run one reconciliation cycle.
    ///
    /// Fails only when the source actor cannot be resolved (an auth or
    /// transport failure there means no feed is trustworthy); everything
    /// downstream degrades per-feed or per-item instead.
    pub async fn run_once(&self) -> SyncResult<CycleSummary> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(%run_id, dry_run = self.sync.dry_run, "starting reconciliation cycle");

        let actor = self.source.current_actor().await?;
        let issues = self.collect_issues(&actor).await;

        let snapshot = Snapshot::load(self.sink.as_ref(), self.sync.dedup_strategy).await;
        info!(
            %run_id,
            actor = %actor,
            issues = issues.len(),
            projects = snapshot.project_count(),
            tasks = snapshot.task_count(),
            "loaded working set"
        );

        let mut engine = Reconciler::new(
            self.sink.clone(),
            snapshot,
            ReconcilerOptions::from(&self.sync),
        );
        let mut summary = CycleSummary::new(run_id, started_at);
        for issue in &issues {
            let outcome = engine.reconcile(issue).await;
            summary.record(&outcome);
        }
        summary.finished_at = Utc::now();

        info!(
            %run_id,
            issues = summary.issues_processed,
            projects_created = summary.projects_created,
            tasks_created = summary.tasks_created,
            statuses_updated = summary.statuses_updated,
            in_sync = summary.in_sync,
            skipped = summary.skipped,
            write_failures = summary.write_failures,
            duration_ms = summary.duration_ms(),
            "cycle complete"
        );
        Ok(summary)
    }

    /// Run cycles on the configured interval until ctrl-c.
    ///
    /// The first cycle runs immediately. Each run is awaited before the
    /// next tick is honored, so cycles never overlap; a run that outlasts
    /// the interval simply delays the next one.
    pub async fn run_loop(&self) {
        let period = Duration::from_secs(self.sync.interval_secs);
        let mut timer = tokio::time::interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_secs = self.sync.interval_secs, "starting sync service");

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    if let Err(err) = self.run_once().await {
                        error!(error = %err, "cycle aborted");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown requested; stopping sync service");
                    break;
                }
            }
        }
    }

    /// Collect the cycle's working set: assigned issues first, then issues
    /// from the actor's own repositories, deduplicated by tracker-global
    /// issue id. Feed failures degrade with a warning; a cycle with a
    /// partial working set still reconciles what it has.
    async fn collect_issues(&self, login: &str) -> Vec<SourceIssue> {
        let mut seen: HashSet<i64> = HashSet::new();
        let mut issues: Vec<SourceIssue> = Vec::new();

        match self.source.assigned_issues(login).await {
            Ok(assigned) => {
                for issue in assigned {
                    if seen.insert(issue.id) {
                        issues.push(issue);
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "assigned-issue search failed; continuing with repository feed");
            }
        }

        match self.source.owned_repositories(login).await {
            Ok(repos) => {
                for repo in repos {
                    match self.source.repository_issues(&repo).await {
                        Ok(list) => {
                            for issue in list {
                                if seen.insert(issue.id) {
                                    issues.push(issue);
                                }
                            }
                        }
                        Err(err) => {
                            warn!(repo = %repo.name, error = %err, "repository issue listing failed; skipping repository");
                        }
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "owned-repository listing failed");
            }
        }

        issues
    }
}
