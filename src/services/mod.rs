//! Service layer: snapshot loading, reconciliation, cycle driving.

pub mod cycle;
pub mod reconciler;
pub mod snapshot;

pub use cycle::{CycleDriver, CycleSummary};
pub use reconciler::{IssueAction, IssueOutcome, Reconciler, ReconcilerOptions, SkipReason};
pub use snapshot::Snapshot;
