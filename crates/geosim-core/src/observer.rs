//! Structured reporting of pass outcomes and per-entity failures.
//!
//! The worker never logs failures directly. It reports them to a
//! [`PassObserver`], which the owning process chooses: [`TracingObserver`]
//! in production, a recording observer in tests, [`NoOpObserver`] when
//! nobody cares.

use chrono::{DateTime, Utc};
use geosim_types::EntityId;
use tracing::{error, info, warn};

use crate::store::StoreError;

/// Which kind of sweep produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// The one-off sweep performed by `start()`.
    Initialization,
    /// A recurring tick.
    Update,
}

impl core::fmt::Display for PassKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Initialization => f.write_str("initialization"),
            Self::Update => f.write_str("update"),
        }
    }
}

/// Outcome counts for one completed pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassSummary {
    /// Which sweep this was.
    pub kind: PassKind,
    /// When the pass began.
    pub started_at: DateTime<Utc>,
    /// Entities returned by the store.
    pub entities_seen: usize,
    /// Entities given a fresh location and persisted.
    pub assigned: usize,
    /// Entities advanced one motion step and persisted.
    pub moved: usize,
    /// Entities left untouched (valid location during initialization).
    pub skipped: usize,
    /// Entities whose write failed or timed out.
    pub failed: usize,
}

impl PassSummary {
    /// An empty summary for a pass starting now.
    pub fn begin(kind: PassKind) -> Self {
        Self {
            kind,
            started_at: Utc::now(),
            entities_seen: 0,
            assigned: 0,
            moved: 0,
            skipped: 0,
            failed: 0,
        }
    }

    /// Entities whose new location reached the store.
    pub const fn persisted(&self) -> usize {
        self.assigned.saturating_add(self.moved)
    }
}

/// One entity whose update could not be persisted.
#[derive(Debug, Clone)]
pub struct EntityFailure {
    /// The pass in which it failed.
    pub kind: PassKind,
    /// The affected entity.
    pub entity_id: EntityId,
    /// What went wrong.
    pub error: StoreError,
}

/// Receiver of pass events.
///
/// Called from the simulation task; implementations should return quickly.
pub trait PassObserver: Send {
    /// A pass finished, possibly with some per-entity failures.
    fn on_pass_complete(&mut self, summary: &PassSummary);

    /// One entity's update failed; the pass continues.
    fn on_entity_failed(&mut self, failure: &EntityFailure);

    /// The pass was abandoned because entities could not be enumerated.
    fn on_pass_aborted(&mut self, kind: PassKind, error: &StoreError);
}

/// Observer that writes every event to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PassObserver for TracingObserver {
    fn on_pass_complete(&mut self, summary: &PassSummary) {
        let elapsed_ms = Utc::now()
            .signed_duration_since(summary.started_at)
            .num_milliseconds();
        info!(
            kind = %summary.kind,
            entities = summary.entities_seen,
            assigned = summary.assigned,
            moved = summary.moved,
            skipped = summary.skipped,
            failed = summary.failed,
            elapsed_ms,
            "Location pass complete"
        );
    }

    fn on_entity_failed(&mut self, failure: &EntityFailure) {
        warn!(
            kind = %failure.kind,
            entity_id = %failure.entity_id,
            error = %failure.error,
            "Failed to persist entity location"
        );
    }

    fn on_pass_aborted(&mut self, kind: PassKind, error: &StoreError) {
        error!(kind = %kind, error = %error, "Location pass abandoned");
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl PassObserver for NoOpObserver {
    fn on_pass_complete(&mut self, _summary: &PassSummary) {}

    fn on_entity_failed(&mut self, _failure: &EntityFailure) {}

    fn on_pass_aborted(&mut self, _kind: PassKind, _error: &StoreError) {}
}
