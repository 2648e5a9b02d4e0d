//! Initialization and update passes over all tracked entities.
//!
//! A [`SimulationWorker`] owns everything a pass mutates: the affinity
//! map, the random source, and the observer. The controller keeps it
//! behind an async mutex so that a timer tick and an on-demand pass can
//! never sweep the same entities at the same time.
//!
//! # Pass structure
//!
//! ```text
//! find_all ──► per entity: decide (assign | step | skip)  [sequential, draws RNG]
//!          └─► persist pending writes                      [concurrent, bounded]
//!          └─► observer: entity failures, then the summary
//! ```
//!
//! Random draws stay sequential so a seeded run is reproducible no
//! matter how the writes interleave.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::StreamExt as _;
use geosim_types::{EntityId, EntityLocation, TrackedEntity};
use geosim_world::{BoundingEnvelope, GeoRegion, MotionModel, RandomSource, RegionCatalog};
use tracing::debug;

use crate::affinity::AffinityMap;
use crate::assigner;
use crate::config::SimulationConfig;
use crate::observer::{EntityFailure, PassKind, PassObserver, PassSummary};
use crate::simulator::SimulatorError;
use crate::store::{RecordStore, StoreError};

/// Tunables shared by the worker and the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorSettings {
    /// Time between update passes.
    pub tick_interval: Duration,
    /// Upper bound on any single record-store call.
    pub call_timeout: Duration,
    /// Location writes kept in flight at once within a pass.
    pub max_concurrent_writes: usize,
    /// Drift/jitter parameters.
    pub motion: MotionModel,
    /// Validity filter for stored coordinates.
    pub bounds: BoundingEnvelope,
}

impl SimulatorSettings {
    /// Extract the simulator settings from a loaded configuration.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            tick_interval: config.simulator.tick_interval(),
            call_timeout: config.simulator.store_call_timeout(),
            max_concurrent_writes: config.simulator.max_concurrent_writes.max(1),
            motion: config.motion,
            bounds: config.bounds,
        }
    }
}

impl SimulatorSettings {
    /// Reject values that would stall or panic the tick loop.
    ///
    /// # Errors
    ///
    /// Returns [`SimulatorError::InvalidSettings`] naming the first zero
    /// interval, timeout, or concurrency limit.
    pub const fn check(&self) -> Result<(), SimulatorError> {
        let reason = if self.tick_interval.is_zero() {
            "tick_interval must be positive"
        } else if self.call_timeout.is_zero() {
            "call_timeout must be positive"
        } else if self.max_concurrent_writes == 0 {
            "max_concurrent_writes must be positive"
        } else {
            return Ok(());
        };
        Err(SimulatorError::InvalidSettings { reason })
    }
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

/// Run a store call under `limit`, mapping expiry to [`StoreError::Timeout`].
pub(crate) async fn bounded<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    tokio::time::timeout(limit, call)
        .await
        .unwrap_or_else(|_| {
            Err(StoreError::Timeout {
                timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            })
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Assigned,
    Moved,
}

#[derive(Debug)]
struct PendingWrite {
    entity_id: EntityId,
    location: EntityLocation,
    change: Change,
}

/// Per-simulator mutable state and the pass logic that drives it.
pub struct SimulationWorker<S, R> {
    store: Arc<S>,
    catalog: Arc<RegionCatalog>,
    settings: SimulatorSettings,
    affinity: AffinityMap,
    rng: R,
    observer: Box<dyn PassObserver>,
}

impl<S: RecordStore, R: RandomSource + Send> SimulationWorker<S, R> {
    /// Create a worker with an empty affinity map.
    pub fn new(
        store: Arc<S>,
        catalog: Arc<RegionCatalog>,
        settings: SimulatorSettings,
        rng: R,
        observer: Box<dyn PassObserver>,
    ) -> Self {
        Self {
            store,
            catalog,
            settings,
            affinity: AffinityMap::new(),
            rng,
            observer,
        }
    }

    /// The worker's current affinity map.
    pub const fn affinity(&self) -> &AffinityMap {
        &self.affinity
    }

    /// The settings this worker runs with.
    pub const fn settings(&self) -> &SimulatorSettings {
        &self.settings
    }

    /// Give every entity with a missing or implausible location a fresh one.
    ///
    /// Entities whose stored coordinate lies inside the bounding envelope
    /// are left alone. Per-entity write failures are reported to the
    /// observer and do not fail the pass.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] from `find_all` if entities cannot be
    /// enumerated; the pass is abandoned and reported as aborted.
    pub async fn initialization_pass(&mut self) -> Result<PassSummary, StoreError> {
        let mut summary = PassSummary::begin(PassKind::Initialization);
        let entities = self.load(PassKind::Initialization).await?;
        summary.entities_seen = entities.len();

        let mut writes = Vec::new();
        for entity in &entities {
            let valid = entity
                .location
                .as_ref()
                .is_some_and(|loc| self.settings.bounds.contains(loc.coordinate()));
            if valid {
                summary.skipped = summary.skipped.saturating_add(1);
                continue;
            }
            writes.push(self.assign(entity.id));
        }

        self.persist(writes, &mut summary).await;
        self.observer.on_pass_complete(&summary);
        Ok(summary)
    }

    /// Advance every entity by one tick.
    ///
    /// Entities without a location are assigned one. The rest resolve
    /// their region (affinity, then stored region name, then random),
    /// take one motion step, and are clamped back into that region.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] from `find_all` if entities cannot be
    /// enumerated; the pass is abandoned and reported as aborted.
    pub async fn update_pass(&mut self) -> Result<PassSummary, StoreError> {
        let mut summary = PassSummary::begin(PassKind::Update);
        let entities = self.load(PassKind::Update).await?;
        summary.entities_seen = entities.len();

        let writes: Vec<PendingWrite> = entities.iter().map(|entity| self.advance(entity)).collect();

        self.persist(writes, &mut summary).await;
        self.observer.on_pass_complete(&summary);
        Ok(summary)
    }

    async fn load(&mut self, kind: PassKind) -> Result<Vec<TrackedEntity>, StoreError> {
        match bounded(self.settings.call_timeout, self.store.find_all()).await {
            Ok(entities) => Ok(entities),
            Err(e) => {
                self.observer.on_pass_aborted(kind, &e);
                Err(e)
            }
        }
    }

    fn assign(&mut self, entity_id: EntityId) -> PendingWrite {
        let location = assigner::assign(entity_id, &mut self.affinity, &self.catalog, &mut self.rng);
        debug!(
            entity_id = %entity_id,
            region = location.region.as_str(),
            lat = location.lat,
            lng = location.lng,
            "Assigned fresh location"
        );
        PendingWrite {
            entity_id,
            location,
            change: Change::Assigned,
        }
    }

    fn advance(&mut self, entity: &TrackedEntity) -> PendingWrite {
        let Some(current) = entity.location.as_ref() else {
            return self.assign(entity.id);
        };
        let region = self.resolve_region(entity.id, &current.region);
        let next = self
            .settings
            .motion
            .step(current.coordinate(), &region, &mut self.rng);
        let location = EntityLocation::new(next, region.name.as_str(), Utc::now());
        self.affinity.record(entity.id, region);
        PendingWrite {
            entity_id: entity.id,
            location,
            change: Change::Moved,
        }
    }

    fn resolve_region(&mut self, id: EntityId, stored: &str) -> GeoRegion {
        if let Some(region) = self.affinity.get(id) {
            return region.clone();
        }
        if let Some(region) = self.catalog.by_name(stored) {
            return region.clone();
        }
        let region = self.catalog.random_region(&mut self.rng).clone();
        debug!(
            entity_id = %id,
            stored_region = stored,
            region = region.name.as_str(),
            "Stored region not in catalog, picked one at random"
        );
        region
    }

    async fn persist(&mut self, writes: Vec<PendingWrite>, summary: &mut PassSummary) {
        let limit = self.settings.call_timeout;
        let store = Arc::clone(&self.store);
        let results: Vec<(PendingWrite, Result<(), StoreError>)> = futures::stream::iter(writes)
            .map(move |write| {
                let store = Arc::clone(&store);
                async move {
                    let result =
                        bounded(limit, store.update_location(write.entity_id, &write.location))
                            .await;
                    (write, result)
                }
            })
            .buffer_unordered(self.settings.max_concurrent_writes)
            .collect()
            .await;

        for (write, result) in results {
            match (result, write.change) {
                (Ok(()), Change::Assigned) => summary.assigned = summary.assigned.saturating_add(1),
                (Ok(()), Change::Moved) => summary.moved = summary.moved.saturating_add(1),
                (Err(error), _) => {
                    summary.failed = summary.failed.saturating_add(1);
                    self.observer.on_entity_failed(&EntityFailure {
                        kind: summary.kind,
                        entity_id: write.entity_id,
                        error,
                    });
                }
            }
        }
    }
}
