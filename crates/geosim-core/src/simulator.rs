//! Simulation loop controller.
//!
//! [`LocationSimulator`] owns the record-store connection lifecycle and
//! the recurring tick task. Its status moves through:
//!
//! ```text
//! Stopped ──start()──► Starting ──connect ok──► Running ──stop()──► Stopped
//!                          │
//!                          └──connect failed──► Faulted ──start()──► Starting
//! ```
//!
//! # Tick task
//!
//! `start()` spawns one task that waits one interval, runs an update
//! pass, and repeats. Passes never overlap: they run sequentially on that
//! task, the worker sits behind an async mutex shared with on-demand
//! passes, and ticks missed while a slow pass runs are skipped rather than
//! replayed in a burst.
//!
//! `stop()` signals the task and awaits it. A pass already in flight is
//! allowed to finish; every store call inside it is bounded by the
//! per-call timeout, so the wait is bounded too. Dropping the simulator
//! without calling `stop()` also ends the task at its next wake-up.

use std::sync::Arc;

use geosim_world::{DefaultRandom, RandomSource, RegionCatalog, RngSource};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::affinity::AffinityMap;
use crate::config::{ConfigError, SimulationConfig};
use crate::observer::{PassObserver, PassSummary, TracingObserver};
use crate::store::{RecordStore, StoreError};
use crate::worker::{SimulationWorker, SimulatorSettings, bounded};

/// Lifecycle state of a [`LocationSimulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatorStatus {
    /// Not running; `start()` may be called.
    Stopped,
    /// Connecting and running the initialization pass.
    Starting,
    /// The tick task is active.
    Running,
    /// The last `start()` could not reach the record store.
    Faulted,
}

/// Errors returned by the controller.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    /// The record store could not be connected during `start()`.
    #[error("record store unavailable at start: {source}")]
    StoreUnavailable {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// `start()` was called while already running.
    #[error("simulator is already running")]
    AlreadyRunning,

    /// The settings cannot drive a tick loop.
    #[error("invalid simulator settings: {reason}")]
    InvalidSettings {
        /// Which setting is unusable.
        reason: &'static str,
    },
}

struct Ticker {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Periodic location simulator over a [`RecordStore`].
pub struct LocationSimulator<S, R> {
    store: Arc<S>,
    worker: Arc<Mutex<SimulationWorker<S, R>>>,
    settings: SimulatorSettings,
    status: SimulatorStatus,
    ticker: Option<Ticker>,
}

impl<S: RecordStore> LocationSimulator<S, DefaultRandom> {
    /// Build a simulator from configuration with the default observer.
    ///
    /// Uses `simulator.seed` when set, an entropy-seeded generator
    /// otherwise, and [`TracingObserver`] for reporting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Regions`] if the configured regions do not
    /// form a valid catalog.
    pub fn from_config(store: Arc<S>, config: &SimulationConfig) -> Result<Self, ConfigError> {
        let catalog = Arc::new(config.region_catalog()?);
        Ok(Self::new(
            store,
            catalog,
            SimulatorSettings::from_config(config),
            RngSource::from_seed_option(config.simulator.seed),
            Box::new(TracingObserver),
        ))
    }
}

impl<S: RecordStore, R: RandomSource + Send + 'static> LocationSimulator<S, R> {
    /// Create a stopped simulator.
    pub fn new(
        store: Arc<S>,
        catalog: Arc<RegionCatalog>,
        settings: SimulatorSettings,
        rng: R,
        observer: Box<dyn PassObserver>,
    ) -> Self {
        let worker = SimulationWorker::new(
            Arc::clone(&store),
            catalog,
            settings.clone(),
            rng,
            observer,
        );
        Self {
            store,
            worker: Arc::new(Mutex::new(worker)),
            settings,
            status: SimulatorStatus::Stopped,
            ticker: None,
        }
    }

    /// Current lifecycle state.
    pub const fn status(&self) -> SimulatorStatus {
        self.status
    }

    /// `true` while the tick task is active.
    pub fn is_running(&self) -> bool {
        self.status == SimulatorStatus::Running
    }

    /// Connect to the store, initialize locations, and start ticking.
    ///
    /// A failed initialization pass (entities could not be listed) is
    /// reported to the observer but does not prevent the simulator from
    /// running; the first tick will try again.
    ///
    /// # Errors
    ///
    /// - [`SimulatorError::AlreadyRunning`] if the tick task is active.
    /// - [`SimulatorError::InvalidSettings`] if the tick interval, call
    ///   timeout, or write concurrency is zero. The status is unchanged.
    /// - [`SimulatorError::StoreUnavailable`] if `connect` fails or times
    ///   out. The status becomes [`SimulatorStatus::Faulted`]; no retry is
    ///   attempted.
    pub async fn start(&mut self) -> Result<(), SimulatorError> {
        if self.status == SimulatorStatus::Running {
            return Err(SimulatorError::AlreadyRunning);
        }
        self.settings.check()?;
        self.status = SimulatorStatus::Starting;
        info!(
            tick_interval_ms = u64::try_from(self.settings.tick_interval.as_millis()).unwrap_or(u64::MAX),
            "Location simulator starting"
        );

        if let Err(source) = bounded(self.settings.call_timeout, self.store.connect()).await {
            self.status = SimulatorStatus::Faulted;
            error!(error = %source, "Record store unavailable, simulator not started");
            return Err(SimulatorError::StoreUnavailable { source });
        }

        {
            let mut worker = self.worker.lock().await;
            if let Ok(summary) = worker.initialization_pass().await {
                info!(
                    entities = summary.entities_seen,
                    assigned = summary.assigned,
                    "Initialized entity locations"
                );
            }
        }

        let (shutdown, signal) = watch::channel(false);
        let task = tokio::spawn(run_ticks(
            Arc::clone(&self.worker),
            self.settings.tick_interval,
            signal,
        ));
        self.ticker = Some(Ticker { shutdown, task });
        self.status = SimulatorStatus::Running;
        info!("Location simulator running");
        Ok(())
    }

    /// Stop ticking and release the store connection.
    ///
    /// Waits for an in-flight pass to finish. Calling this when already
    /// stopped does nothing.
    pub async fn stop(&mut self) {
        let Some(ticker) = self.ticker.take() else {
            self.status = SimulatorStatus::Stopped;
            return;
        };

        let _ = ticker.shutdown.send(true);
        if let Err(e) = ticker.task.await {
            error!(error = %e, "Simulation task ended abnormally");
        }

        if tokio::time::timeout(self.settings.call_timeout, self.store.close())
            .await
            .is_err()
        {
            warn!("Record store close timed out");
        }

        self.status = SimulatorStatus::Stopped;
        info!("Location simulator stopped");
    }

    /// Run one update pass now, serialized with the tick task.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] if entities cannot be enumerated.
    pub async fn run_update_pass(&self) -> Result<PassSummary, StoreError> {
        self.worker.lock().await.update_pass().await
    }

    /// Run one initialization pass now, serialized with the tick task.
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] if entities cannot be enumerated.
    pub async fn run_initialization_pass(&self) -> Result<PassSummary, StoreError> {
        self.worker.lock().await.initialization_pass().await
    }

    /// A copy of the current entity-to-region affinities.
    pub async fn affinity_snapshot(&self) -> AffinityMap {
        self.worker.lock().await.affinity().clone()
    }
}

async fn run_ticks<S: RecordStore, R: RandomSource + Send>(
    worker: Arc<Mutex<SimulationWorker<S, R>>>,
    period: tokio::time::Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let first = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
    let mut interval = tokio::time::interval_at(first, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            _ = interval.tick() => {
                let mut worker = worker.lock().await;
                // Failures are already reported to the observer.
                let _ = worker.update_pass().await;
            }
        }
    }
}
