//! Simulation loop, location assignment, and configuration for geosim.
//!
//! This crate owns the recurring tick that keeps every tracked entity's
//! simulated position moving inside its region, and the contract it uses
//! to read and write entity records.
//!
//! # Modules
//!
//! - [`affinity`] -- Per-simulator entity-to-region bindings.
//! - [`assigner`] -- Fresh location assignment for one entity.
//! - [`config`] -- Configuration loading from `geosim-config.yaml` into
//!   strongly-typed structs.
//! - [`observer`] -- [`PassObserver`] events for pass outcomes and
//!   per-entity failures.
//! - [`simulator`] -- [`LocationSimulator`] lifecycle and tick task.
//! - [`store`] -- [`RecordStore`] contract and [`StoreError`].
//! - [`worker`] -- Initialization and update passes.
//!
//! [`PassObserver`]: observer::PassObserver
//! [`LocationSimulator`]: simulator::LocationSimulator
//! [`RecordStore`]: store::RecordStore
//! [`StoreError`]: store::StoreError

pub mod affinity;
pub mod assigner;
pub mod config;
pub mod observer;
pub mod simulator;
pub mod store;
pub mod worker;

pub use affinity::AffinityMap;
pub use config::{ConfigError, SimulationConfig};
pub use observer::{EntityFailure, NoOpObserver, PassKind, PassObserver, PassSummary, TracingObserver};
pub use simulator::{LocationSimulator, SimulatorError, SimulatorStatus};
pub use store::{RecordStore, StoreError};
pub use worker::{SimulationWorker, SimulatorSettings};
