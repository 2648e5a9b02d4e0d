//! Geography and motion for the geosim location simulator.
//!
//! Everything in this crate is pure: no I/O, no clocks, and all
//! randomness injected through [`RandomSource`].
//!
//! # Modules
//!
//! - [`envelope`] -- Coarse bounding box used to sanity-check stored
//!   coordinates.
//! - [`error`] -- Error types for catalog construction.
//! - [`motion`] -- Drift/jitter random walk with boundary correction.
//! - [`random`] -- [`RandomSource`] trait, a `rand`-backed source, and a
//!   scripted source for tests.
//! - [`region`] -- [`GeoRegion`] disks and the [`RegionCatalog`].
//! - [`sampler`] -- Uniform disk sampling, planar distance, and clamping.
//!
//! [`RandomSource`]: random::RandomSource
//! [`GeoRegion`]: region::GeoRegion
//! [`RegionCatalog`]: region::RegionCatalog

pub mod envelope;
pub mod error;
pub mod motion;
pub mod random;
pub mod region;
pub mod sampler;

// Re-export primary types at crate root.
pub use envelope::BoundingEnvelope;
pub use error::WorldError;
pub use motion::{MotionMode, MotionModel};
pub use random::{DefaultRandom, RandomSource, RngSource, SequenceSource};
pub use region::{GeoRegion, RegionCatalog, default_regions};
pub use sampler::{clamp_to_disk, distance, sample_in_disk};
