//! Shared type definitions for the geosim location simulator.
//!
//! Types here flow to the dashboard front end via `ts-rs` bindings, so
//! their serialized shape is part of the public contract.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for entity identifiers
//! - [`geo`] -- Flat `(lat, lng)` coordinates
//! - [`entity`] -- Tracked entity records and their embedded location

pub mod entity;
pub mod geo;
pub mod ids;

pub use entity::{EntityLocation, TrackedEntity};
pub use geo::Coordinate;
pub use ids::EntityId;
