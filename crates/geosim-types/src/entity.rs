//! Tracked entity records and their embedded location.
//!
//! A [`TrackedEntity`] is the slice of an employee record the simulator
//! cares about: identity, display name, and the optional embedded
//! [`EntityLocation`]. Everything else on the record (salary, leave,
//! attendance) belongs to the record store and never passes through here.
//!
//! Field names on the wire follow the record store's JSON shape:
//! `lat`, `lng`, `city`, `lastUpdated`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::geo::Coordinate;
use crate::ids::EntityId;

/// Simulated position of an entity, embedded in its record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct EntityLocation {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Name of the region the entity is assigned to.
    #[serde(rename = "city")]
    pub region: String,
    /// When the simulator last wrote this location.
    pub last_updated: DateTime<Utc>,
}

impl EntityLocation {
    /// Build a location from a coordinate, region name, and timestamp.
    pub fn new(coordinate: Coordinate, region: impl Into<String>, last_updated: DateTime<Utc>) -> Self {
        Self {
            lat: coordinate.lat,
            lng: coordinate.lng,
            region: region.into(),
            last_updated,
        }
    }

    /// The position as a [`Coordinate`].
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// An entity whose position is simulated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct TrackedEntity {
    /// Record identity.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Current simulated location, absent until first assignment.
    pub location: Option<EntityLocation>,
    /// Record-level last-modified stamp, maintained by the record store.
    pub updated_at: DateTime<Utc>,
}

impl TrackedEntity {
    /// Create an entity with no location yet.
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            location: None,
            updated_at: Utc::now(),
        }
    }

    /// Attach a location, returning the updated entity.
    #[must_use]
    pub fn with_location(mut self, location: EntityLocation) -> Self {
        self.location = Some(location);
        self
    }
}
