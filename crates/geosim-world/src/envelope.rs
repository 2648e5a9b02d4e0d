//! Coarse geographic sanity filter for stored coordinates.
//!
//! The envelope is not a per-region containment check. It only decides
//! whether a stored coordinate is plausible enough to keep at start-up;
//! anything outside gets a fresh assignment.

use geosim_types::Coordinate;
use serde::Deserialize;

/// Inclusive latitude/longitude bounding box.
///
/// Defaults to the reference deployment's box around India.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoundingEnvelope {
    /// Southern edge in degrees.
    pub min_lat: f64,
    /// Northern edge in degrees.
    pub max_lat: f64,
    /// Western edge in degrees.
    pub min_lng: f64,
    /// Eastern edge in degrees.
    pub max_lng: f64,
}

impl Default for BoundingEnvelope {
    fn default() -> Self {
        Self {
            min_lat: 8.0,
            max_lat: 37.0,
            min_lng: 68.0,
            max_lng: 97.0,
        }
    }
}

impl BoundingEnvelope {
    /// `true` when `c` lies inside the box, edges included.
    ///
    /// NaN components are never contained.
    pub fn contains(&self, c: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&c.lat)
            && (self.min_lng..=self.max_lng).contains(&c.lng)
    }

    /// `true` when both ranges are finite and not inverted.
    pub fn is_well_formed(&self) -> bool {
        [self.min_lat, self.max_lat, self.min_lng, self.max_lng]
            .iter()
            .all(|v| v.is_finite())
            && self.min_lat <= self.max_lat
            && self.min_lng <= self.max_lng
    }
}
