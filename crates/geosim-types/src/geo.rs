//! Plain geographic coordinates.
//!
//! Coordinates are raw `(latitude, longitude)` pairs in degrees. The
//! simulator treats them as points in a flat plane: no normalization,
//! no wrapping at the antimeridian, no geodesic correction.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A `(latitude, longitude)` pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Coordinate {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Return this coordinate shifted by the given deltas.
    #[must_use]
    pub fn offset(self, d_lat: f64, d_lng: f64) -> Self {
        Self {
            lat: self.lat + d_lat,
            lng: self.lng + d_lng,
        }
    }

    /// `true` when neither component is NaN or infinite.
    pub const fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl core::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn offset_adds_component_wise() {
        let c = Coordinate::new(19.0, 72.5).offset(0.5, -0.25);
        assert_eq!(c, Coordinate::new(19.5, 72.25));
    }

    #[test]
    fn nan_is_not_finite() {
        assert!(Coordinate::new(10.0, 70.0).is_finite());
        assert!(!Coordinate::new(f64::NAN, 70.0).is_finite());
        assert!(!Coordinate::new(10.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn display_uses_six_decimals() {
        assert_eq!(
            Coordinate::new(19.076, 72.8777).to_string(),
            "(19.076000, 72.877700)"
        );
    }
}
