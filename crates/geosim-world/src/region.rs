//! Named service regions and the process-wide region catalog.
//!
//! A [`GeoRegion`] is a disk: a center coordinate plus a containment
//! radius in degree space. The [`RegionCatalog`] is built once at start-up,
//! validated, and shared read-only by every simulation worker.
//!
//! # Reference catalog
//!
//! | Region    | Lat     | Lng     | Radius |
//! |-----------|---------|---------|--------|
//! | Mumbai    | 19.0760 | 72.8777 | 0.3    |
//! | Delhi     | 28.7041 | 77.1025 | 0.4    |
//! | Bangalore | 12.9716 | 77.5946 | 0.5    |
//! | Hyderabad | 17.3850 | 78.4867 | 0.3    |
//! | Chennai   | 13.0827 | 80.2707 | 0.3    |
//! | Kolkata   | 22.5726 | 88.3639 | 0.3    |
//! | Pune      | 18.5204 | 73.8567 | 0.3    |
//! | Ahmedabad | 23.0225 | 72.5714 | 0.3    |
//! | Jaipur    | 26.9124 | 75.7873 | 0.3    |
//! | Lucknow   | 26.8467 | 80.9462 | 0.3    |

use std::collections::BTreeSet;

use geosim_types::Coordinate;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::random::RandomSource;
use crate::sampler;

/// A named service area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRegion {
    /// Unique region name; stored on each entity location as `city`.
    pub name: String,
    /// Center of the containment disk.
    pub center: Coordinate,
    /// Containment radius, in the same degree units as the coordinates.
    pub radius: f64,
}

impl GeoRegion {
    /// Create a region.
    pub fn new(name: impl Into<String>, lat: f64, lng: f64, radius: f64) -> Self {
        Self {
            name: name.into(),
            center: Coordinate::new(lat, lng),
            radius,
        }
    }

    /// `true` when `point` lies inside or on the containment disk.
    pub fn contains(&self, point: Coordinate) -> bool {
        sampler::distance(point, self.center) <= self.radius
    }
}

/// The reference deployment's regions.
pub fn default_regions() -> Vec<GeoRegion> {
    vec![
        GeoRegion::new("Mumbai", 19.0760, 72.8777, 0.3),
        GeoRegion::new("Delhi", 28.7041, 77.1025, 0.4),
        GeoRegion::new("Bangalore", 12.9716, 77.5946, 0.5),
        GeoRegion::new("Hyderabad", 17.3850, 78.4867, 0.3),
        GeoRegion::new("Chennai", 13.0827, 80.2707, 0.3),
        GeoRegion::new("Kolkata", 22.5726, 88.3639, 0.3),
        GeoRegion::new("Pune", 18.5204, 73.8567, 0.3),
        GeoRegion::new("Ahmedabad", 23.0225, 72.5714, 0.3),
        GeoRegion::new("Jaipur", 26.9124, 75.7873, 0.3),
        GeoRegion::new("Lucknow", 26.8467, 80.9462, 0.3),
    ]
}

/// Immutable, non-empty, ordered set of regions with unique names.
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    regions: Vec<GeoRegion>,
}

impl RegionCatalog {
    /// Validate and build a catalog.
    ///
    /// # Errors
    ///
    /// - [`WorldError::EmptyCatalog`] if `regions` is empty.
    /// - [`WorldError::DuplicateRegion`] if two regions share a name.
    /// - [`WorldError::InvalidRadius`] if a radius is not finite and positive.
    /// - [`WorldError::InvalidCenter`] if a center has a non-finite component.
    pub fn new(regions: Vec<GeoRegion>) -> Result<Self, WorldError> {
        if regions.is_empty() {
            return Err(WorldError::EmptyCatalog);
        }
        let mut seen = BTreeSet::new();
        for region in &regions {
            if !seen.insert(region.name.as_str()) {
                return Err(WorldError::DuplicateRegion(region.name.clone()));
            }
            if !region.radius.is_finite() || region.radius <= 0.0 {
                return Err(WorldError::InvalidRadius {
                    name: region.name.clone(),
                    radius: region.radius,
                });
            }
            if !region.center.is_finite() {
                return Err(WorldError::InvalidCenter(region.name.clone()));
            }
        }
        tracing::debug!(regions = regions.len(), "Region catalog built");
        Ok(Self { regions })
    }

    /// Catalog of [`default_regions`].
    pub fn reference() -> Self {
        Self {
            regions: default_regions(),
        }
    }

    /// All regions in catalog order.
    pub fn all_regions(&self) -> &[GeoRegion] {
        &self.regions
    }

    /// Look up a region by exact name.
    pub fn by_name(&self, name: &str) -> Option<&GeoRegion> {
        self.regions.iter().find(|r| r.name == name)
    }

    /// Pick a region uniformly at random.
    // `new` rejects empty catalogs and `next_index` stays below `len`.
    #[allow(clippy::indexing_slicing)]
    pub fn random_region(&self, rng: &mut (impl RandomSource + ?Sized)) -> &GeoRegion {
        let index = rng.next_index(self.regions.len());
        &self.regions[index]
    }
}

impl Default for RegionCatalog {
    fn default() -> Self {
        Self::reference()
    }
}
