//! Sticky entity-to-region assignments.
//!
//! The map lives inside one simulation worker. Two simulators in the same
//! process (one per tenant, one per test) never share affinities. Nothing
//! is persisted: after a restart an entity recovers its region lazily,
//! the first time an update pass matches its stored region name against
//! the catalog.

use std::collections::BTreeMap;

use geosim_types::EntityId;
use geosim_world::GeoRegion;

/// Mapping from entity to its current region.
#[derive(Debug, Clone, Default)]
pub struct AffinityMap {
    regions: BTreeMap<EntityId, GeoRegion>,
}

impl AffinityMap {
    /// Create an empty map.
    pub const fn new() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }

    /// The region `id` is currently bound to, if any.
    pub fn get(&self, id: EntityId) -> Option<&GeoRegion> {
        self.regions.get(&id)
    }

    /// Bind `id` to `region`, replacing any earlier binding.
    pub fn record(&mut self, id: EntityId, region: GeoRegion) {
        self.regions.insert(id, region);
    }

    /// Number of bound entities.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// `true` when no entity is bound.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
