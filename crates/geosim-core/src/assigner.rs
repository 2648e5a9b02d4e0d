//! Fresh location assignment for a single entity.

use chrono::Utc;
use geosim_types::{EntityId, EntityLocation};
use geosim_world::{RandomSource, RegionCatalog, sample_in_disk};

use crate::affinity::AffinityMap;

/// Give `id` a new position inside its region.
///
/// Reuses the entity's affinity-mapped region when there is one, otherwise
/// picks a random catalog region and records it as the new affinity. The
/// returned location is stamped with the current time; persisting it is
/// the caller's job.
pub fn assign(
    id: EntityId,
    affinity: &mut AffinityMap,
    catalog: &RegionCatalog,
    rng: &mut (impl RandomSource + ?Sized),
) -> EntityLocation {
    let region = affinity
        .get(id)
        .map_or_else(|| catalog.random_region(rng).clone(), Clone::clone);
    let coordinate = sample_in_disk(region.center, region.radius, rng);
    let location = EntityLocation::new(coordinate, region.name.as_str(), Utc::now());
    affinity.record(id, region);
    location
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use geosim_world::{GeoRegion, RngSource, SequenceSource};

    use super::*;

    #[test]
    fn assigns_random_region_and_records_affinity() {
        let catalog = RegionCatalog::reference();
        let mut affinity = AffinityMap::new();
        let id = EntityId::new();
        // 0.25 -> index 2 (Bangalore), then rim sample at angle 0.
        let mut rng = SequenceSource::new(vec![0.25, 1.0, 0.0]);

        let location = assign(id, &mut affinity, &catalog, &mut rng);

        assert_eq!(location.region, "Bangalore");
        assert_eq!(affinity.get(id).unwrap().name, "Bangalore");
        let bangalore = catalog.by_name("Bangalore").unwrap();
        assert!((location.lat - (bangalore.center.lat + 0.5)).abs() < 1e-9);
        assert!((location.lng - bangalore.center.lng).abs() < 1e-9);
    }

    #[test]
    fn existing_affinity_is_reused() {
        let catalog = RegionCatalog::reference();
        let mut affinity = AffinityMap::new();
        let id = EntityId::new();
        let chennai = catalog.by_name("Chennai").unwrap().clone();
        affinity.record(id, chennai.clone());

        let mut rng = RngSource::seeded(5);
        for _ in 0..50 {
            let location = assign(id, &mut affinity, &catalog, &mut rng);
            assert_eq!(location.region, "Chennai");
            assert!(chennai.contains(location.coordinate()));
        }
    }

    #[test]
    fn affinity_region_outside_catalog_is_still_honored() {
        let catalog = RegionCatalog::reference();
        let mut affinity = AffinityMap::new();
        let id = EntityId::new();
        let custom = GeoRegion::new("Goa", 15.49, 73.82, 0.2);
        affinity.record(id, custom.clone());

        let location = assign(id, &mut affinity, &catalog, &mut RngSource::seeded(1));
        assert_eq!(location.region, "Goa");
        assert!(custom.contains(location.coordinate()));
    }

    #[test]
    fn assigned_location_is_in_catalog_region() {
        let catalog = RegionCatalog::reference();
        let mut affinity = AffinityMap::new();
        let mut rng = RngSource::seeded(77);
        for _ in 0..200 {
            let id = EntityId::new();
            let location = assign(id, &mut affinity, &catalog, &mut rng);
            let region = catalog.by_name(&location.region).unwrap();
            assert!(region.contains(location.coordinate()));
        }
        assert_eq!(affinity.len(), 200);
    }
}
