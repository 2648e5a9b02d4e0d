//! Per-tick motion model for simulated entities.
//!
//! Each tick an entity either drifts toward its region center or jitters
//! in place, then gets clamped back onto its region's disk.
//!
//! # Draw order
//!
//! 1. Mode draw `U`. `U > drift_threshold` selects drift, else jitter.
//! 2. Latitude draw.
//! 3. Longitude draw.
//!
//! Drift scales each axis by its own draw, so the step is not a true
//! radial interpolation toward the center. That axis bias is kept on
//! purpose: changing it would alter the motion that existing dashboards
//! were calibrated against.

use geosim_types::Coordinate;
use serde::Deserialize;

use crate::random::RandomSource;
use crate::region::GeoRegion;
use crate::sampler;

/// Which branch of the motion model a step took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionMode {
    /// Moved a random fraction of the way toward the region center.
    Drift,
    /// Added small uniform noise to each axis.
    Jitter,
}

/// Parameters of the drift/jitter random walk.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionModel {
    /// Mode draws strictly above this value drift toward the center.
    pub drift_threshold: f64,
    /// Maximum fraction of the remaining distance covered by one drift.
    pub drift_rate: f64,
    /// Full width of the jitter noise; each axis moves by up to half of it.
    pub jitter_amplitude: f64,
}

impl Default for MotionModel {
    fn default() -> Self {
        Self {
            drift_threshold: 0.7,
            drift_rate: 0.1,
            jitter_amplitude: 0.05,
        }
    }
}

impl MotionModel {
    /// `true` when every parameter lies in `[0, 1]`.
    pub fn is_valid(&self) -> bool {
        [self.drift_threshold, self.drift_rate, self.jitter_amplitude]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }

    /// Compute the next position before boundary correction.
    pub fn propose(
        &self,
        current: Coordinate,
        region: &GeoRegion,
        rng: &mut (impl RandomSource + ?Sized),
    ) -> (MotionMode, Coordinate) {
        if rng.next_unit() > self.drift_threshold {
            let d_lat = (region.center.lat - current.lat) * self.drift_rate * rng.next_unit();
            let d_lng = (region.center.lng - current.lng) * self.drift_rate * rng.next_unit();
            (MotionMode::Drift, current.offset(d_lat, d_lng))
        } else {
            let d_lat = (rng.next_unit() - 0.5) * self.jitter_amplitude;
            let d_lng = (rng.next_unit() - 0.5) * self.jitter_amplitude;
            (MotionMode::Jitter, current.offset(d_lat, d_lng))
        }
    }

    /// Advance `current` by one tick and clamp it to `region`.
    pub fn step(
        &self,
        current: Coordinate,
        region: &GeoRegion,
        rng: &mut (impl RandomSource + ?Sized),
    ) -> Coordinate {
        let (_, proposed) = self.propose(current, region, rng);
        sampler::clamp_to_disk(proposed, region.center, region.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RngSource, SequenceSource};
    use crate::sampler::distance;

    const EPS: f64 = 1e-9;

    fn region() -> GeoRegion {
        GeoRegion::new("Pune", 18.5204, 73.8567, 0.3)
    }

    #[test]
    fn low_mode_draw_jitters() {
        let model = MotionModel::default();
        let start = region().center;
        let mut rng = SequenceSource::new(vec![0.7, 0.75, 0.25]);
        let (mode, next) = model.propose(start, &region(), &mut rng);
        assert_eq!(mode, MotionMode::Jitter);
        assert!((next.lat - (start.lat + 0.0125)).abs() < EPS);
        assert!((next.lng - (start.lng - 0.0125)).abs() < EPS);
    }

    #[test]
    fn high_mode_draw_drifts_with_per_axis_scale() {
        let model = MotionModel::default();
        let start = region().center.offset(0.2, -0.1);
        let mut rng = SequenceSource::new(vec![0.71, 1.0, 0.5]);
        let (mode, next) = model.propose(start, &region(), &mut rng);
        assert_eq!(mode, MotionMode::Drift);
        // lat closes 10% of its gap, lng only 5%.
        assert!((next.lat - (start.lat - 0.02)).abs() < EPS);
        assert!((next.lng - (start.lng + 0.005)).abs() < EPS);
    }

    #[test]
    fn drift_never_overshoots_center() {
        let model = MotionModel::default();
        let r = region();
        let start = r.center.offset(0.25, 0.1);
        let mut rng = SequenceSource::new(vec![0.99, 0.999, 0.999]);
        let next = model.step(start, &r, &mut rng);
        assert!(distance(next, r.center) < distance(start, r.center));
        assert!(next.lat > r.center.lat && next.lng > r.center.lng);
    }

    #[test]
    fn worst_case_jitter_at_boundary_is_clamped_to_rim() {
        let model = MotionModel::default();
        let r = region();
        // Sitting on the rim at a 45° bearing.
        let offset = r.radius / 2.0_f64.sqrt();
        let start = r.center.offset(offset, offset);
        let draws = [0.0, 0.999_999_999, 0.999_999_999];

        let (mode, proposed) = model.propose(start, &r, &mut SequenceSource::new(draws));
        assert_eq!(mode, MotionMode::Jitter);
        assert!(distance(proposed, r.center) > r.radius);

        let next = model.step(start, &r, &mut SequenceSource::new(draws));
        assert!((distance(next, r.center) - r.radius).abs() < EPS);
    }

    #[test]
    fn random_walk_stays_in_region() {
        let model = MotionModel::default();
        let r = region();
        let mut rng = RngSource::seeded(99);
        let mut pos = r.center;
        for _ in 0..5_000 {
            pos = model.step(pos, &r, &mut rng);
            assert!(distance(pos, r.center) <= r.radius + EPS);
        }
    }

    #[test]
    fn out_of_region_start_is_pulled_onto_rim() {
        let model = MotionModel::default();
        let r = region();
        let far = Coordinate::new(50.0, 73.8567);
        let next = model.step(far, &r, &mut RngSource::seeded(3));
        assert!((distance(next, r.center) - r.radius).abs() < EPS);
    }

    #[test]
    fn parameter_validation() {
        assert!(MotionModel::default().is_valid());
        let bad = MotionModel {
            drift_rate: 1.5,
            ..MotionModel::default()
        };
        assert!(!bad.is_valid());
    }
}
