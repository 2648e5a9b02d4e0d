//! Disk sampling, planar distance, and boundary clamping.
//!
//! All geometry is done in raw degree space: a region's radius and the
//! distance between two coordinates are both plain Euclidean norms of
//! `(Δlat, Δlng)`. Longitude degrees shrink with latitude on the real
//! globe; the simulator deliberately ignores that so motion stays
//! identical to what deployed dashboards were tuned against.

use std::f64::consts::TAU;

use geosim_types::Coordinate;

use crate::random::RandomSource;

/// Draw a point uniformly distributed over the disk `(center, radius)`.
///
/// Uses `r = radius * sqrt(U1)` and `θ = U2 * 2π`. The square root keeps
/// the areal density uniform; a linear radius draw would crowd the center.
/// Latitude takes the cosine component and longitude the sine component.
pub fn sample_in_disk(
    center: Coordinate,
    radius: f64,
    rng: &mut (impl RandomSource + ?Sized),
) -> Coordinate {
    let r = radius * rng.next_unit().sqrt();
    let angle = rng.next_unit() * TAU;
    center.offset(r * angle.cos(), r * angle.sin())
}

/// Euclidean distance between two coordinates in degree space.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    (b.lat - a.lat).hypot(b.lng - a.lng)
}

/// Pull `point` back onto the disk boundary if it lies outside.
///
/// Points with `distance(point, center) <= radius` are returned as-is.
/// Others are projected onto the boundary along the bearing from `center`
/// through `point`.
pub fn clamp_to_disk(point: Coordinate, center: Coordinate, radius: f64) -> Coordinate {
    if distance(point, center) <= radius {
        return point;
    }
    let angle = (point.lng - center.lng).atan2(point.lat - center.lat);
    center.offset(radius * angle.cos(), radius * angle.sin())
}
