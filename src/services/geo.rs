//! Great-circle distance on a spherical Earth.
//!
//! The haversine model differs from an ellipsoidal one by at most ~0.5%, which
//! is well inside the tolerance of a tens-to-thousands-of-meters office radius.

use crate::database::models::Coordinates;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

pub fn distance_meters(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude().to_radians();
    let lat2 = to.latitude().to_radians();
    // Absolute deltas keep the result bit-for-bit symmetric in its arguments
    let d_lat = (to.latitude() - from.latitude()).abs().to_radians();
    let d_lon = (to.longitude() - from.longitude()).abs().to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair past 1.0 for antipodal points
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_METERS * c
}
