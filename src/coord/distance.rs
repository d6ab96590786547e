use crate::coord::{Coordinate, Ellipsoid};
use crate::core::constants::RAD;

// NGA degree length terms
// from https://msi.nga.mil/msisitecontent/staticfiles/calculators/degree.html
const M1: f64 = 111132.92;
const M2: f64 = -559.82;
const M3: f64 = 1.175;
const M4: f64 = -0.0023;
const P1: f64 = 111412.84;
const P2: f64 = -93.5;
const P3: f64 = 0.118;

/// Returns the arc lengths (meters per arc-second) of latitude and longitude at `latitude`.
///
/// Empirical WGS84 series matching the NGA reference tables, not a geometric
/// calculation.
pub fn calculate_sec_lengths(latitude: f64) -> (f64, f64) {
    let lat = latitude * RAD;
    let lat_len = (M1 + M2 * (2.0 * lat).cos() + M3 * (4.0 * lat).cos() + M4 * (6.0 * lat).cos())
        / 3600.0;
    let lng_len = (P1 * lat.cos() + P2 * (3.0 * lat).cos() + P3 * (5.0 * lat).cos()) / 3600.0;
    (lat_len, lng_len)
}

/// Great-circle distance in meters between two lng/lat coordinates on a sphere
/// with the ellipsoid's semi-major radius.
///
/// See <https://www.movable-type.co.uk/scripts/latlong.html>.
pub fn haversine_distance(pt1: &impl Coordinate, pt2: &impl Coordinate, earth: &Ellipsoid) -> f64 {
    let phi1 = pt1.y() * RAD;
    let phi2 = pt2.y() * RAD;
    let delta_phi = (pt2.y() - pt1.y()) * RAD;
    let delta_lambda = (pt2.x() - pt1.x()) * RAD;

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    earth.radius * c
}
