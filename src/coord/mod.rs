mod distance;
mod dms;
mod utm;

pub use distance::{calculate_sec_lengths, haversine_distance};
pub use dms::{Dms, LatLngDms, to_dms};
pub use utm::{
    Ellipsoid, Hemisphere, UtmCoord, UtmInfo, UtmProjector, Zone, utm_from_lat_lng,
    zone_from_lat_lng,
};

use geo_types::{Coord, Point};
use serde::{Deserialize, Serialize};

/// Trait for types that can provide x/y coordinates.
///
/// Implemented for `(f64, f64)` tuples, `geo_types::Point<f64>` and [`LatLng`].
/// For geographic values x is the longitude and y the latitude.
pub trait Coordinate {
    /// Returns the x-coordinate (longitude or easting).
    fn x(&self) -> f64;
    /// Returns the y-coordinate (latitude or northing).
    fn y(&self) -> f64;
}

impl Coordinate for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
}

impl Coordinate for Point<f64> {
    fn x(&self) -> f64 {
        Point::x(*self)
    }
    fn y(&self) -> f64 {
        Point::y(*self)
    }
}

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a `LatLng` from any x/y (lng/lat) coordinate.
    pub fn from_coord(c: &impl Coordinate) -> Self {
        Self::new(c.y(), c.x())
    }

    /// The DMS form of the latitude and longitude.
    pub fn to_dms(&self) -> [Dms; 2] {
        to_dms(self.lat, self.lng)
    }

    /// UTM zone and hemisphere for this position.
    pub fn to_utm_info(&self) -> UtmInfo {
        UtmInfo::from_lat_lng(*self)
    }

    /// `[lng, lat]`, the order map renderers expect.
    pub fn lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

impl Coordinate for LatLng {
    fn x(&self) -> f64 {
        self.lng
    }
    fn y(&self) -> f64 {
        self.lat
    }
}

impl From<LatLng> for Coord<f64> {
    fn from(ll: LatLng) -> Self {
        Coord {
            x: ll.lng,
            y: ll.lat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_trait_tuple() {
        let tuple = (100.0, 200.0);
        assert_eq!(tuple.x(), 100.0);
        assert_eq!(tuple.y(), 200.0);
    }

    #[test]
    fn test_lat_lng_from_point() {
        let ll = LatLng::from_coord(&Point::new(-117.16, 32.71));
        assert_eq!(ll.lat, 32.71);
        assert_eq!(ll.lng, -117.16);
        assert_eq!(ll.lng_lat(), [-117.16, 32.71]);

        let c: Coord<f64> = ll.into();
        assert_eq!(c.x, -117.16);
    }
}
