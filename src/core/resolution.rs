//! Conversions between paper scale, DPI, web mercator zoom and ground
//! resolution (meters per pixel).
//!
//! Formulas follow the Bing Maps tile system
//! (<https://docs.microsoft.com/en-us/bingmaps/articles/bing-maps-tile-system>).
//! All latitudes are in decimal degrees. Latitude enters through `cos(lat)`,
//! so values near the poles degrade but never panic.

use crate::coord::{Ellipsoid, LatLng, UtmProjector};
use crate::core::constants::{METERS_PER_INCH, RAD, TILE_SIZE};
use crate::error::AtlasError;
use tracing::debug;

/// Ground distance covered by one device pixel when printing at `scale` (1:scale) and `dpi`.
fn ground_for_scale(scale: u32, dpi: u32) -> f64 {
    scale as f64 * METERS_PER_INCH / dpi as f64
}

/// Returns the zoom value for the given scale, dpi, and latitude.
///
/// # Example
/// ```
/// use atlas_sheets::{zoom, MERCATOR_EARTH_CIRCUMFERENCE};
///
/// let z = zoom(MERCATOR_EARTH_CIRCUMFERENCE, 50000, 96, 32.715736);
/// assert!((z - 13.281348714459781).abs() < 1e-9);
/// ```
pub fn zoom(earth_circumference: f64, scale: u32, dpi: u32, lat: f64) -> f64 {
    let width = (lat * RAD).cos();
    let ground = ground_for_scale(scale, dpi);
    let map_width = (width * earth_circumference) / ground;
    debug!(
        ground,
        width,
        map_width,
        tiles = map_width / TILE_SIZE,
        "zoom for scale {scale} at {dpi} dpi"
    );
    (map_width / TILE_SIZE).log2()
}

/// Returns the zoom at which a map `map_width` meters wide fills whole pixels at the
/// given scale and dpi.
pub fn zoom_map_width(scale: u32, dpi: u32, map_width: f64) -> f64 {
    let ground = ground_for_scale(scale, dpi);
    (map_width / ground).log2()
}

/// Returns the ground resolution (meter/pixel) at the zoom and latitude.
pub fn ground(earth_circumference: f64, zoom: f64, lat: f64) -> f64 {
    let map_width = TILE_SIZE * zoom.exp2();
    let width = (lat * RAD).cos();
    width * earth_circumference / map_width
}

/// Returns the map scale for the given dpi and ground resolution.
pub fn scale(dpi: u32, ground: f64) -> f64 {
    ground * (dpi as f64 / METERS_PER_INCH)
}

/// Length in meters of the parallel at `lat`.
pub fn lat_in_meters(earth_circumference: f64, lat: f64) -> f64 {
    (lat * RAD).cos() * earth_circumference
}

/// Returns the zoom for the given ground resolution. Inverse of [`ground`].
pub fn zoom_for_ground(earth_circumference: f64, ground: f64, lat: f64) -> f64 {
    let width = (lat * RAD).cos();
    ((width * earth_circumference) / (ground * TILE_SIZE)).log2()
}

/// Projects both corners into the UTM zone of `sw`.
fn utm_deltas(sw: LatLng, ne: LatLng, ellipsoid: &Ellipsoid) -> Result<(f64, f64), AtlasError> {
    let projector = UtmProjector::for_lat_lng(sw, ellipsoid)?;
    let utm_sw = projector.project(sw)?;
    let utm_ne = projector.project(ne)?;
    Ok((
        (utm_ne.easting - utm_sw.easting).abs(),
        (utm_ne.northing - utm_sw.northing).abs(),
    ))
}

/// Width and height in pixels of the box spanned by `sw` and `ne` at `ground`
/// meters per pixel, measured in UTM.
pub fn bounds_pixel_width_height(
    sw: LatLng,
    ne: LatLng,
    ground: f64,
    ellipsoid: &Ellipsoid,
) -> Result<(f64, f64), AtlasError> {
    let (de, dn) = utm_deltas(sw, ne, ellipsoid)?;
    Ok((de / ground, dn / ground))
}

/// Ground resolution that fits the easting span of the box into `image_width` pixels.
pub fn ground_from_map_width(
    sw: LatLng,
    ne: LatLng,
    image_width: f64,
    ellipsoid: &Ellipsoid,
) -> Result<f64, AtlasError> {
    let (de, _) = utm_deltas(sw, ne, ellipsoid)?;
    let gm = de / image_width;
    debug!(easting_span = de, gm, "ground from map width");
    Ok(gm)
}

/// Ground resolution that fits the northing span of the box into `image_height` pixels.
pub fn ground_from_map_height(
    sw: LatLng,
    ne: LatLng,
    image_height: f64,
    ellipsoid: &Ellipsoid,
) -> Result<f64, AtlasError> {
    let (_, dn) = utm_deltas(sw, ne, ellipsoid)?;
    let gm = dn / image_height;
    debug!(northing_span = dn, gm, "ground from map height");
    Ok(gm)
}
