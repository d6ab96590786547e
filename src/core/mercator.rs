//! Spherical mercator pixel math used to size cells at a given zoom.

use crate::core::constants::RAD;
use geo_types::{Coord, Rect, coord};
use std::f64::consts::PI;

/// Sine of the latitude is clamped to this so the poles stay finite.
const MAX_SIN_LAT: f64 = 0.9999;

struct PixelScale {
    size: f64,
    half: f64,
    per_degree: f64,
    per_radian: f64,
}

impl PixelScale {
    fn new(zoom: f64, tile_size: f64) -> Self {
        let size = tile_size * zoom.exp2();
        Self {
            size,
            half: size / 2.0,
            per_degree: size / 360.0,
            per_radian: size / (2.0 * PI),
        }
    }
}

/// Projects a lng/lat coordinate into world pixel space at `zoom`.
///
/// The origin is the top-left of the world; y grows southwards.
pub fn lng_lat_to_px(lng_lat: Coord<f64>, zoom: f64, tile_size: f64) -> Coord<f64> {
    let ps = PixelScale::new(zoom, tile_size);
    let f = (lng_lat.y * RAD).sin().clamp(-MAX_SIN_LAT, MAX_SIN_LAT);
    let x = ps.half + lng_lat.x * ps.per_degree;
    let y = ps.half + 0.5 * ((1.0 + f) / (1.0 - f)).ln() * -ps.per_radian;
    coord! { x: x.min(ps.size), y: y.min(ps.size) }
}

/// Inverse of [`lng_lat_to_px`].
pub fn px_to_lng_lat(px: Coord<f64>, zoom: f64, tile_size: f64) -> Coord<f64> {
    let ps = PixelScale::new(zoom, tile_size);
    let g = (px.y - ps.half) / -ps.per_radian;
    let lng = (px.x - ps.half) / ps.per_degree;
    let lat = (2.0 * g.exp().atan() - 0.5 * PI) / RAD;
    coord! { x: lng, y: lat }
}

/// Width and height in pixels of `bounds` (lng/lat) at `zoom`.
pub fn width_height_tile(bounds: &Rect<f64>, zoom: f64, tile_size: f64) -> (f64, f64) {
    let ne = lng_lat_to_px(bounds.max(), zoom, tile_size);
    let sw = lng_lat_to_px(bounds.min(), zoom, tile_size);
    (ne.x - sw.x, sw.y - ne.y)
}

/// Pixel-space centroid of `bounds` at `zoom`.
pub fn center_px(bounds: &Rect<f64>, zoom: f64, tile_size: f64) -> Coord<f64> {
    let ne = lng_lat_to_px(bounds.max(), zoom, tile_size);
    let sw = lng_lat_to_px(bounds.min(), zoom, tile_size);
    coord! { x: (ne.x + sw.x) / 2.0, y: (ne.y + sw.y) / 2.0 }
}

/// The lng/lat under the pixel-space centroid of `bounds`.
pub fn center_lng_lat(bounds: &Rect<f64>, zoom: f64, tile_size: f64) -> Coord<f64> {
    px_to_lng_lat(center_px(bounds, zoom, tile_size), zoom, tile_size)
}
