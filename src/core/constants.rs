use std::f64::consts::PI;

/// Spherical mercator earth radius in meters
pub const MERCATOR_EARTH_RADIUS: f64 = 6378137.0;

/// Spherical mercator earth circumference in meters
pub const MERCATOR_EARTH_CIRCUMFERENCE: f64 = 2.0 * PI * MERCATOR_EARTH_RADIUS;

/// Degrees to radians
pub const RAD: f64 = PI / 180.0;

/// Web mercator tile size in pixels
pub const TILE_SIZE: f64 = 256.0;

/// Reference tile size used when sizing a cell in pixels (4096 / 8)
pub const CELL_TILE_SIZE: f64 = 4096.0 / 8.0;

pub const METERS_PER_INCH: f64 = 0.0254;

pub const SCALE_50K: u32 = 50_000;

/// Side of a 5K sub-sheet in degrees of latitude
pub const SUBSHEET_SIDE: f64 = 0.025;

/// Sub-sheets per row (and rows per parent) when splitting a 50K sheet
pub const SUBSHEETS_PER_ROW: u32 = 10;

/// Highest valid sub-sheet part number
pub const MAX_SUBSHEET_PART: u32 = 100;
