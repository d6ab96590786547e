pub mod constants;
pub mod mercator;
pub mod resolution;

pub use constants::{
    CELL_TILE_SIZE, MAX_SUBSHEET_PART, MERCATOR_EARTH_CIRCUMFERENCE, MERCATOR_EARTH_RADIUS,
    METERS_PER_INCH, RAD, SCALE_50K, SUBSHEET_SIDE, SUBSHEETS_PER_ROW, TILE_SIZE,
};
pub use mercator::{center_lng_lat, center_px, lng_lat_to_px, px_to_lng_lat, width_height_tile};
pub use resolution::{
    bounds_pixel_width_height, ground, ground_from_map_height, ground_from_map_width,
    lat_in_meters, scale, zoom, zoom_for_ground, zoom_map_width,
};
