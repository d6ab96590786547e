//! # atlas-sheets
//!
//! Grid-cell geodesy and reference grid layout for printed atlas sheets.
//!
//! There are four main entry points.
//!
//! ### 1. `Cell` - One Map Sheet
//!
//! ```
//! use atlas_sheets::{Cell, Mdgid};
//!
//! # fn main() -> Result<(), atlas_sheets::AtlasError> {
//! let cell = Cell::builder()
//!     .mdgid(Mdgid::new("V795X16666", 0))
//!     .sw(40.0, -122.0)
//!     .ne(40.25, -121.75)
//!     .build()?;
//! println!("{} zone {}", cell.reference_number(), cell.zone().label_or("01"));
//! println!("{} / {}", cell.sw_lat_dms(), cell.sw_lng_dms());
//! let zoom = cell.zoom_for_scale_dpi(50_000, 96);
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `Registry` - Providers From Configuration
//!
//! ```
//! use atlas_sheets::{Mdgid, ProviderConfig, Registry};
//!
//! # fn main() -> Result<(), atlas_sheets::AtlasError> {
//! let cells = serde_json::json!([{
//!     "mdgid": { "id": "V795X16666" },
//!     "sw": { "lat": 40.0, "lng": -122.0 },
//!     "ne": { "lat": 40.25, "lng": -121.75 }
//! }]);
//! let providers = Registry::with_builtin().build_all(&[
//!     ProviderConfig::new("base", "memory").with_setting("cells", cells),
//!     ProviderConfig::new("5k", "grid5k").with_setting("provider", "base"),
//! ])?;
//! let cell = providers.get("5k")?.cell_for_mdgid(&Mdgid::new("V795X16666", 12))?;
//! assert_eq!(cell.reference_number(), "V795X16666-12");
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `Structure` - UTM Trellis
//!
//! See [`trellis`]. Bars are computed per sheet and handed to a drawing
//! callback one at a time.
//!
//! ### 4. `Grating` - Lettered Reference Grid
//!
//! ```
//! use atlas_sheets::Grating;
//!
//! # fn main() -> Result<(), atlas_sheets::AtlasError> {
//! let grating = Grating::new(0.0, 0.0, 100.0, 110.0, 11, 5, false)?;
//! assert_eq!(grating.label_for_row(0).as_deref(), Some("M"));
//! assert_eq!(grating.label_for_col(0).as_deref(), Some("1"));
//! # Ok(())
//! # }
//! ```

pub mod cell;
pub mod config;
pub mod coord;
pub mod core;
pub mod error;
pub mod grating;
pub mod sheet;
pub mod trellis;

pub use cell::{
    Cell, CellBuilder, CellProvider, CellSize, CellZone, EditInfo, GRID5K_TYPE, Grid5k,
    MEMORY_TYPE, Mdgid, MemoryProvider, PartNumbering, Providers, Registry,
};
pub use config::{AtlasConfig, ProviderConfig, SheetConfig};
pub use coord::{
    Coordinate, Dms, Ellipsoid, Hemisphere, LatLng, LatLngDms, UtmCoord, UtmInfo, UtmProjector,
    Zone, calculate_sec_lengths, haversine_distance, to_dms, utm_from_lat_lng, zone_from_lat_lng,
};
pub use core::{
    MERCATOR_EARTH_CIRCUMFERENCE, MERCATOR_EARTH_RADIUS, TILE_SIZE, ground, scale, zoom,
    zoom_for_ground,
};
pub use error::{AtlasError, Result, Stage};
pub use grating::{Grating, squarish};
pub use sheet::{Job, LogSink, MemorySink, Sheet, SheetPlan, Status, StatusSink};
pub use trellis::{Bar, GridSpacing, LabelPart, PixelBox, Structure};

pub use geo_types;
