//! UTM aligned reference grid ("trellis") over a map sheet.
//!
//! ```
//! use atlas_sheets::{Ellipsoid, GridSpacing, LatLng, Structure};
//!
//! # fn main() -> Result<(), atlas_sheets::AtlasError> {
//! let structure = Structure::new(
//!     LatLng::new(32.75, -117.25),
//!     LatLng::new(32.5, -117.0),
//!     &Ellipsoid::WGS84,
//!     GridSpacing::GRID_1K,
//! )?;
//! structure.northing_bars(|_, bar| -> Result<(), atlas_sheets::AtlasError> {
//!     println!("{} ({}, {}) -> ({}, {})", bar.coordinate, bar.x1, bar.y1, bar.x2, bar.y2);
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```

mod grid;
mod pixel_box;
mod structure;

pub use grid::{GridSpacing, LabelPart};
pub use pixel_box::PixelBox;
pub use structure::{Bar, EdgeSteps, Offset, Structure, calculate_step_offsets};
