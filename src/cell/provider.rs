use crate::cell::{Cell, Mdgid};
use crate::error::{AtlasError, Result};
use geo_types::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Native extent of the cells a provider serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellSize {
    #[serde(rename = "5K")]
    FiveK,
    #[serde(rename = "50K")]
    FiftyK,
    #[serde(rename = "250K")]
    TwoFiftyK,
}

impl CellSize {
    /// Nominal size in meters.
    pub fn meters(&self) -> u32 {
        match self {
            CellSize::FiveK => 5_000,
            CellSize::FiftyK => 50_000,
            CellSize::TwoFiftyK => 250_000,
        }
    }
}

impl fmt::Display for CellSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellSize::FiveK => write!(f, "5K"),
            CellSize::FiftyK => write!(f, "50K"),
            CellSize::TwoFiftyK => write!(f, "250K"),
        }
    }
}

impl FromStr for CellSize {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "5K" => Ok(CellSize::FiveK),
            "50K" => Ok(CellSize::FiftyK),
            "250K" => Ok(CellSize::TwoFiftyK),
            other => Err(AtlasError::Config(format!("unknown cell size {other:?}"))),
        }
    }
}

/// Looks up grid cells.
///
/// Lookups that find nothing return [`AtlasError::NotFound`]. `srid` is the
/// spatial reference of the input coordinates; bounds are lng/lat
/// rectangles (x is the longitude).
pub trait CellProvider: Send + Sync {
    fn cell_for_bounds(&self, bounds: Rect<f64>, srid: u32) -> Result<Cell>;
    fn cell_for_lat_lng(&self, lat: f64, lng: f64, srid: u32) -> Result<Cell>;
    fn cell_for_mdgid(&self, mdgid: &Mdgid) -> Result<Cell>;
    fn cell_size(&self) -> CellSize;
}
