use crate::cell::{Cell, CellProvider, CellSize, Mdgid, Providers};
use crate::config::ProviderConfig;
use crate::error::{AtlasError, Result};
use geo_types::Rect;
use std::sync::Arc;
use tracing::{debug, trace};

/// Registry type name.
pub const MEMORY_TYPE: &str = "memory";

/// A provider over a fixed list of cells held in memory.
///
/// Positions are taken as WGS84 whatever the requested srid. Lookups are
/// boundary inclusive and the first matching cell wins.
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    size: CellSize,
    cells: Vec<Cell>,
}

impl MemoryProvider {
    /// Validates and initializes every cell.
    pub fn new(size: CellSize, cells: Vec<Cell>) -> Result<Self> {
        let cells = cells
            .into_iter()
            .map(|mut c| {
                c.validate()?;
                c.init();
                Ok(c)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { size, cells })
    }

    /// Init function for the `memory` type.
    ///
    /// Settings: `cell_size` (`"5K"`, `"50K"` or `"250K"`, default `"50K"`)
    /// and `cells`, an array of serialized cells.
    pub fn from_config(
        config: &ProviderConfig,
        _providers: &Providers,
    ) -> Result<Arc<dyn CellProvider>> {
        let size: CellSize = config.string_or("cell_size", "50K")?.parse()?;
        let cells: Vec<Cell> = match config.value("cells") {
            Some(v) => serde_json::from_value(v.clone()).map_err(|e| {
                AtlasError::Config(format!("provider ({}) cells: {e}", config.name))
            })?,
            None => Vec::new(),
        };
        debug!(name = %config.name, %size, cells = cells.len(), "memory provider");
        Ok(Arc::new(Self::new(size, cells)?))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl CellProvider for MemoryProvider {
    fn cell_for_bounds(&self, bounds: Rect<f64>, srid: u32) -> Result<Cell> {
        let c = bounds.center();
        self.cell_for_lat_lng(c.y, c.x, srid)
    }

    fn cell_for_lat_lng(&self, lat: f64, lng: f64, srid: u32) -> Result<Cell> {
        trace!(lat, lng, srid, "memory lookup");
        self.cells
            .iter()
            .find(|c| c.contains(lat, lng))
            .cloned()
            .ok_or(AtlasError::NotFound)
    }

    fn cell_for_mdgid(&self, mdgid: &Mdgid) -> Result<Cell> {
        self.cells
            .iter()
            .find(|c| c.mdgid() == mdgid)
            .cloned()
            .ok_or(AtlasError::NotFound)
    }

    fn cell_size(&self) -> CellSize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::coord;
    use serde_json::json;

    fn provider() -> Result<MemoryProvider> {
        let cells = vec![
            Cell::builder()
                .mdgid(Mdgid::new("A", 0))
                .sw(40.0, -122.0)
                .ne(40.25, -121.75)
                .build()?,
            Cell::builder()
                .mdgid(Mdgid::new("B", 0))
                .sw(40.0, -121.75)
                .ne(40.25, -121.5)
                .build()?,
        ];
        MemoryProvider::new(CellSize::FiftyK, cells)
    }

    #[test]
    fn test_lookup_by_lat_lng() -> Result<()> {
        let p = provider()?;
        assert_eq!(p.cell_for_lat_lng(40.1, -121.9, 4326)?.mdgid().id, "A");
        assert_eq!(p.cell_for_lat_lng(40.1, -121.6, 4326)?.mdgid().id, "B");
        // the shared edge belongs to the first cell
        assert_eq!(p.cell_for_lat_lng(40.1, -121.75, 4326)?.mdgid().id, "A");
        assert!(matches!(
            p.cell_for_lat_lng(41.0, -121.6, 4326),
            Err(AtlasError::NotFound)
        ));
        Ok(())
    }

    #[test]
    fn test_lookup_by_mdgid_and_bounds() -> Result<()> {
        let p = provider()?;
        assert_eq!(p.cell_for_mdgid(&Mdgid::new("B", 0))?.sw(), [-121.75, 40.0]);
        assert!(matches!(
            p.cell_for_mdgid(&Mdgid::new("B", 3)),
            Err(AtlasError::NotFound)
        ));

        let bounds = Rect::new(coord! { x: -121.7, y: 40.05 }, coord! { x: -121.6, y: 40.15 });
        assert_eq!(p.cell_for_bounds(bounds, 4326)?.mdgid().id, "B");
        Ok(())
    }

    #[test]
    fn test_from_config() -> Result<()> {
        let config = ProviderConfig::new("base", MEMORY_TYPE)
            .with_setting("cell_size", "5K")
            .with_setting(
                "cells",
                json!([{
                    "mdgid": { "id": "C", "part": 0 },
                    "sw": { "lat": 1.0, "lng": 1.0 },
                    "ne": { "lat": 2.0, "lng": 2.0 },
                    "sheet": "0101"
                }]),
            );
        let p = MemoryProvider::from_config(&config, &Providers::default())?;
        assert_eq!(p.cell_size(), CellSize::FiveK);
        let cell = p.cell_for_lat_lng(1.5, 1.5, 4326)?;
        assert_eq!(cell.sheet(), "0101");
        assert!(cell.utm().is_some());
        Ok(())
    }

    #[test]
    fn test_from_config_rejects_bad_cells() {
        let config = ProviderConfig::new("base", MEMORY_TYPE).with_setting(
            "cells",
            json!([{
                "mdgid": { "id": "C" },
                "sw": { "lat": 2.0, "lng": 1.0 },
                "ne": { "lat": 1.0, "lng": 2.0 }
            }]),
        );
        assert!(matches!(
            MemoryProvider::from_config(&config, &Providers::default()),
            Err(AtlasError::InvalidBounds(_))
        ));

        let config = ProviderConfig::new("base", MEMORY_TYPE).with_setting("cells", "nope");
        assert!(matches!(
            MemoryProvider::from_config(&config, &Providers::default()),
            Err(AtlasError::Config(_))
        ));
    }
}
