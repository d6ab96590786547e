use crate::cell::{Cell, CellProvider, Mdgid, Providers};
use crate::config::SheetConfig;
use crate::coord::Ellipsoid;
use crate::core::constants::MERCATOR_EARTH_CIRCUMFERENCE;
use crate::core::{bounds_pixel_width_height, ground};
use crate::error::{Result, Stage};
use crate::sheet::{Job, Status, StatusSink};
use crate::trellis::{GridSpacing, Structure};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Spatial reference of the positions handed to providers.
pub const WGS84_SRID: u32 = 4326;

/// Everything needed to render one cell on a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub cell: Cell,
    pub zoom: f64,
    /// Meters per pixel at the cell's SW latitude.
    pub ground: f64,
    /// Map width and height in pixels, measured in UTM.
    pub width_px: f64,
    pub height_px: f64,
    pub structure: Structure,
}

/// A sheet definition bound to the provider it draws cells from.
#[derive(Clone)]
pub struct Sheet {
    config: SheetConfig,
    provider: Arc<dyn CellProvider>,
    ellipsoid: Ellipsoid,
    spacing: GridSpacing,
}

impl Sheet {
    pub fn new(config: SheetConfig, provider: Arc<dyn CellProvider>) -> Result<Self> {
        let ellipsoid = config.ellipsoid()?;
        let spacing = config.grid_spacing()?;
        Ok(Self {
            config,
            provider,
            ellipsoid,
            spacing,
        })
    }

    /// Binds `config` to its named provider.
    pub fn from_config(config: &SheetConfig, providers: &Providers) -> Result<Self> {
        let provider = providers.get(&config.provider)?;
        Self::new(config.clone(), provider)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    pub fn provider(&self) -> &Arc<dyn CellProvider> {
        &self.provider
    }

    pub fn plan_for_lat_lng(
        &self,
        lat: f64,
        lng: f64,
        sink: &dyn StatusSink,
    ) -> Result<SheetPlan> {
        self.run(sink, || {
            self.provider
                .cell_for_lat_lng(lat, lng, WGS84_SRID)
                .map_err(|e| e.at(Stage::CellLookup))
        })
    }

    pub fn plan_for_mdgid(&self, mdgid: &Mdgid, sink: &dyn StatusSink) -> Result<SheetPlan> {
        self.run(sink, || {
            self.provider
                .cell_for_mdgid(mdgid)
                .map_err(|e| e.at(Stage::CellLookup))
        })
    }

    /// Plans a cell that was already looked up, e.g. one carried by a [`Job`].
    pub fn plan_for_cell(&self, cell: Cell, sink: &dyn StatusSink) -> Result<SheetPlan> {
        self.run(sink, || Ok(cell))
    }

    /// The job that would render the cell for `mdgid` on this sheet.
    pub fn job_for_mdgid(&self, mdgid: &Mdgid, metadata: HashMap<String, String>) -> Result<Job> {
        let cell = self
            .provider
            .cell_for_mdgid(mdgid)
            .map_err(|e| e.at(Stage::CellLookup))?;
        Ok(Job {
            sheet_name: self.config.name.clone(),
            cell: Some(cell),
            metadata,
        })
    }

    fn run(
        &self,
        sink: &dyn StatusSink,
        lookup: impl FnOnce() -> Result<Cell>,
    ) -> Result<SheetPlan> {
        emit(sink, Status::Requested);
        emit(sink, Status::Started);
        let res = lookup().and_then(|cell| {
            emit(sink, Status::processing(format!("planning {}", cell.mdgid())));
            self.plan(cell, sink)
        });
        match &res {
            Ok(plan) => {
                info!(
                    sheet = %self.config.name,
                    mdgid = %plan.cell.mdgid(),
                    zoom = plan.zoom,
                    "sheet planned"
                );
                emit(sink, Status::Completed);
            }
            Err(e) => {
                warn!(sheet = %self.config.name, error = %e, "sheet planning failed");
                emit(sink, Status::failed(e));
            }
        }
        res
    }

    fn plan(&self, cell: Cell, sink: &dyn StatusSink) -> Result<SheetPlan> {
        let sw = cell.sw_lat_lng();
        let ne = cell.ne_lat_lng();
        let zoom = cell.zoom_for_scale_dpi(self.config.scale, self.config.dpi);
        let ground = ground(MERCATOR_EARTH_CIRCUMFERENCE, zoom, sw.lat);

        emit(sink, Status::processing("computing trellis"));
        let (width_px, height_px) = bounds_pixel_width_height(sw, ne, ground, &self.ellipsoid)
            .map_err(|e| e.at(Stage::Trellis))?;
        let structure = Structure::for_cell(&cell, &self.ellipsoid, self.spacing)
            .map_err(|e| e.at(Stage::Trellis))?;
        debug!(zoom, ground, width_px, height_px, "sheet dimensions");

        Ok(SheetPlan {
            cell,
            zoom,
            ground,
            width_px,
            height_px,
            structure,
        })
    }
}

impl fmt::Debug for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sheet")
            .field("config", &self.config)
            .field("cell_size", &self.provider.cell_size())
            .finish()
    }
}

fn emit(sink: &dyn StatusSink, status: Status) {
    if let Err(e) = sink.emit(status) {
        warn!(error = %e, "failed to emit status");
    }
}
