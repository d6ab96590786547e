//! 5K sub-sheets carved out of a 50K base provider.
//!
//! A 50K parent is split into a 10x10 grid of squares 0.025° tall. The
//! column width is a tenth of the parent's longitude span, or 0.025° when
//! the parent is narrower than that. Part 1 is the north-west square and
//! numbering runs west to east, then north to south, up to part 100.

use crate::cell::{Cell, CellProvider, CellSize, Mdgid, Providers};
use crate::config::ProviderConfig;
use crate::coord::LatLng;
use crate::core::constants::{MAX_SUBSHEET_PART, SUBSHEET_SIDE, SUBSHEETS_PER_ROW};
use crate::error::{AtlasError, Result, Stage};
use geo_types::Rect;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Registry type name.
pub const GRID5K_TYPE: &str = "grid5k";

/// Config key naming the base provider.
pub const CONFIG_KEY_PROVIDER: &str = "provider";

/// Config key selecting the [`PartNumbering`].
pub const CONFIG_KEY_PART_NUMBERING: &str = "part_numbering";

/// How part numbers ending in 0 are placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartNumbering {
    /// Parts 20, 30, ..., 100 are anchored to the parent's east edge
    /// (`ne.lng - width`). This is the numbering sheets have been printed with.
    #[default]
    Legacy,
    /// Every column, including the last, is measured from the parent's west
    /// edge (`sw.lng + 9 * width`). Opt-in alternative; it only differs from
    /// `Legacy` on parents narrower than ten columns.
    RowMajorFromWest,
}

impl FromStr for PartNumbering {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "legacy" => Ok(PartNumbering::Legacy),
            "row_major_from_west" => Ok(PartNumbering::RowMajorFromWest),
            other => Err(AtlasError::Config(format!("unknown part numbering {other:?}"))),
        }
    }
}

fn column_width(sw: LatLng, ne: LatLng) -> f64 {
    let span = (sw.lng - ne.lng).abs();
    if span > SUBSHEET_SIDE {
        span / SUBSHEETS_PER_ROW as f64
    } else {
        SUBSHEET_SIDE
    }
}

/// North, south, west and east edges of sub-sheet `part` of the parent
/// spanned by `sw` and `ne`. Parts below 1 are treated as 1.
///
/// Returns all zeros for parts above 100.
pub fn coords_5k_sheet(
    sw: LatLng,
    ne: LatLng,
    part: u32,
    numbering: PartNumbering,
) -> (f64, f64, f64, f64) {
    let width = column_width(sw, ne);
    let part = part.max(1);
    if part > MAX_SUBSHEET_PART {
        return (0.0, 0.0, 0.0, 0.0);
    }

    let per_row = SUBSHEETS_PER_ROW;
    let (a, b) = match numbering {
        PartNumbering::Legacy => match part {
            100 => (10, 0),
            p if p < 11 => (0, p),
            p => (p / per_row, p % per_row),
        },
        PartNumbering::RowMajorFromWest => match (part / per_row, part % per_row) {
            (a, 0) => (a - 1, per_row),
            ab => ab,
        },
    };
    let (a, b) = (a as f64, b as f64);

    if b == 0.0 {
        let n = ne.lat - (a * SUBSHEET_SIDE) + SUBSHEET_SIDE;
        (n, n - SUBSHEET_SIDE, ne.lng - width, ne.lng)
    } else {
        let n = ne.lat - (a * SUBSHEET_SIDE);
        let w = sw.lng + ((b - 1.0) * width);
        (n, n - SUBSHEET_SIDE, w, w + width)
    }
}

/// The part number of the sub-sheet of the parent that contains `lat`/`lng`.
///
/// Points on the parent's south or east edge fall in the last row or column.
pub fn mdgid_part(sw: LatLng, ne: LatLng, lat: f64, lng: f64) -> u32 {
    let width = column_width(sw, ne);
    let per_row = SUBSHEETS_PER_ROW;

    let mut east_diff = (((sw.lng - lng).abs() / width) as u32 + 1).min(per_row);
    let mut north_diff = (((ne.lat - lat).abs() / SUBSHEET_SIDE) as u32).min(per_row - 1);

    if east_diff == per_row {
        north_diff += 1;
        east_diff = 0;
    }
    north_diff * per_row + east_diff
}

/// Serves 5K sub-sheets of the cells of a 50K base provider.
pub struct Grid5k {
    base: Arc<dyn CellProvider>,
    numbering: PartNumbering,
}

impl Grid5k {
    /// Fails unless `base` serves 50K cells.
    pub fn new(base: Arc<dyn CellProvider>) -> Result<Self> {
        let size = base.cell_size();
        if size != CellSize::FiftyK {
            return Err(AtlasError::UnsupportedCellSize(size));
        }
        Ok(Self {
            base,
            numbering: PartNumbering::default(),
        })
    }

    pub fn with_numbering(mut self, numbering: PartNumbering) -> Self {
        self.numbering = numbering;
        self
    }

    pub fn numbering(&self) -> PartNumbering {
        self.numbering
    }

    /// Init function for the `grid5k` type.
    ///
    /// Settings: `provider`, the name of an already built 50K provider, and
    /// optionally `part_numbering` (`"legacy"` or `"row_major_from_west"`).
    pub fn from_config(
        config: &ProviderConfig,
        providers: &Providers,
    ) -> Result<Arc<dyn CellProvider>> {
        let name = config.string(CONFIG_KEY_PROVIDER)?;
        if name.trim().is_empty() {
            return Err(AtlasError::BlankSubprovider);
        }
        let numbering: PartNumbering = config
            .string_or(CONFIG_KEY_PART_NUMBERING, "legacy")?
            .parse()?;

        info!(provider = %name, "getting base provider from config");
        let base = providers.get(&name).inspect_err(|e| {
            warn!(provider = %name, error = %e, "got error getting provider");
        })?;
        Ok(Arc::new(Self::new(base)?.with_numbering(numbering)))
    }

    /// Sub-sheet `part` of `parent`. Part 0 means part 1.
    pub fn subdivide(&self, parent: &Cell, part: u32) -> Result<Cell> {
        if part > MAX_SUBSHEET_PART {
            return Err(AtlasError::InvalidSheetNumber(part).at(Stage::Subdivision));
        }
        let part = part.max(1);
        let (n, s, w, e) = coords_5k_sheet(parent.sw, parent.ne, part, self.numbering);
        debug!(mdgid = %parent.mdgid, part, n, s, w, e, "5k sheet");

        let mut cell = parent.clone().with_bounds(LatLng::new(s, w), LatLng::new(n, e));
        cell.mdgid.part = part;
        Ok(cell)
    }

    /// All 100 sub-sheets of `parent`, in part order.
    pub fn subdivide_all(&self, parent: &Cell) -> Result<Vec<Cell>> {
        (1..=MAX_SUBSHEET_PART)
            .into_par_iter()
            .map(|part| self.subdivide(parent, part))
            .collect()
    }

    fn subdivide_at(&self, parent: Cell, lat: f64, lng: f64) -> Result<Cell> {
        let part = mdgid_part(parent.sw, parent.ne, lat, lng);
        self.subdivide(&parent, part)
    }
}

impl CellProvider for Grid5k {
    /// The sub-sheet containing the centre of `bounds`.
    fn cell_for_bounds(&self, bounds: Rect<f64>, srid: u32) -> Result<Cell> {
        let parent = self.base.cell_for_bounds(bounds, srid)?;
        let c = bounds.center();
        self.subdivide_at(parent, c.y, c.x)
    }

    fn cell_for_lat_lng(&self, lat: f64, lng: f64, srid: u32) -> Result<Cell> {
        let parent = self.base.cell_for_lat_lng(lat, lng, srid)?;
        self.subdivide_at(parent, lat, lng)
    }

    fn cell_for_mdgid(&self, mdgid: &Mdgid) -> Result<Cell> {
        info!(%mdgid, "getting mdgid");
        let parent = self.base.cell_for_mdgid(&mdgid.base())?;
        self.subdivide(&parent, mdgid.part)
    }

    fn cell_size(&self) -> CellSize {
        CellSize::FiveK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::MemoryProvider;
    use geo::Area;
    use geo_types::coord;

    const TOL: f64 = 1e-9;

    fn parent(ne_lng: f64) -> Result<Cell> {
        Cell::builder()
            .mdgid(Mdgid::new("V795X16666", 0))
            .sw(40.0, -122.0)
            .ne(40.25, ne_lng)
            .sheet("2242")
            .build()
    }

    fn grid(parent: Cell) -> Result<Grid5k> {
        Grid5k::new(Arc::new(MemoryProvider::new(CellSize::FiftyK, vec![parent])?))
    }

    #[test]
    fn test_part_layout() {
        let sw = LatLng::new(40.0, -122.0);
        let ne = LatLng::new(40.25, -121.75);
        for part in 1..=100u32 {
            let row = ((part - 1) / 10) as f64;
            let col = ((part - 1) % 10) as f64;
            let (n, s, w, e) = coords_5k_sheet(sw, ne, part, PartNumbering::Legacy);
            assert!((n - (40.25 - row * 0.025)).abs() < TOL, "part {part} north");
            assert!((n - s - 0.025).abs() < TOL, "part {part} height");
            assert!((w - (-122.0 + col * 0.025)).abs() < TOL, "part {part} west");
            assert!((e - w - 0.025).abs() < TOL, "part {part} width");
        }
    }

    #[test]
    fn test_subdivision_tiles_parent() -> Result<()> {
        let parent = parent(-121.75)?;
        let grid = grid(parent.clone())?;
        let cells = grid.subdivide_all(&parent)?;
        assert_eq!(cells.len(), 100);

        let hull = parent.hull();
        let mut area = 0.0;
        for cell in &cells {
            let h = cell.hull();
            assert!(h.min().x >= hull.min().x - TOL && h.max().x <= hull.max().x + TOL);
            assert!(h.min().y >= hull.min().y - TOL && h.max().y <= hull.max().y + TOL);
            area += h.unsigned_area();
        }
        assert!((area - hull.unsigned_area()).abs() < 1e-9);

        for (i, a) in cells.iter().enumerate() {
            let (ha, (amin, amax)) = (a.hull(), (a.hull().min(), a.hull().max()));
            for b in &cells[i + 1..] {
                let (bmin, bmax) = (b.hull().min(), b.hull().max());
                let dx = (amax.x.min(bmax.x) - amin.x.max(bmin.x)).max(0.0);
                let dy = (amax.y.min(bmax.y) - amin.y.max(bmin.y)).max(0.0);
                assert!(dx * dy < 1e-12, "{} overlaps {} ({ha:?})", a.mdgid(), b.mdgid());
            }
        }
        Ok(())
    }

    #[test]
    fn test_reverse_lookup_matches_forward() -> Result<()> {
        let parent = parent(-121.75)?;
        let grid = grid(parent.clone())?;
        for part in 1..=100u32 {
            let cell = grid.subdivide(&parent, part)?;
            let c = cell.hull().center();
            assert_eq!(mdgid_part(parent.sw, parent.ne, c.y, c.x), part);

            let found = grid.cell_for_lat_lng(c.y, c.x, 4326)?;
            assert_eq!(found.mdgid(), &Mdgid::new("V795X16666", part));
        }
        Ok(())
    }

    #[test]
    fn test_edges_stay_in_range() {
        let sw = LatLng::new(40.0, -122.0);
        let ne = LatLng::new(40.25, -121.75);
        assert_eq!(mdgid_part(sw, ne, 40.25, -122.0), 1);
        assert_eq!(mdgid_part(sw, ne, 40.0, -121.75), 100);
        assert_eq!(mdgid_part(sw, ne, 40.0, -122.0), 91);
    }

    #[test]
    fn test_lookup_by_mdgid() -> Result<()> {
        let parent = parent(-121.75)?;
        let grid = grid(parent.clone())?;

        let cell = grid.cell_for_mdgid(&Mdgid::parse("V795X16666:12"))?;
        assert_eq!(cell.reference_number(), "V795X16666-12");
        assert_eq!(cell.sheet_number(), "2242-12");
        assert!((cell.ne()[1] - 40.225).abs() < TOL);
        assert!((cell.sw()[0] - -121.975).abs() < TOL);
        // derived fields follow the new corners
        assert_eq!(cell.sw_lat_dms(), crate::coord::to_dms(cell.sw()[1], 0.0)[0].to_string());
        assert_eq!(cell.utm(), parent.utm());

        let whole = grid.cell_for_mdgid(&Mdgid::new("V795X16666", 0))?;
        assert_eq!(whole.mdgid().part, 1);
        Ok(())
    }

    #[test]
    fn test_lookup_by_bounds_uses_centre() -> Result<()> {
        let grid = grid(parent(-121.75)?)?;
        let bounds = Rect::new(coord! { x: -121.99, y: 40.21 }, coord! { x: -121.98, y: 40.22 });
        let cell = grid.cell_for_bounds(bounds, 4326)?;
        assert_eq!(cell.mdgid().part, 11);
        Ok(())
    }

    #[test]
    fn test_invalid_part() -> Result<()> {
        let parent = parent(-121.75)?;
        let grid = grid(parent.clone())?;
        match grid.cell_for_mdgid(&Mdgid::new("V795X16666", 101)) {
            Err(AtlasError::Stage { stage, source }) => {
                assert_eq!(stage, Stage::Subdivision);
                assert!(matches!(*source, AtlasError::InvalidSheetNumber(101)));
            }
            other => panic!("expected invalid sheet number, got {other:?}"),
        }
        assert_eq!(
            coords_5k_sheet(parent.sw, parent.ne, 101, PartNumbering::Legacy),
            (0.0, 0.0, 0.0, 0.0)
        );
        Ok(())
    }

    #[test]
    fn test_rejects_non_50k_base() -> Result<()> {
        let base = Arc::new(MemoryProvider::new(CellSize::FiveK, Vec::new())?);
        assert!(matches!(
            Grid5k::new(base),
            Err(AtlasError::UnsupportedCellSize(CellSize::FiveK))
        ));
        Ok(())
    }

    #[test]
    fn test_from_config_errors() -> Result<()> {
        let mut providers = Providers::default();
        providers.insert(
            "base",
            Arc::new(MemoryProvider::new(CellSize::TwoFiftyK, Vec::new())?),
        );

        let blank = ProviderConfig::new("5k", GRID5K_TYPE).with_setting(CONFIG_KEY_PROVIDER, " ");
        assert!(matches!(
            Grid5k::from_config(&blank, &providers),
            Err(AtlasError::BlankSubprovider)
        ));

        let wrong_size =
            ProviderConfig::new("5k", GRID5K_TYPE).with_setting(CONFIG_KEY_PROVIDER, "base");
        assert!(matches!(
            Grid5k::from_config(&wrong_size, &providers),
            Err(AtlasError::UnsupportedCellSize(CellSize::TwoFiftyK))
        ));

        let missing =
            ProviderConfig::new("5k", GRID5K_TYPE).with_setting(CONFIG_KEY_PROVIDER, "other");
        assert!(matches!(
            Grid5k::from_config(&missing, &providers),
            Err(AtlasError::ProviderMissing(_))
        ));

        let bad_mode = wrong_size.with_setting(CONFIG_KEY_PART_NUMBERING, "diagonal");
        assert!(matches!(
            Grid5k::from_config(&bad_mode, &providers),
            Err(AtlasError::Config(_))
        ));
        Ok(())
    }

    #[test]
    fn test_numbering_modes_agree_on_regular_parents() {
        let sw = LatLng::new(40.0, -122.0);
        let ne = LatLng::new(40.25, -121.75);
        for part in 1..=100u32 {
            let a = coords_5k_sheet(sw, ne, part, PartNumbering::Legacy);
            let b = coords_5k_sheet(sw, ne, part, PartNumbering::RowMajorFromWest);
            assert!((a.0 - b.0).abs() < TOL && (a.1 - b.1).abs() < TOL, "part {part}");
            assert!((a.2 - b.2).abs() < TOL && (a.3 - b.3).abs() < TOL, "part {part}");
        }
    }

    #[test]
    fn test_numbering_modes_differ_on_narrow_parents() -> Result<()> {
        let narrow = parent(-121.98)?;
        let legacy = grid(narrow.clone())?;
        let alt = grid(narrow.clone())?.with_numbering(PartNumbering::RowMajorFromWest);
        assert_eq!(alt.numbering(), PartNumbering::RowMajorFromWest);

        // the last column of a row is where the two schemes part ways
        let a = legacy.subdivide(&narrow, 20)?;
        let b = alt.subdivide(&narrow, 20)?;
        assert!((a.sw()[0] - -122.005).abs() < TOL);
        assert!((b.sw()[0] - -121.775).abs() < TOL);
        assert!((a.ne()[1] - b.ne()[1]).abs() < TOL);

        let a = legacy.subdivide(&narrow, 15)?;
        let b = alt.subdivide(&narrow, 15)?;
        assert_eq!(a.hull(), b.hull());
        Ok(())
    }

    #[test]
    fn test_parallel_matches_sequential() -> Result<()> {
        let parent = parent(-121.75)?;
        let grid = grid(parent.clone())?;
        let sequential = (1..=100u32)
            .map(|part| grid.subdivide(&parent, part))
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(grid.subdivide_all(&parent)?, sequential);
        Ok(())
    }
}
