use crate::cell::Cell;
use crate::coord::{Ellipsoid, LatLng, UtmCoord, UtmProjector};
use crate::error::{AtlasError, Result};
use crate::trellis::{GridSpacing, LabelPart};
use tracing::debug;

/// Where grid lines cross one edge of the page.
///
/// The edge runs along one UTM axis from `start_axis` to `end_axis`, while
/// the other axis drifts by the cross delta because UTM north is not page up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSteps {
    /// Length of the edge in meters, including the cross axis drift.
    pub length: f64,
    /// Axis meters from the edge start to the first grid line.
    pub start_offset: f64,
    /// Axis meters from the last grid line to the edge end.
    pub end_offset: f64,
    /// Grid lines crossing the edge, both ends inclusive.
    pub steps: usize,
    /// Edge meters between consecutive grid lines.
    pub step_size: f64,
    /// Axis value of the first grid line.
    pub first_line: i64,
}

impl EdgeSteps {
    /// Axis value of the last grid line, if any line crosses the edge.
    pub fn last_line(&self, spacing: GridSpacing) -> Option<i64> {
        (self.steps > 0).then(|| self.first_line + (self.steps as i64 - 1) * spacing.size() as i64)
    }

    /// Where line `idx` crosses the edge, 0 at the edge start and 1 at its end.
    ///
    /// Lines past the last one on this edge are clamped to the edge end.
    pub fn fraction_for(&self, idx: usize, spacing: GridSpacing) -> f64 {
        if self.steps == 0 || self.length <= 0.0 {
            return 0.0;
        }
        let scale = self.step_size / spacing.size().max(1) as f64;
        let dist = self.start_offset * scale + idx as f64 * self.step_size;
        (dist / self.length).clamp(0.0, 1.0)
    }
}

/// Grid lines crossing the edge from `start_axis` to `end_axis`.
///
/// A line falling exactly on either end is counted once, with a zero offset.
/// An aligned start therefore gives `start_offset == 0` rather than a full
/// grid spacing, and that line is the first step.
pub fn calculate_step_offsets(
    start_axis: f64,
    end_axis: f64,
    cross_delta: f64,
    spacing: GridSpacing,
) -> EdgeSteps {
    let size = spacing.size().max(1) as i64;
    let axis_delta = end_axis - start_axis;
    let length = axis_delta.hypot(cross_delta);

    let lo = start_axis.ceil() as i64;
    let (_, _, lo_suffix) = spacing.parts_for(lo);
    let first_line = lo + (size - lo_suffix) % size;

    let hi = end_axis.floor() as i64;
    let (_, _, hi_suffix) = spacing.parts_for(hi);
    let last_line = hi - hi_suffix;

    if axis_delta <= 0.0 || last_line < first_line {
        return EdgeSteps {
            length,
            start_offset: axis_delta.max(0.0),
            end_offset: 0.0,
            steps: 0,
            step_size: 0.0,
            first_line,
        };
    }

    EdgeSteps {
        length,
        start_offset: first_line as f64 - start_axis,
        end_offset: end_axis - last_line as f64,
        steps: ((last_line - first_line) / size + 1) as usize,
        step_size: size as f64 * length / axis_delta,
        first_line,
    }
}

/// One family of bars (northing or easting) across the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset {
    /// Edge the bars start from: left for northings, bottom for eastings.
    pub start: EdgeSteps,
    /// Edge the bars end on: right for northings, top for eastings.
    pub end: EdgeSteps,
    /// Grid value of bar 0 on the edge that labels the bars.
    pub first_line: i64,
    /// The larger of the two edges' step counts.
    pub count: usize,
}

impl Offset {
    fn new(start: EdgeSteps, end: EdgeSteps) -> Self {
        let first_line = if start.steps > 0 || end.steps == 0 {
            start.first_line
        } else {
            end.first_line
        };
        Self {
            start,
            end,
            first_line,
            count: start.steps.max(end.steps),
        }
    }

    pub fn start_step_size(&self) -> f64 {
        self.start.step_size
    }

    pub fn end_step_size(&self) -> f64 {
        self.end.step_size
    }
}

/// A grid line drawn across the page.
///
/// Page space is in meters with the origin at the bottom-left corner of the
/// page, x to the right and y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Northing of a northing bar, easting of an easting bar.
    pub coordinate: i64,
    pub start: UtmCoord,
    pub end: UtmCoord,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Bar {
    /// Page length of the bar.
    pub fn length(&self) -> f64 {
        (self.x2 - self.x1).hypot(self.y2 - self.y1)
    }

    pub fn label(&self, spacing: GridSpacing) -> LabelPart {
        LabelPart::new(self.coordinate, spacing)
    }
}

/// The UTM trellis over a lat/lng rectangle.
///
/// All four corners are projected into the zone and hemisphere of the
/// bottom-left corner so the bars stay continuous across the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub ellipsoid: Ellipsoid,
    pub spacing: GridSpacing,
    pub top_left: UtmCoord,
    pub top_right: UtmCoord,
    pub bottom_left: UtmCoord,
    pub bottom_right: UtmCoord,
    pub northing: Offset,
    pub easting: Offset,
}

impl Structure {
    pub fn new(
        top_left: LatLng,
        bottom_right: LatLng,
        ellipsoid: &Ellipsoid,
        spacing: GridSpacing,
    ) -> Result<Self> {
        if top_left.lat <= bottom_right.lat || top_left.lng >= bottom_right.lng {
            return Err(AtlasError::InvalidBounds(format!(
                "top left ({}, {}) must be north-west of bottom right ({}, {})",
                top_left.lat, top_left.lng, bottom_right.lat, bottom_right.lng
            )));
        }
        if spacing.size() == 0 {
            return Err(AtlasError::InvalidBounds("grid spacing must be positive".into()));
        }
        let bottom_left = LatLng::new(bottom_right.lat, top_left.lng);
        let top_right = LatLng::new(top_left.lat, bottom_right.lng);

        let projector = UtmProjector::for_lat_lng(bottom_left, ellipsoid)?;
        let tl = projector.project(top_left)?;
        let tr = projector.project(top_right)?;
        let bl = projector.project(bottom_left)?;
        let br = projector.project(bottom_right)?;
        debug!(?tl, ?tr, ?bl, ?br, zone = projector.zone(), "trellis corners");

        let left =
            calculate_step_offsets(bl.northing, tl.northing, tl.easting - bl.easting, spacing);
        let right =
            calculate_step_offsets(br.northing, tr.northing, tr.easting - br.easting, spacing);
        let bottom =
            calculate_step_offsets(bl.easting, br.easting, br.northing - bl.northing, spacing);
        let top =
            calculate_step_offsets(tl.easting, tr.easting, tr.northing - tl.northing, spacing);

        let northing = Offset::new(left, right);
        let easting = Offset::new(bottom, top);
        debug!(
            northing_bars = northing.count,
            easting_bars = easting.count,
            spacing = spacing.size(),
            "trellis offsets"
        );

        Ok(Self {
            ellipsoid: *ellipsoid,
            spacing,
            top_left: tl,
            top_right: tr,
            bottom_left: bl,
            bottom_right: br,
            northing,
            easting,
        })
    }

    /// The trellis over `cell`.
    pub fn for_cell(cell: &Cell, ellipsoid: &Ellipsoid, spacing: GridSpacing) -> Result<Self> {
        let sw = cell.sw_lat_lng();
        let ne = cell.ne_lat_lng();
        Self::new(
            LatLng::new(ne.lat, sw.lng),
            LatLng::new(sw.lat, ne.lng),
            ellipsoid,
            spacing,
        )
    }

    /// Page width in meters (the bottom edge).
    pub fn width(&self) -> f64 {
        self.easting.start.length
    }

    /// Page height in meters (the left edge).
    pub fn height(&self) -> f64 {
        self.northing.start.length
    }

    fn size(&self) -> i64 {
        self.spacing.size() as i64
    }

    /// Bar `idx` of the northing family, running from the left edge to the right.
    ///
    /// Each end sits on the `idx`th grid line of its own edge, stepped by that
    /// edge's step size.
    pub fn northing_bar(&self, idx: usize) -> Option<Bar> {
        if idx >= self.northing.count {
            return None;
        }
        let left = self.northing.start.fraction_for(idx, self.spacing);
        let right = self.northing.end.fraction_for(idx, self.spacing);
        let h = self.height();
        Some(Bar {
            coordinate: self.northing.first_line + idx as i64 * self.size(),
            start: lerp(self.bottom_left, self.top_left, left),
            end: lerp(self.bottom_right, self.top_right, right),
            x1: 0.0,
            y1: left * h,
            x2: self.width(),
            y2: right * h,
        })
    }

    /// Bar `idx` of the easting family, running from the bottom edge to the top.
    pub fn easting_bar(&self, idx: usize) -> Option<Bar> {
        if idx >= self.easting.count {
            return None;
        }
        let bottom = self.easting.start.fraction_for(idx, self.spacing);
        let top = self.easting.end.fraction_for(idx, self.spacing);
        let w = self.width();
        Some(Bar {
            coordinate: self.easting.first_line + idx as i64 * self.size(),
            start: lerp(self.bottom_left, self.bottom_right, bottom),
            end: lerp(self.top_left, self.top_right, top),
            x1: bottom * w,
            y1: 0.0,
            x2: top * w,
            y2: self.height(),
        })
    }

    /// Calls `draw` with each northing bar in order, stopping at the first error.
    pub fn northing_bars<E, F>(&self, mut draw: F) -> std::result::Result<(), E>
    where
        F: FnMut(usize, Bar) -> std::result::Result<(), E>,
    {
        for idx in 0..self.northing.count {
            if let Some(bar) = self.northing_bar(idx) {
                draw(idx, bar)?;
            }
        }
        Ok(())
    }

    /// Calls `draw` with each easting bar in order, stopping at the first error.
    pub fn easting_bars<E, F>(&self, mut draw: F) -> std::result::Result<(), E>
    where
        F: FnMut(usize, Bar) -> std::result::Result<(), E>,
    {
        for idx in 0..self.easting.count {
            if let Some(bar) = self.easting_bar(idx) {
                draw(idx, bar)?;
            }
        }
        Ok(())
    }
}

fn lerp(a: UtmCoord, b: UtmCoord, t: f64) -> UtmCoord {
    UtmCoord {
        zone: a.zone,
        hemi: a.hemi,
        easting: a.easting + (b.easting - a.easting) * t,
        northing: a.northing + (b.northing - a.northing) * t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_offsets_aligned_ends() {
        let e = calculate_step_offsets(1000.0, 3000.0, 0.0, GridSpacing::GRID_1K);
        assert_eq!(e.first_line, 1000);
        assert_eq!(e.steps, 3);
        assert_eq!(e.start_offset, 0.0);
        assert_eq!(e.end_offset, 0.0);
        assert_eq!(e.step_size, 1000.0);
        assert_eq!(e.last_line(GridSpacing::GRID_1K), Some(3000));
    }

    #[test]
    fn test_step_offsets_unaligned() {
        let e = calculate_step_offsets(1000.5, 2999.5, 0.0, GridSpacing::GRID_1K);
        assert_eq!(e.first_line, 2000);
        assert_eq!(e.steps, 1);
        assert!((e.start_offset - 999.5).abs() < 1e-9);
        assert!((e.end_offset - 999.5).abs() < 1e-9);

        let e = calculate_step_offsets(-1500.0, -100.0, 0.0, GridSpacing::GRID_1K);
        assert_eq!(e.first_line, -1000);
        assert_eq!(e.steps, 1);
    }

    #[test]
    fn test_step_offsets_skewed() {
        let e = calculate_step_offsets(0.0, 1000.0, 1000.0, GridSpacing::GRID_100);
        assert!((e.length - 1000.0 * 2f64.sqrt()).abs() < 1e-9);
        assert!((e.step_size - 100.0 * 2f64.sqrt()).abs() < 1e-9);
        assert_eq!(e.steps, 11);
    }

    #[test]
    fn test_step_offsets_degenerate() {
        let e = calculate_step_offsets(500.0, 500.0, 10.0, GridSpacing::GRID_1K);
        assert_eq!(e.steps, 0);
        assert_eq!(e.step_size, 0.0);
        assert!(e.step_size.is_finite());

        let e = calculate_step_offsets(1100.0, 1900.0, 0.0, GridSpacing::GRID_1K);
        assert_eq!(e.steps, 0);
        assert_eq!(e.last_line(GridSpacing::GRID_1K), None);
    }

    #[test]
    fn test_offset_takes_the_larger_edge() {
        let spacing = GridSpacing::GRID_1K;
        let left = calculate_step_offsets(1200.0, 5200.0, 0.0, spacing);
        let right = calculate_step_offsets(600.0, 4600.0, 0.0, spacing);
        let offset = Offset::new(left, right);
        assert_eq!(offset.first_line, 2000);
        assert_eq!(offset.count, 4);

        let right = calculate_step_offsets(500.0, 5500.0, 0.0, spacing);
        let offset = Offset::new(left, right);
        assert_eq!(right.steps, 5);
        assert_eq!(offset.count, 5);
        assert_eq!(offset.first_line, 2000);

        let empty = calculate_step_offsets(1100.0, 1900.0, 0.0, spacing);
        let offset = Offset::new(empty, right);
        assert_eq!(offset.first_line, 1000);
        assert_eq!(offset.count, 5);
    }

    #[test]
    fn test_fraction_for_steps_along_the_edge() {
        let spacing = GridSpacing::GRID_1K;
        let e = calculate_step_offsets(1500.0, 5500.0, 3000.0, spacing);
        assert_eq!(e.steps, 4);
        assert!((e.fraction_for(0, spacing) - 0.125).abs() < 1e-12);
        assert!((e.fraction_for(1, spacing) - 0.375).abs() < 1e-12);
        assert!((e.fraction_for(3, spacing) - 0.875).abs() < 1e-12);
        assert_eq!(e.fraction_for(9, spacing), 1.0);

        let empty = calculate_step_offsets(1100.0, 1900.0, 0.0, spacing);
        assert_eq!(empty.fraction_for(0, spacing), 0.0);
    }

    fn one_degree() -> Result<Structure> {
        Structure::new(
            LatLng::new(41.0, -122.0),
            LatLng::new(40.0, -121.0),
            &Ellipsoid::WGS84,
            GridSpacing::GRID_1K,
        )
    }

    #[test]
    fn test_northing_bars_cover_the_page() -> Result<()> {
        let s = one_degree()?;
        assert_eq!(s.bottom_left.zone, 10);
        assert!(s.northing.count >= s.northing.start.steps);
        assert!(s.northing.count >= 110);

        let mut bars = Vec::new();
        s.northing_bars(|idx, bar| -> Result<()> {
            bars.push((idx, bar));
            Ok(())
        })?;
        assert_eq!(bars.len(), s.northing.count);
        for w in bars.windows(2) {
            let ((i, a), (j, b)) = (w[0], w[1]);
            assert_eq!(j, i + 1);
            assert_eq!(b.coordinate - a.coordinate, 1000);
            assert!(b.y1 >= a.y1 && b.y2 >= a.y2);
        }
        Ok(())
    }

    #[test]
    fn test_bar_endpoints_follow_grid_values() -> Result<()> {
        let s = one_degree()?;
        let idx = s.northing.count / 2;
        let bar = s.northing_bar(idx).ok_or(AtlasError::NotFound)?;
        assert!((bar.start.northing - bar.coordinate as f64).abs() < 1e-6);
        let right = s.northing.end.first_line + idx as i64 * 1000;
        assert!((bar.end.northing - right as f64).abs() < 1e-6);
        assert_eq!(bar.x1, 0.0);
        assert!((bar.x2 - s.width()).abs() < 1e-9);

        let bar = s.easting_bar(0).ok_or(AtlasError::NotFound)?;
        assert!((bar.start.easting - bar.coordinate as f64).abs() < 1e-6);
        let top = s.easting.end.first_line as f64;
        assert!((bar.end.easting - top).abs() < 1e-6);
        assert_eq!(bar.y1, 0.0);
        assert!((bar.y2 - s.height()).abs() < 1e-9);
        assert!(s.easting_bar(s.easting.count).is_none());
        Ok(())
    }

    #[test]
    fn test_skewed_cell_bars_stay_on_the_page() -> Result<()> {
        // three degrees west of the zone 32 central meridian
        let s = Structure::new(
            LatLng::new(41.0, 6.0),
            LatLng::new(40.0, 7.0),
            &Ellipsoid::WGS84,
            GridSpacing::GRID_1K,
        )?;
        assert_eq!(s.bottom_left.zone, 32);
        assert_ne!(s.northing.start.first_line, s.northing.end.first_line);
        assert_ne!(s.northing.start_step_size(), s.northing.end_step_size());
        assert_eq!(s.northing.count, s.northing.start.steps.max(s.northing.end.steps));
        assert_eq!(s.easting.count, s.easting.start.steps.max(s.easting.end.steps));

        let (w, h) = (s.width(), s.height());
        let on_page = |v: f64, len: f64| v >= -1e-6 && v <= len + 1e-6;
        s.northing_bars(|_, bar| -> Result<()> {
            assert!(on_page(bar.y1, h) && on_page(bar.y2, h));
            Ok(())
        })?;
        s.easting_bars(|_, bar| -> Result<()> {
            assert!(on_page(bar.x1, w) && on_page(bar.x2, w));
            Ok(())
        })?;
        Ok(())
    }

    #[test]
    fn test_easting_bars_stop_at_first_error() -> Result<()> {
        let s = one_degree()?;
        assert!(s.easting.count > 5);
        let mut seen = 0;
        let res = s.easting_bars(|idx, _| {
            seen += 1;
            if idx == 3 { Err("stop") } else { Ok(()) }
        });
        assert_eq!(res, Err("stop"));
        assert_eq!(seen, 4);
        Ok(())
    }

    #[test]
    fn test_for_cell_and_invalid_input() -> Result<()> {
        let cell = Cell::builder().sw(40.0, -122.0).ne(41.0, -121.0).build()?;
        let s = Structure::for_cell(&cell, &Ellipsoid::WGS84, GridSpacing::GRID_1K)?;
        assert_eq!(s, one_degree()?);

        let res = Structure::new(
            LatLng::new(40.0, -122.0),
            LatLng::new(41.0, -121.0),
            &Ellipsoid::WGS84,
            GridSpacing::GRID_1K,
        );
        assert!(matches!(res, Err(AtlasError::InvalidBounds(_))));

        let res = Structure::new(
            LatLng::new(86.0, 10.0),
            LatLng::new(85.0, 11.0),
            &Ellipsoid::WGS84,
            GridSpacing::GRID_1K,
        );
        assert!(matches!(res, Err(AtlasError::PolarRegion { .. })));
        Ok(())
    }
}
