use crate::cell::Mdgid;
use crate::coord::{Hemisphere, LatLng, LatLngDms, UtmInfo, Zone, calculate_sec_lengths};
use crate::core::constants::{CELL_TILE_SIZE, MERCATOR_EARTH_CIRCUMFERENCE};
use crate::core::{center_lng_lat, center_px, width_height_tile, zoom};
use crate::error::{AtlasError, Result};
use chrono::{DateTime, Utc};
use geo::Intersects;
use geo_types::{Point, Rect, coord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Who last edited a cell, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditInfo {
    pub by: String,
    pub date: DateTime<Utc>,
}

impl EditInfo {
    pub fn new(by: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            by: by.into(),
            date,
        }
    }
}

/// Zone of a cell as reported to page templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellZone {
    Zone(Zone),
    /// The cell carries no UTM data.
    Unknown,
}

impl CellZone {
    /// Two digit zone label, or `default` when there is no numbered zone.
    pub fn label_or(&self, default: &str) -> String {
        match self {
            CellZone::Zone(Zone::Numbered(z)) => format!("{z:02}"),
            _ => default.to_string(),
        }
    }
}

impl fmt::Display for CellZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellZone::Zone(z) => write!(f, "{z}"),
            CellZone::Unknown => f.write_str("unknown"),
        }
    }
}

/// A rectangular geographic region printed as one map sheet.
///
/// Corners are WGS84 decimal degrees. `len` holds the meters per arc-second
/// of latitude and longitude at the south-west corner. The derived fields
/// (`len`, the DMS strings and `utm`) are optional in storage and filled by
/// [`Cell::init`]; everything is read-only once the cell is handed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) mdgid: Mdgid,
    pub(crate) sw: LatLng,
    pub(crate) ne: LatLng,
    #[serde(default)]
    pub(crate) len: Option<LatLng>,
    #[serde(default)]
    pub(crate) sw_dms: Option<LatLngDms>,
    #[serde(default)]
    pub(crate) ne_dms: Option<LatLngDms>,
    #[serde(default)]
    pub(crate) utm: Option<UtmInfo>,
    #[serde(default)]
    pub(crate) country: String,
    #[serde(default)]
    pub(crate) city: String,
    #[serde(default)]
    pub(crate) series: String,
    #[serde(default)]
    pub(crate) sheet: String,
    #[serde(default)]
    pub(crate) nrn: String,
    #[serde(default)]
    pub(crate) published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) edited: Option<EditInfo>,
    #[serde(default)]
    pub(crate) metadata: HashMap<String, String>,
}

impl Cell {
    pub fn builder() -> CellBuilder {
        CellBuilder::new()
    }

    /// Fills in any derived field that is absent: UTM info from the NE
    /// corner, the DMS strings of both corners and the arc lengths at the
    /// SW latitude. Calling it again changes nothing.
    pub fn init(&mut self) {
        if self.utm.is_none() {
            self.utm = Some(self.ne.to_utm_info());
        }
        if self.ne_dms.as_ref().is_none_or(LatLngDms::is_incomplete) {
            self.ne_dms = Some(LatLngDms::from_dms(&self.ne.to_dms()));
        }
        if self.sw_dms.as_ref().is_none_or(LatLngDms::is_incomplete) {
            self.sw_dms = Some(LatLngDms::from_dms(&self.sw.to_dms()));
        }
        if self.len.is_none() {
            let (lat_len, lng_len) = calculate_sec_lengths(self.sw.lat);
            self.len = Some(LatLng::new(lat_len, lng_len));
        }
    }

    /// Errors unless the corners are finite and NE lies strictly north-east of SW.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.sw.lat, self.sw.lng, self.ne.lat, self.ne.lng]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(AtlasError::InvalidBounds(format!(
                "{}: corners must be finite",
                self.mdgid
            )));
        }
        if self.ne.lat <= self.sw.lat || self.ne.lng <= self.sw.lng {
            return Err(AtlasError::InvalidBounds(format!(
                "{}: ne ({}, {}) must be north-east of sw ({}, {})",
                self.mdgid, self.ne.lat, self.ne.lng, self.sw.lat, self.sw.lng
            )));
        }
        Ok(())
    }

    /// Moves the cell to new corners, recomputing the derived DMS and arc
    /// lengths. UTM info is kept.
    pub(crate) fn with_bounds(mut self, sw: LatLng, ne: LatLng) -> Self {
        self.sw = sw;
        self.ne = ne;
        self.sw_dms = None;
        self.ne_dms = None;
        self.len = None;
        self.init();
        self
    }

    pub fn mdgid(&self) -> &Mdgid {
        &self.mdgid
    }

    pub fn sw_lat_lng(&self) -> LatLng {
        self.sw
    }

    pub fn ne_lat_lng(&self) -> LatLng {
        self.ne
    }

    /// `[lng, lat]` of the north-east corner.
    pub fn ne(&self) -> [f64; 2] {
        [self.ne.lng, self.ne.lat]
    }

    /// `[lng, lat]` of the north-west corner.
    pub fn nw(&self) -> [f64; 2] {
        [self.sw.lng, self.ne.lat]
    }

    /// `[lng, lat]` of the south-west corner.
    pub fn sw(&self) -> [f64; 2] {
        [self.sw.lng, self.sw.lat]
    }

    /// `[lng, lat]` of the south-east corner.
    pub fn se(&self) -> [f64; 2] {
        [self.ne.lng, self.sw.lat]
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn series(&self) -> &str {
        &self.series
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn nrn(&self) -> &str {
        &self.nrn
    }

    pub fn utm(&self) -> Option<UtmInfo> {
        self.utm
    }

    pub fn publication_date(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    pub fn edited(&self) -> Option<&EditInfo> {
        self.edited.as_ref()
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// The MDGID reference, with a `-Part` suffix for sub-sheets.
    pub fn reference_number(&self) -> String {
        with_part(&self.mdgid.id, self.mdgid.part)
    }

    /// The sheet number, with a `-Part` suffix for sub-sheets.
    pub fn sheet_number(&self) -> String {
        with_part(&self.sheet, self.mdgid.part)
    }

    pub fn zone(&self) -> CellZone {
        match self.utm {
            Some(utm) => CellZone::Zone(utm.zone),
            None => CellZone::Unknown,
        }
    }

    /// South only when the cell's UTM data says so.
    pub fn hemi(&self) -> Hemisphere {
        self.utm.map(|u| u.hemi).unwrap_or_default()
    }

    pub fn ne_lat_dms(&self) -> String {
        dms_or(self.ne_dms.as_ref().map(|d| d.lat.as_str()), || {
            self.ne.to_dms()[0].as_string(1)
        })
    }

    pub fn ne_lng_dms(&self) -> String {
        dms_or(self.ne_dms.as_ref().map(|d| d.lng.as_str()), || {
            self.ne.to_dms()[1].as_string(1)
        })
    }

    pub fn sw_lat_dms(&self) -> String {
        dms_or(self.sw_dms.as_ref().map(|d| d.lat.as_str()), || {
            self.sw.to_dms()[0].as_string(1)
        })
    }

    pub fn sw_lng_dms(&self) -> String {
        dms_or(self.sw_dms.as_ref().map(|d| d.lng.as_str()), || {
            self.sw.to_dms()[1].as_string(1)
        })
    }

    /// Meters per arc-second of latitude.
    pub fn lat_len(&self) -> f64 {
        self.lengths().lat
    }

    /// Meters per arc-second of longitude.
    pub fn lng_len(&self) -> f64 {
        self.lengths().lng
    }

    fn lengths(&self) -> LatLng {
        self.len.unwrap_or_else(|| {
            let (lat_len, lng_len) = calculate_sec_lengths(self.sw.lat);
            LatLng::new(lat_len, lng_len)
        })
    }

    /// Bounding rectangle in lng/lat.
    pub fn hull(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.sw.lng, y: self.sw.lat },
            coord! { x: self.ne.lng, y: self.ne.lat },
        )
    }

    /// Boundary inclusive.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        self.hull().intersects(&Point::new(lng, lat))
    }

    /// Web mercator zoom for printing at `scale` and `dpi`, evaluated at the
    /// SW latitude rather than the centre.
    pub fn zoom_for_scale_dpi(&self, scale: u32, dpi: u32) -> f64 {
        zoom(MERCATOR_EARTH_CIRCUMFERENCE, scale, dpi, self.sw.lat)
    }

    /// Pixel width and height of the cell at `zoom`.
    pub fn width_height_for_zoom(&self, zoom: f64) -> (f64, f64) {
        width_height_tile(&self.hull(), zoom, CELL_TILE_SIZE)
    }

    /// Pixel-space centroid of the cell at `zoom`.
    pub fn center_pt_for_zoom(&self, zoom: f64) -> [f64; 2] {
        let c = center_px(&self.hull(), zoom, CELL_TILE_SIZE);
        [c.x, c.y]
    }

    /// The position under [`Cell::center_pt_for_zoom`].
    pub fn center_lng_lat_for_zoom(&self, zoom: f64) -> LatLng {
        let c = center_lng_lat(&self.hull(), zoom, CELL_TILE_SIZE);
        LatLng::new(c.y, c.x)
    }
}

fn with_part(base: &str, part: u32) -> String {
    if part == 0 {
        base.to_string()
    } else {
        format!("{base}-{part}")
    }
}

fn dms_or(stored: Option<&str>, compute: impl FnOnce() -> String) -> String {
    match stored {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => compute(),
    }
}

/// Builds a [`Cell`] from explicit values; [`CellBuilder::build`] validates
/// the corners and fills whatever derived fields were left out.
#[derive(Debug, Default)]
pub struct CellBuilder {
    mdgid: Mdgid,
    sw: Option<LatLng>,
    ne: Option<LatLng>,
    sw_dms: Option<LatLngDms>,
    ne_dms: Option<LatLngDms>,
    utm: Option<UtmInfo>,
    country: String,
    city: String,
    series: String,
    sheet: String,
    nrn: String,
    published_at: Option<DateTime<Utc>>,
    edited: Option<EditInfo>,
    metadata: HashMap<String, String>,
}

impl CellBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mdgid(mut self, mdgid: Mdgid) -> Self {
        self.mdgid = mdgid;
        self
    }

    pub fn sw(mut self, lat: f64, lng: f64) -> Self {
        self.sw = Some(LatLng::new(lat, lng));
        self
    }

    pub fn ne(mut self, lat: f64, lng: f64) -> Self {
        self.ne = Some(LatLng::new(lat, lng));
        self
    }

    pub fn sw_dms(mut self, dms: LatLngDms) -> Self {
        self.sw_dms = Some(dms);
        self
    }

    pub fn ne_dms(mut self, dms: LatLngDms) -> Self {
        self.ne_dms = Some(dms);
        self
    }

    pub fn utm(mut self, utm: UtmInfo) -> Self {
        self.utm = Some(utm);
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    pub fn series(mut self, series: impl Into<String>) -> Self {
        self.series = series.into();
        self
    }

    pub fn sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = sheet.into();
        self
    }

    pub fn nrn(mut self, nrn: impl Into<String>) -> Self {
        self.nrn = nrn.into();
        self
    }

    pub fn published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    pub fn edited(mut self, edited: EditInfo) -> Self {
        self.edited = Some(edited);
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<Cell> {
        let (Some(sw), Some(ne)) = (self.sw, self.ne) else {
            return Err(AtlasError::InvalidBounds(format!(
                "{}: both corners are required",
                self.mdgid
            )));
        };
        let mut cell = Cell {
            mdgid: self.mdgid,
            sw,
            ne,
            len: None,
            sw_dms: self.sw_dms,
            ne_dms: self.ne_dms,
            utm: self.utm,
            country: self.country,
            city: self.city,
            series: self.series,
            sheet: self.sheet,
            nrn: self.nrn,
            published_at: self.published_at,
            edited: self.edited,
            metadata: self.metadata,
        };
        cell.validate()?;
        cell.init();
        Ok(cell)
    }
}
