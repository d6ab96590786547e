use serde::{Deserialize, Serialize};
use std::fmt;

/// Degree, minute, second form of a single latitude or longitude value.
///
/// `degree`, `minute` and `second` are always non-negative; the sign lives only
/// in `hemisphere` (`N`/`S` for latitudes, `E`/`W` for longitudes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    pub degree: u32,
    pub minute: u32,
    pub second: f64,
    pub hemisphere: char,
}

impl Dms {
    /// Formats as `D°M'S"H` with `prec` decimals on the seconds.
    /// A `prec` of 0 uses six decimals.
    pub fn as_string(&self, prec: usize) -> String {
        let prec = if prec == 0 { 6 } else { prec };
        format!(
            "{}°{}'{:.*}\"{}",
            self.degree, self.minute, prec, self.second, self.hemisphere
        )
    }

    /// Signed decimal degrees.
    pub fn to_decimal(&self) -> f64 {
        let v = self.degree as f64 + self.minute as f64 / 60.0 + self.second / 3600.0;
        match self.hemisphere {
            'S' | 'W' => -v,
            _ => v,
        }
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string(0))
    }
}

/// Pre-formatted DMS strings for a corner, as stored on a cell.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LatLngDms {
    pub lat: String,
    pub lng: String,
}

impl LatLngDms {
    pub fn new(lat: impl Into<String>, lng: impl Into<String>) -> Self {
        Self {
            lat: lat.into(),
            lng: lng.into(),
        }
    }

    pub(crate) fn from_dms(dms: &[Dms; 2]) -> Self {
        Self::new(dms[0].to_string(), dms[1].to_string())
    }

    /// True when either component is missing.
    pub fn is_incomplete(&self) -> bool {
        self.lat.is_empty() || self.lng.is_empty()
    }
}

fn split(v: f64) -> (u32, u32, f64) {
    let frac = v.fract();
    let minutes = 60.0 * frac;
    let second = 60.0 * minutes.fract();
    (
        v.trunc().abs() as u32,
        minutes.trunc().abs() as u32,
        second.abs(),
    )
}

/// Converts a lat/lng pair to its DMS values. Zero is treated as `N`/`E`.
///
/// # Example
/// ```
/// use atlas_sheets::to_dms;
///
/// let [lat, lng] = to_dms(32.5, -117.25);
/// assert_eq!(lat.as_string(1), "32°30'0.0\"N");
/// assert_eq!(lng.as_string(1), "117°15'0.0\"W");
/// ```
pub fn to_dms(lat: f64, lng: f64) -> [Dms; 2] {
    let (lat_d, lat_m, lat_s) = split(lat);
    let (lng_d, lng_m, lng_s) = split(lng);
    [
        Dms {
            degree: lat_d,
            minute: lat_m,
            second: lat_s,
            hemisphere: if lat < 0.0 { 'S' } else { 'N' },
        },
        Dms {
            degree: lng_d,
            minute: lng_m,
            second: lng_s,
            hemisphere: if lng < 0.0 { 'W' } else { 'E' },
        },
    ]
}
