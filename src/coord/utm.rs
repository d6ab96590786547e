use crate::coord::LatLng;
use crate::error::AtlasError;
use proj::Proj;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{trace, warn};

/// UTM hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Hemisphere {
    #[default]
    North,
    South,
}

impl Hemisphere {
    /// Southern only for negative latitudes.
    pub fn from_lat(lat: f64) -> Self {
        if lat < 0.0 {
            Hemisphere::South
        } else {
            Hemisphere::North
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Hemisphere::North => "N",
            Hemisphere::South => "S",
        }
    }
}

/// A UTM longitudinal zone, or the polar regions where UPS applies instead.
///
/// Stored values above 60 deserialize as zone 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Zone {
    /// Zones 1 through 60.
    Numbered(u8),
    Polar,
}

impl Zone {
    /// `0` is the polar sentinel; 1-60 are regular zones.
    pub fn new(zone: u8) -> Result<Self, AtlasError> {
        match zone {
            0 => Ok(Zone::Polar),
            1..=60 => Ok(Zone::Numbered(zone)),
            _ => Err(AtlasError::InvalidZone(zone)),
        }
    }

    pub fn from_lat_lng(lat: f64, lng: f64) -> Self {
        match zone_from_lat_lng(lat, lng) {
            0 => Zone::Polar,
            z => Zone::Numbered(z),
        }
    }

    pub fn number(&self) -> Option<u8> {
        match self {
            Zone::Numbered(z) => Some(*z),
            Zone::Polar => None,
        }
    }
}

impl From<u8> for Zone {
    fn from(zone: u8) -> Self {
        Zone::new(zone).unwrap_or_else(|_| {
            warn!(zone, "zone out of range, using zone 1");
            Zone::Numbered(1)
        })
    }
}

impl From<Zone> for u8 {
    fn from(zone: Zone) -> Self {
        zone.number().unwrap_or(0)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Numbered(z) => write!(f, "{z:02}"),
            Zone::Polar => write!(f, "UPS"),
        }
    }
}

/// Returns the UTM zone (1-60) for the position, or 0 in the polar regions
/// where UPS should be used.
///
/// Handles the Norway (zone 32) and Svalbard (31/33/35/37) exceptions.
/// Longitudes outside \[-180, 180) wrap around.
///
/// # Example
/// ```
/// use atlas_sheets::zone_from_lat_lng;
///
/// assert_eq!(zone_from_lat_lng(40.0, -122.0), 10);
/// assert_eq!(zone_from_lat_lng(57.0, 5.0), 32);
/// assert_eq!(zone_from_lat_lng(85.0, 5.0), 0);
/// ```
pub fn zone_from_lat_lng(lat: f64, lng: f64) -> u8 {
    if (lat > 84.0 && lat < 90.0) || (lat < -80.0 && lat > -90.0) {
        return 0;
    }

    if (56.0..64.0).contains(&lat) && (3.0..12.0).contains(&lng) {
        return 32;
    }
    if (72.0..84.0).contains(&lat) {
        match lng {
            l if (0.0..9.0).contains(&l) => return 31,
            l if (9.0..21.0).contains(&l) => return 33,
            l if (21.0..33.0).contains(&l) => return 35,
            l if (33.0..42.0).contains(&l) => return 37,
            _ => {}
        }
    }

    // [-180, 180) recast to [0, 360) and split into 60 six degree zones
    let idx = ((lng + 180.0) / 6.0).floor() as i64;
    (idx.rem_euclid(60) + 1) as u8
}

/// UTM zone and hemisphere of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmInfo {
    pub zone: Zone,
    pub hemi: Hemisphere,
}

impl UtmInfo {
    pub fn new(zone: u8, hemi: Hemisphere) -> Result<Self, AtlasError> {
        Ok(Self {
            zone: Zone::new(zone)?,
            hemi,
        })
    }

    pub fn from_lat_lng(ll: LatLng) -> Self {
        Self {
            zone: Zone::from_lat_lng(ll.lat, ll.lng),
            hemi: Hemisphere::from_lat(ll.lat),
        }
    }
}

/// Reference ellipsoid used for UTM projection.
///
/// `eccentricity` is the squared first eccentricity (e²).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub name: &'static str,
    pub radius: f64,
    pub eccentricity: f64,
    pub nato_compatible: bool,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        name: "WGS_84",
        radius: 6378137.0,
        eccentricity: 0.00669438,
        nato_compatible: true,
    };

    pub const GRS80: Ellipsoid = Ellipsoid {
        name: "GRS_80",
        radius: 6378137.0,
        eccentricity: 0.00669438002290,
        nato_compatible: true,
    };

    pub const INTERNATIONAL_1924: Ellipsoid = Ellipsoid {
        name: "International_1924",
        radius: 6378388.0,
        eccentricity: 0.00672267,
        nato_compatible: true,
    };

    pub const CLARKE_1866: Ellipsoid = Ellipsoid {
        name: "Clarke_1866",
        radius: 6378206.4,
        eccentricity: 0.006768658,
        nato_compatible: true,
    };

    const KNOWN: [Ellipsoid; 4] = [
        Self::WGS84,
        Self::GRS80,
        Self::INTERNATIONAL_1924,
        Self::CLARKE_1866,
    ];

    /// Case-insensitive lookup; `-`, `_` and spaces are ignored.
    pub fn by_name(name: &str) -> Option<Ellipsoid> {
        let norm = |s: &str| {
            s.chars()
                .filter(|c| !matches!(c, '-' | '_' | ' '))
                .collect::<String>()
                .to_ascii_lowercase()
        };
        let wanted = norm(name);
        Self::KNOWN.into_iter().find(|e| norm(e.name) == wanted)
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::WGS84
    }
}

/// A projected UTM position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtmCoord {
    pub zone: u8,
    pub hemi: Hemisphere,
    pub easting: f64,
    pub northing: f64,
}

/// Projects geographic positions into one fixed UTM zone.
pub struct UtmProjector {
    zone: u8,
    hemi: Hemisphere,
    proj: Proj,
}

impl UtmProjector {
    pub fn new(zone: u8, hemi: Hemisphere, ellipsoid: &Ellipsoid) -> Result<Self, AtlasError> {
        if !(1..=60).contains(&zone) {
            return Err(AtlasError::InvalidZone(zone));
        }
        let south = match hemi {
            Hemisphere::South => " +south",
            Hemisphere::North => "",
        };
        let definition = format!(
            "+proj=utm +zone={zone}{south} +a={} +es={} +units=m +no_defs",
            ellipsoid.radius, ellipsoid.eccentricity
        );
        trace!(%definition, "creating utm projection");
        let proj = Proj::new(&definition).map_err(|e| AtlasError::Projection(e.to_string()))?;
        Ok(Self { zone, hemi, proj })
    }

    /// A projector for the zone and hemisphere that contain `ll`.
    pub fn for_lat_lng(ll: LatLng, ellipsoid: &Ellipsoid) -> Result<Self, AtlasError> {
        match Zone::from_lat_lng(ll.lat, ll.lng) {
            Zone::Numbered(zone) => Self::new(zone, Hemisphere::from_lat(ll.lat), ellipsoid),
            Zone::Polar => Err(AtlasError::PolarRegion {
                lat: ll.lat,
                lng: ll.lng,
            }),
        }
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn hemi(&self) -> Hemisphere {
        self.hemi
    }

    /// Projects `ll` into this projector's zone, even if it lies outside it.
    pub fn project(&self, ll: LatLng) -> Result<UtmCoord, AtlasError> {
        let (easting, northing) = self
            .proj
            .project((ll.lng.to_radians(), ll.lat.to_radians()), false)
            .map_err(|e| AtlasError::Projection(e.to_string()))?;
        Ok(UtmCoord {
            zone: self.zone,
            hemi: self.hemi,
            easting,
            northing,
        })
    }
}

/// Projects `ll` into its own UTM zone.
pub fn utm_from_lat_lng(ll: LatLng, ellipsoid: &Ellipsoid) -> Result<UtmCoord, AtlasError> {
    UtmProjector::for_lat_lng(ll, ellipsoid)?.project(ll)
}
