use crate::cell::CellSize;
use thiserror::Error;

/// Result type alias using `AtlasError`.
pub type Result<T> = std::result::Result<T, AtlasError>;

/// The sheet pipeline stage an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CellLookup,
    Subdivision,
    Trellis,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::CellLookup => write!(f, "cell lookup"),
            Stage::Subdivision => write!(f, "subdivision"),
            Stage::Trellis => write!(f, "trellis construction"),
        }
    }
}

/// Error type for atlas-sheets operations.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// The requested cell does not exist in the grid provider.
    #[error("grid not found")]
    NotFound,

    /// A subdivision provider was handed a base provider that is not 50K.
    #[error("unsupported cell size ({0}), only support 50K")]
    UnsupportedCellSize(CellSize),

    /// Sub-sheet part numbers run from 1 to 100.
    #[error("invalid sheet number: {0}")]
    InvalidSheetNumber(u32),

    /// The base provider name of a subdivision provider is blank.
    #[error("base provider name is blank")]
    BlankSubprovider,

    #[error("provider ({0}) already exists")]
    ProviderTypeExists(String),

    #[error("provider ({0}) not registered")]
    ProviderNotRegistered(String),

    #[error("no providers registered")]
    NoProvidersRegistered,

    /// A configuration referenced a named provider that has not been built.
    #[error("named provider ({0}) is not configured")]
    ProviderMissing(String),

    #[error(
        "invalid number of rows: {0}; rows must be between {min} and {max}",
        min = crate::grating::MIN_ROW_COL,
        max = crate::grating::MAX_ROW_COL
    )]
    InvalidRowCount(u32),

    #[error(
        "invalid number of cols: {0}; cols must be between {min} and {max}",
        min = crate::grating::MIN_ROW_COL,
        max = crate::grating::MAX_ROW_COL
    )]
    InvalidColCount(u32),

    #[error("invalid UTM zone: {0}")]
    InvalidZone(u8),

    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    /// UTM is undefined here; UPS would apply.
    #[error("({lat}, {lng}) is in a polar region, UTM is not defined")]
    PolarRegion { lat: f64, lng: f64 },

    /// Coordinate projection failed.
    #[error("projection error: {0}")]
    Projection(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to decode job: {0}")]
    JobDecode(String),

    /// An error annotated with the pipeline stage that produced it.
    #[error("{stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<AtlasError>,
    },
}

impl AtlasError {
    /// Wraps this error with the stage it happened in. Already staged
    /// errors are returned untouched.
    pub fn at(self, stage: Stage) -> Self {
        match self {
            AtlasError::Stage { .. } => self,
            other => AtlasError::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage this error was raised in, if it was annotated.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            AtlasError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
