//! JSON configuration for providers and sheets.
//!
//! ```
//! use atlas_sheets::AtlasConfig;
//!
//! # fn main() -> Result<(), atlas_sheets::AtlasError> {
//! let config = AtlasConfig::from_json_str(r#"{
//!     "providers": [
//!         { "name": "base", "type": "memory", "cell_size": "50K", "cells": [] },
//!         { "name": "5k", "type": "grid5k", "provider": "base" }
//!     ],
//!     "sheets": [
//!         { "name": "5k-sheet", "provider": "5k", "scale": 5000 }
//!     ]
//! }"#)?;
//! assert_eq!(config.providers[1].string("provider")?, "base");
//! assert_eq!(config.sheet("5k-sheet").map(|s| s.dpi), Some(96));
//! # Ok(())
//! # }
//! ```

use crate::coord::Ellipsoid;
use crate::error::{AtlasError, Result};
use crate::trellis::GridSpacing;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Configuration for one named provider instance.
///
/// Every key besides `name` and `type` lands in `settings` and is interpreted
/// by the provider's init function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            settings: Map::new(),
        }
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    /// The string setting `key`; missing or non-string values are errors.
    pub fn string(&self, key: &str) -> Result<String> {
        match self.settings.get(key) {
            Some(v) => self.as_string(key, v),
            None => Err(AtlasError::Config(format!(
                "provider ({}) is missing key {key:?}",
                self.name
            ))),
        }
    }

    /// Like [`ProviderConfig::string`] but a missing key yields `default`.
    pub fn string_or(&self, key: &str, default: &str) -> Result<String> {
        match self.settings.get(key) {
            Some(v) => self.as_string(key, v),
            None => Ok(default.to_string()),
        }
    }

    fn as_string(&self, key: &str, v: &Value) -> Result<String> {
        v.as_str().map(str::to_string).ok_or_else(|| {
            AtlasError::Config(format!(
                "provider ({}) key {key:?} must be a string, got {v}",
                self.name
            ))
        })
    }
}

fn default_dpi() -> u32 {
    96
}

fn default_scale() -> u32 {
    50_000
}

fn default_spacing() -> u32 {
    GridSpacing::GRID_1K.size()
}

fn default_ellipsoid() -> String {
    Ellipsoid::WGS84.name.to_string()
}

fn default_width_mm() -> f64 {
    841.0
}

fn default_height_mm() -> f64 {
    1189.0
}

/// A printable sheet definition: which provider to draw cells from and how
/// to lay them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetConfig {
    pub name: String,
    pub provider: String,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Trellis spacing in meters.
    #[serde(default = "default_spacing")]
    pub spacing: u32,
    #[serde(default = "default_ellipsoid")]
    pub ellipsoid: String,
    #[serde(default = "default_width_mm")]
    pub width_mm: f64,
    #[serde(default = "default_height_mm")]
    pub height_mm: f64,
}

impl SheetConfig {
    pub fn new(name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            dpi: default_dpi(),
            scale: default_scale(),
            spacing: default_spacing(),
            ellipsoid: default_ellipsoid(),
            width_mm: default_width_mm(),
            height_mm: default_height_mm(),
        }
    }

    pub fn ellipsoid(&self) -> Result<Ellipsoid> {
        Ellipsoid::by_name(&self.ellipsoid).ok_or_else(|| {
            AtlasError::Config(format!(
                "sheet ({}) has unknown ellipsoid {:?}",
                self.name, self.ellipsoid
            ))
        })
    }

    pub fn grid_spacing(&self) -> Result<GridSpacing> {
        if self.spacing == 0 {
            return Err(AtlasError::Config(format!(
                "sheet ({}) spacing must be positive",
                self.name
            )));
        }
        Ok(GridSpacing(self.spacing))
    }

    /// Page width and height in pixels at the sheet's dpi.
    pub fn page_size_px(&self) -> (f64, f64) {
        let px_per_mm = self.dpi as f64 / 25.4;
        (self.width_mm * px_per_mm, self.height_mm * px_per_mm)
    }
}

/// Top level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    #[serde(default)]
    pub sheets: Vec<SheetConfig>,
}

impl AtlasConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: AtlasConfig =
            serde_json::from_str(s).map_err(|e| AtlasError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AtlasError::Config(format!("reading {}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }

    pub fn sheet(&self, name: &str) -> Option<&SheetConfig> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Checks that names are unique and every sheet references a configured provider.
    pub fn validate(&self) -> Result<()> {
        for (i, p) in self.providers.iter().enumerate() {
            if self.providers[..i].iter().any(|q| q.name == p.name) {
                return Err(AtlasError::Config(format!(
                    "duplicate provider name ({})",
                    p.name
                )));
            }
        }
        for (i, s) in self.sheets.iter().enumerate() {
            if self.sheets[..i].iter().any(|t| t.name == s.name) {
                return Err(AtlasError::Config(format!("duplicate sheet name ({})", s.name)));
            }
            if !self.providers.iter().any(|p| p.name == s.provider) {
                return Err(AtlasError::ProviderMissing(s.provider.clone()));
            }
        }
        Ok(())
    }
}
