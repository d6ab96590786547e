use serde::{Deserialize, Serialize};

/// Trellis line spacing in meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridSpacing(pub u32);

impl GridSpacing {
    pub const GRID_100: GridSpacing = GridSpacing(100);
    pub const GRID_1K: GridSpacing = GridSpacing(1000);

    /// Spacing in meters.
    pub fn size(&self) -> u32 {
        self.0
    }

    /// Splits a UTM coordinate into the parts printed on a bar label.
    ///
    /// `suffix` is the remainder below the spacing, `label` the two digits
    /// above it and `prefix` everything higher. Negative values floor, so
    /// `suffix` is always in `0..spacing`.
    ///
    /// ```
    /// use atlas_sheets::GridSpacing;
    ///
    /// assert_eq!(GridSpacing::GRID_1K.parts_for(4_427_757), (44, 27, 757));
    /// assert_eq!(GridSpacing::GRID_100.parts_for(585_361), (58, 53, 61));
    /// ```
    pub fn parts_for(&self, meters: i64) -> (i64, i64, i64) {
        let mask = self.0.max(1) as i64;
        let suffix = meters.rem_euclid(mask);
        let val = meters.div_euclid(mask);
        (val.div_euclid(100), val.rem_euclid(100), suffix)
    }

    /// Number of digits the suffix is printed with.
    pub fn width(&self) -> usize {
        match self.0 {
            1 => 0,
            10 => 1,
            100 => 2,
            1000 => 3,
            10000 => 4,
            n => (n.max(1) as f64).log10() as usize,
        }
    }
}

/// A coordinate value printed next to a bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPart {
    pub coordinate: i64,
    pub spacing: GridSpacing,
    pub unit: String,
    pub hemi: String,
}

impl LabelPart {
    pub fn new(coordinate: i64, spacing: GridSpacing) -> Self {
        Self {
            coordinate,
            spacing,
            unit: "m".to_string(),
            hemi: String::new(),
        }
    }

    pub fn with_hemi(mut self, hemi: impl Into<String>) -> Self {
        self.hemi = hemi.into();
        self
    }

    pub fn parts(&self) -> (i64, i64, i64) {
        self.spacing.parts_for(self.coordinate)
    }

    /// Labels divisible by ten also show their prefix.
    pub fn is_major(&self) -> bool {
        self.parts().1 % 10 == 0
    }

    pub fn prefix_string(&self) -> String {
        self.parts().0.to_string()
    }

    pub fn label_string(&self) -> String {
        format!("{:02}", self.parts().1)
    }

    pub fn suffix_string(&self) -> String {
        format!("{:0width$}", self.parts().2, width = self.spacing.width())
    }
}
