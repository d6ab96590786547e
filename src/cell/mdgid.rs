use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Map/grid identifier: a base id plus an optional sub-sheet part.
///
/// A `part` of 0 means the sheet is not subdivided.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Mdgid {
    pub id: String,
    #[serde(default)]
    pub part: u32,
}

impl Mdgid {
    pub fn new(id: impl Into<String>, part: u32) -> Self {
        Self {
            id: id.into(),
            part,
        }
    }

    /// Parses `ID`, `ID-Part` or `ID:Part`.
    ///
    /// Never fails: when the suffix is not a number the whole (trimmed)
    /// string becomes the id.
    ///
    /// # Example
    /// ```
    /// use atlas_sheets::Mdgid;
    ///
    /// assert_eq!(Mdgid::parse("V795X16666:12"), Mdgid::new("V795X16666", 12));
    /// assert_eq!(Mdgid::parse("V795X16666-7"), Mdgid::new("V795X16666", 7));
    /// assert_eq!(Mdgid::parse("V795X16666:x"), Mdgid::new("V795X16666:x", 0));
    /// ```
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        let idx = trimmed.find('-').or_else(|| trimmed.find(':'));
        if let Some(idx) = idx {
            if let Ok(part) = trimmed[idx + 1..].parse::<u32>() {
                return Self::new(&trimmed[..idx], part);
            }
        }
        Self::new(trimmed, 0)
    }

    /// The same id with the part cleared.
    pub fn base(&self) -> Self {
        Self::new(self.id.clone(), 0)
    }

    pub fn is_subdivided(&self) -> bool {
        self.part > 0
    }
}

impl FromStr for Mdgid {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Mdgid::parse(s))
    }
}

/// `ID` or `ID:Part`.
impl fmt::Display for Mdgid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.part > 0 {
            write!(f, "{}:{}", self.id, self.part)
        } else {
            f.write_str(&self.id)
        }
    }
}
