use crate::cell::Cell;
use crate::error::{AtlasError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A request to render one sheet, passed between queue and worker as a
/// base64 token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub sheet_name: String,
    #[serde(default)]
    pub cell: Option<Cell>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Job {
    pub fn new(sheet_name: impl Into<String>, cell: Option<Cell>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            cell,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Encodes the job as standard base64 over its JSON form.
    pub fn to_base64(&self) -> Result<String> {
        let data = serde_json::to_vec(self)
            .map_err(|e| AtlasError::JobDecode(format!("failed to marshal: {e}")))?;
        Ok(STANDARD.encode(data))
    }

    pub fn from_base64(token: &str) -> Result<Self> {
        let data = STANDARD
            .decode(token.trim())
            .map_err(|e| AtlasError::JobDecode(format!("failed to base64 decode: {e}")))?;
        serde_json::from_slice(&data)
            .map_err(|e| AtlasError::JobDecode(format!("failed to unmarshal: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{EditInfo, Mdgid};
    use chrono::{TimeZone, Utc};

    fn cell() -> Result<Cell> {
        let date = Utc
            .with_ymd_and_hms(2019, 3, 1, 12, 0, 0)
            .single()
            .ok_or_else(|| AtlasError::Config("bad date".into()))?;
        Cell::builder()
            .mdgid(Mdgid::new("V795X16666", 12))
            .sw(40.2, -121.975)
            .ne(40.225, -121.95)
            .country("US")
            .sheet("2242")
            .published_at(date)
            .edited(EditInfo::new("cartographer", date))
            .metadata("edition", "2")
            .build()
    }

    #[test]
    fn test_token_carries_cell() -> Result<()> {
        let job = Job::new("50k", Some(cell()?)).with_metadata("requested_by", "tests");
        let token = job.to_base64()?;
        assert!(!token.contains('{'));

        let back = Job::from_base64(&token)?;
        assert_eq!(back.sheet_name, "50k");
        assert_eq!(back.metadata.get("requested_by").map(String::as_str), Some("tests"));
        let back_cell = back.cell.ok_or(AtlasError::NotFound)?;
        assert_eq!(back_cell.mdgid().to_string(), "V795X16666:12");
        assert_eq!(back_cell.sheet_number(), "2242-12");
        assert!(back_cell.edited().is_some_and(|e| e.by == "cartographer"));
        Ok(())
    }

    #[test]
    fn test_bad_tokens() {
        assert!(matches!(
            Job::from_base64("not base64!"),
            Err(AtlasError::JobDecode(_))
        ));
        let not_json = STANDARD.encode(b"plain text");
        assert!(matches!(
            Job::from_base64(&not_json),
            Err(AtlasError::JobDecode(_))
        ));
    }

    #[test]
    fn test_missing_optional_fields() -> Result<()> {
        let token = STANDARD.encode(br#"{"sheet_name":"5k"}"#);
        let job = Job::from_base64(&token)?;
        assert_eq!(job, Job::new("5k", None));
        Ok(())
    }
}
