use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;
use tracing::info;

/// Progress of a sheet job.
///
/// Serialized with a `status` tag, e.g.
/// `{"status":"processing","description":"computing trellis"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Status {
    Requested,
    Started,
    Processing { description: String },
    Failed { error: String },
    Completed,
}

impl Status {
    pub fn processing(description: impl Into<String>) -> Self {
        Status::Processing {
            description: description.into(),
        }
    }

    pub fn failed(error: impl fmt::Display) -> Self {
        Status::Failed {
            error: error.to_string(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Failed { .. } | Status::Completed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Requested => f.write_str("requested"),
            Status::Started => f.write_str("started"),
            Status::Processing { description } => write!(f, "processing: {description}"),
            Status::Failed { error } => write!(f, "failed: {error}"),
            Status::Completed => f.write_str("completed"),
        }
    }
}

/// Receives status events for a job.
pub trait StatusSink: Send + Sync {
    fn emit(&self, status: Status) -> Result<()>;
}

/// Writes each status to the log.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    pub job_id: String,
}

impl LogSink {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
        }
    }
}

impl StatusSink for LogSink {
    fn emit(&self, status: Status) -> Result<()> {
        info!(job_id = %self.job_id, %status, "job status");
        Ok(())
    }
}

/// Keeps every status it is given, in order.
#[derive(Debug, Default)]
pub struct MemorySink {
    statuses: Mutex<Vec<Status>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statuses(&self) -> Vec<Status> {
        match self.statuses.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl StatusSink for MemorySink {
    fn emit(&self, status: Status) -> Result<()> {
        match self.statuses.lock() {
            Ok(mut guard) => guard.push(status),
            Err(poisoned) => poisoned.into_inner().push(status),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AtlasError;

    #[test]
    fn test_status_json() -> Result<()> {
        let to_json = |s: &Status| {
            serde_json::to_string(s).map_err(|e| AtlasError::Config(e.to_string()))
        };
        assert_eq!(to_json(&Status::Started)?, r#"{"status":"started"}"#);
        assert_eq!(
            to_json(&Status::processing("computing trellis"))?,
            r#"{"status":"processing","description":"computing trellis"}"#
        );
        assert_eq!(
            to_json(&Status::failed(AtlasError::NotFound))?,
            r#"{"status":"failed","error":"grid not found"}"#
        );

        let back: Status = serde_json::from_str(r#"{"status":"completed"}"#)
            .map_err(|e| AtlasError::Config(e.to_string()))?;
        assert_eq!(back, Status::Completed);
        Ok(())
    }

    #[test]
    fn test_terminal_and_display() {
        assert!(Status::Completed.is_terminal());
        assert!(Status::failed("boom").is_terminal());
        assert!(!Status::Requested.is_terminal());
        assert_eq!(Status::processing("x").to_string(), "processing: x");
    }

    #[test]
    fn test_memory_sink_keeps_order() -> Result<()> {
        let sink = MemorySink::new();
        sink.emit(Status::Requested)?;
        sink.emit(Status::Started)?;
        assert_eq!(sink.statuses(), vec![Status::Requested, Status::Started]);
        Ok(())
    }
}
