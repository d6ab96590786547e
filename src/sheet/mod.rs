//! Planning a printed sheet: cell lookup, zoom and ground resolution, and
//! the trellis, with progress reported to a [`StatusSink`].

mod job;
mod plan;
mod status;

pub use job::Job;
pub use plan::{Sheet, SheetPlan, WGS84_SRID};
pub use status::{LogSink, MemorySink, Status, StatusSink};
