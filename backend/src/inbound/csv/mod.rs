//! CSV adapter for bulk session import and export.
//!
//! Import turns an uploaded file into [`ImportRow`](crate::domain::ports::ImportRow)
//! values for the session command port; export renders session views into
//! the download format. Both share the column names below.

mod export;
mod import;

pub use export::{EXPORT_FILENAME, write_sessions};
pub use import::read_import_rows;

pub(crate) const START: &str = "start";
pub(crate) const END: &str = "end";
pub(crate) const QUALITY: &str = "quality";
pub(crate) const LATENCY_MINUTES: &str = "latency_minutes";
pub(crate) const AWAKENINGS: &str = "awakenings";
pub(crate) const TAGS: &str = "tags";
pub(crate) const NOTES: &str = "notes";
pub(crate) const DURATION_HOURS: &str = "duration_hours";
