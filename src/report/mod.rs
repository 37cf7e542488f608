//! Status reporting
//!
//! Pipeline stages describe what happened as [`WatchEvent`]s and hand them
//! to a [`WatchEventSink`]. The [`Reporter`] sink turns them into
//! timestamped console lines or NDJSON.

mod event;
mod render;
mod reporter;
mod sink;
pub mod terminal;
pub mod theme;

pub use event::{BuildTrigger, Level, WatchEvent};
pub use render::{render_watch_event, TextStyle, OUTPUT_TAIL_LINES};
pub use reporter::{ReportFormat, Reporter};
pub use sink::{RecordingSink, SharedBuffer, WatchEventSink};
