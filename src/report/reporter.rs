//! Reporter
//!
//! Writes one timestamped line per event to a console-like sink. Write
//! errors are swallowed: reporting never fails the pipeline.

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::Local;

use super::event::{Level, WatchEvent};
use super::render::{render_watch_event, TextStyle};
use super::sink::WatchEventSink;

/// Output format for status lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text(TextStyle),
    /// One JSON object per line
    Json { verbose: bool },
}

type Stream = Mutex<Box<dyn Write + Send>>;

pub struct Reporter {
    format: ReportFormat,
    out: Stream,
    /// Error-level text lines go here
    err: Stream,
}

impl Reporter {
    /// Report to stdout, errors to stderr
    pub fn stdio(format: ReportFormat) -> Self {
        Self::with_writers(format, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn with_writers(
        format: ReportFormat,
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            format,
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }

    /// Write a free-form status line
    pub fn report(&self, message: &str, level: Level) {
        self.emit(&WatchEvent::Message {
            level,
            message: message.to_string(),
        });
    }

    pub fn emit(&self, event: &WatchEvent) {
        let now = Local::now();
        match self.format {
            ReportFormat::Text(style) => {
                let line = render_watch_event(&now.format("%H:%M:%S").to_string(), event, style);
                let stream = if event.level() == Level::Error {
                    &self.err
                } else {
                    &self.out
                };
                write_swallowing(stream, line.as_bytes());
            }
            ReportFormat::Json { verbose } => {
                let event = if verbose { event.clone() } else { strip_output(event) };
                let mut line = event.to_json(&now.to_rfc3339());
                line.push('\n');
                write_swallowing(&self.out, line.as_bytes());
            }
        }
    }
}

impl WatchEventSink for Reporter {
    fn on_event(&self, event: &WatchEvent) {
        self.emit(event);
    }
}

fn strip_output(event: &WatchEvent) -> WatchEvent {
    match event {
        WatchEvent::BuildSucceeded { duration_ms, .. } => WatchEvent::BuildSucceeded {
            duration_ms: *duration_ms,
            output: String::new(),
        },
        other => other.clone(),
    }
}

fn write_swallowing(stream: &Stream, bytes: &[u8]) {
    let Ok(mut writer) = stream.lock() else {
        return;
    };
    let _ = writer.write_all(bytes);
    let _ = writer.flush();
}
