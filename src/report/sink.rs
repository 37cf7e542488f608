//! Event sinks
//!
//! - `Reporter`: timestamped text or NDJSON (see `reporter`)
//! - `RecordingSink`: keeps events in memory

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use super::event::WatchEvent;

/// Trait for receiving watch events
///
/// Called from watch backend threads and the debounce dispatcher, so
/// implementations must be thread-safe and must not fail the caller.
pub trait WatchEventSink: Send + Sync {
    fn on_event(&self, event: &WatchEvent);
}

/// Sink that stores every event it sees
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<WatchEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<WatchEvent>> {
        self.events.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn events(&self) -> Vec<WatchEvent> {
        self.lock().clone()
    }

    pub fn count(&self, predicate: impl Fn(&WatchEvent) -> bool) -> usize {
        self.lock().iter().filter(|e| predicate(e)).count()
    }
}

impl WatchEventSink for RecordingSink {
    fn on_event(&self, event: &WatchEvent) {
        self.lock().push(event.clone());
    }
}

/// Cloneable in-memory writer, for capturing reporter output
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(|p| p.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
