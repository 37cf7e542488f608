//! Watch manager
//!
//! Opens one recursive notify watch per root. A root that cannot be watched
//! is reported and skipped; the others are still opened.

use std::sync::Arc;

use notify::{RecursiveMode, Watcher};

use crate::error::{BuildwatchError, BuildwatchResult};
use crate::report::{WatchEvent, WatchEventSink};

use super::root::WatchRoot;
use super::router::{EventRouter, RebuildTrigger};
use super::subscription::WatchSubscription;

pub struct WatchManager {
    sink: Arc<dyn WatchEventSink>,
}

impl WatchManager {
    pub fn new(sink: Arc<dyn WatchEventSink>) -> Self {
        Self { sink }
    }

    /// Open a subscription for each root, in order.
    ///
    /// Never fails as a whole: the result holds only the roots that opened.
    pub fn start(&self, roots: &[WatchRoot], rebuild: RebuildTrigger) -> Vec<WatchSubscription> {
        roots
            .iter()
            .filter_map(|root| match self.open(root, Arc::clone(&rebuild)) {
                Ok(subscription) => Some(subscription),
                Err(e) => {
                    self.sink.on_event(&WatchEvent::WatchFailed {
                        root: root.label().to_string(),
                        message: watch_error_message(e),
                    });
                    None
                }
            })
            .collect()
    }

    fn open(&self, root: &WatchRoot, rebuild: RebuildTrigger) -> BuildwatchResult<WatchSubscription> {
        let watch_error = |message: String| BuildwatchError::Watch {
            root: root.path().to_path_buf(),
            message,
        };

        if !root.path().is_dir() {
            return Err(watch_error("not a directory".to_string()));
        }

        let router = EventRouter::new(root.clone(), Arc::clone(&self.sink), rebuild);
        let mut watcher = notify::recommended_watcher(move |res| {
            router.handle_notify(res);
        })
        .map_err(|e| watch_error(e.to_string()))?;

        let mode = if root.recursive() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(root.path(), mode)
            .map_err(|e| watch_error(e.to_string()))?;

        Ok(WatchSubscription::new(
            root.path(),
            root.label(),
            root.recursive(),
            Box::new(watcher),
        ))
    }
}

fn watch_error_message(err: BuildwatchError) -> String {
    match err {
        BuildwatchError::Watch { message, .. } => message,
        other => other.to_string(),
    }
}
