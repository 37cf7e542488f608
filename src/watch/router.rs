//! Per-root event routing
//!
//! Runs inside the watch backend's callback: classify, filter, then either
//! report the change or report it and ask for a rebuild.

use std::sync::Arc;

use crate::domain::FileChangeEvent;
use crate::filter;
use crate::report::{WatchEvent, WatchEventSink};

use super::root::WatchRoot;

/// Requests a debounced rebuild. Must return quickly.
pub type RebuildTrigger = Arc<dyn Fn() + Send + Sync>;

/// What the router did with one change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Rejected by the filter
    Ignored,
    /// Accepted on a log-only root
    Logged,
    /// Accepted, rebuild requested
    Scheduled,
}

pub struct EventRouter {
    root: WatchRoot,
    sink: Arc<dyn WatchEventSink>,
    rebuild: Option<RebuildTrigger>,
}

impl EventRouter {
    /// `rebuild` is only used when the root's policy triggers builds
    pub fn new(root: WatchRoot, sink: Arc<dyn WatchEventSink>, rebuild: RebuildTrigger) -> Self {
        let rebuild = root.on_accept().triggers_build().then_some(rebuild);
        Self {
            root,
            sink,
            rebuild,
        }
    }

    pub fn root(&self) -> &WatchRoot {
        &self.root
    }

    pub fn route(&self, event: &FileChangeEvent) -> RouteDecision {
        if !filter::accept(event, self.root.extensions()) {
            return RouteDecision::Ignored;
        }

        self.sink.on_event(&WatchEvent::FileChanged {
            root: self.root.label().to_string(),
            path: self.root.display_path(event.path()),
            kind: event.kind(),
            on_accept: self.root.on_accept(),
        });

        match &self.rebuild {
            Some(rebuild) => {
                rebuild();
                RouteDecision::Scheduled
            }
            None => RouteDecision::Logged,
        }
    }

    /// Entry point for raw backend notifications
    pub fn handle_notify(&self, result: notify::Result<notify::Event>) -> Vec<RouteDecision> {
        match result {
            Ok(event) => FileChangeEvent::from_notify(&event)
                .iter()
                .map(|change| self.route(change))
                .collect(),
            Err(e) => {
                self.sink.on_event(&WatchEvent::WatcherError {
                    root: self.root.label().to_string(),
                    message: e.to_string(),
                });
                Vec::new()
            }
        }
    }
}
