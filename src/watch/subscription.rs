//! Watch subscriptions

use std::fmt;
use std::path::{Path, PathBuf};

use notify::{RecommendedWatcher, Watcher};

use crate::domain::WatchHandle;
use crate::error::{BuildwatchError, BuildwatchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Active,
    Closed,
}

/// One live watch over a directory root.
///
/// Closed at most once; closing again is a no-op.
pub struct WatchSubscription {
    root: PathBuf,
    label: String,
    recursive: bool,
    handle: Option<Box<dyn WatchHandle>>,
}

impl WatchSubscription {
    pub fn new(
        root: impl Into<PathBuf>,
        label: impl Into<String>,
        recursive: bool,
        handle: Box<dyn WatchHandle>,
    ) -> Self {
        Self {
            root: root.into(),
            label: label.into(),
            recursive,
            handle: Some(handle),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    pub fn state(&self) -> SubscriptionState {
        if self.handle.is_some() {
            SubscriptionState::Active
        } else {
            SubscriptionState::Closed
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == SubscriptionState::Active
    }

    /// Release the watch.
    ///
    /// `Ok(true)` if this call closed it, `Ok(false)` if it was already
    /// closed. A release error still leaves the subscription closed.
    pub fn close(&mut self) -> BuildwatchResult<bool> {
        let Some(mut handle) = self.handle.take() else {
            return Ok(false);
        };

        handle
            .release(&self.root)
            .map(|_| true)
            .map_err(|message| BuildwatchError::Release {
                root: self.root.clone(),
                message,
            })
    }
}

impl fmt::Debug for WatchSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchSubscription")
            .field("root", &self.root)
            .field("recursive", &self.recursive)
            .field("state", &self.state())
            .finish()
    }
}

impl WatchHandle for RecommendedWatcher {
    fn release(&mut self, root: &Path) -> Result<(), String> {
        self.unwatch(root).map_err(|e| e.to_string())
    }
}
