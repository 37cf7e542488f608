//! Watch root definition

use std::path::{Path, PathBuf};

use crate::domain::OnAccept;
use crate::filter::ExtensionSet;

/// A directory to watch and the policy for changes under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRoot {
    path: PathBuf,
    /// Name shown in status lines (the path as configured)
    label: String,
    extensions: ExtensionSet,
    on_accept: OnAccept,
    recursive: bool,
}

impl WatchRoot {
    pub fn new(path: impl Into<PathBuf>, extensions: ExtensionSet, on_accept: OnAccept) -> Self {
        let path = path.into();
        Self {
            label: path.display().to_string(),
            path,
            extensions,
            on_accept,
            recursive: true,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    pub fn on_accept(&self) -> OnAccept {
        self.on_accept
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    /// `path` relative to this root when it lies inside it
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.path)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
