//! Change filter
//!
//! Decides whether a raw filesystem notification is an edit a watch root
//! cares about. Pure: looks only at the path and the event kind.

use std::collections::BTreeSet;
use std::ffi::OsStr;

use crate::domain::{ChangeKind, FileChangeEvent};

/// Set of file extensions, stored without the leading dot.
///
/// `"ts"` and `".ts"` name the same entry. Matching is exact and
/// case-sensitive on the final extension component of a path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet(BTreeSet<String>);

impl ExtensionSet {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            extensions
                .into_iter()
                .filter_map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
        )
    }

    pub fn contains(&self, extension: &OsStr) -> bool {
        extension
            .to_str()
            .map(|ext| self.0.contains(ext))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Strip leading dots and surrounding whitespace; empty results are dropped.
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw
        .trim_start_matches(|c: char| c == '.' || c.is_whitespace())
        .trim_end();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// True iff `event` names a file whose extension is in `extensions`.
///
/// Directory events, access-only notifications and paths without a file
/// name or extension are rejected.
pub fn accept(event: &FileChangeEvent, extensions: &ExtensionSet) -> bool {
    if event.is_dir() || event.kind() == ChangeKind::Accessed {
        return false;
    }

    let path = event.path();
    if path.file_name().is_none() {
        return false;
    }

    path.extension()
        .map(|ext| extensions.contains(ext))
        .unwrap_or(false)
}
