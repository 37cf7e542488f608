//! Filesystem change records

use std::path::{Path, PathBuf};

use notify::event::{CreateKind, ModifyKind, RemoveKind};
use notify::EventKind;
use serde::Serialize;

/// What happened to a path, collapsed from the backend's finer-grained kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
    Renamed,
    /// Read/open/close notifications. Never an edit.
    Accessed,
    Other,
}

/// One filesystem notification for one path.
///
/// Transient: built from a backend event, passed through the change filter,
/// then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChangeEvent {
    path: PathBuf,
    kind: ChangeKind,
    is_dir: bool,
}

impl FileChangeEvent {
    /// Change to a file (or to something the backend could not classify)
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
            is_dir: false,
        }
    }

    /// Change the backend reported as a directory entry
    pub fn directory(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
            is_dir: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Expand one backend event into one record per affected path.
    pub fn from_notify(event: &notify::Event) -> Vec<Self> {
        let (kind, is_dir) = classify(&event.kind);
        event
            .paths
            .iter()
            .map(|path| Self {
                path: path.clone(),
                kind,
                is_dir,
            })
            .collect()
    }
}

fn classify(kind: &EventKind) -> (ChangeKind, bool) {
    match kind {
        EventKind::Create(CreateKind::Folder) => (ChangeKind::Created, true),
        EventKind::Create(_) => (ChangeKind::Created, false),
        EventKind::Remove(RemoveKind::Folder) => (ChangeKind::Removed, true),
        EventKind::Remove(_) => (ChangeKind::Removed, false),
        EventKind::Modify(ModifyKind::Name(_)) => (ChangeKind::Renamed, false),
        EventKind::Modify(_) => (ChangeKind::Modified, false),
        EventKind::Access(_) => (ChangeKind::Accessed, false),
        EventKind::Any | EventKind::Other => (ChangeKind::Other, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, DataChange, RenameMode};

    #[test]
    fn folder_create_is_marked_as_directory() {
        let event = notify::Event::new(EventKind::Create(CreateKind::Folder))
            .add_path(PathBuf::from("src/components"));

        let changes = FileChangeEvent::from_notify(&event);

        assert_eq!(changes.len(), 1);
        assert!(changes[0].is_dir());
        assert_eq!(changes[0].kind(), ChangeKind::Created);
    }

    #[test]
    fn rename_yields_one_record_per_path() {
        let event = notify::Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(PathBuf::from("src/old.ts"))
            .add_path(PathBuf::from("src/new.ts"));

        let changes = FileChangeEvent::from_notify(&event);

        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| c.kind() == ChangeKind::Renamed));
        assert_eq!(changes[1].path(), Path::new("src/new.ts"));
    }

    #[test]
    fn data_write_and_access_are_distinguished() {
        let write = notify::Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(PathBuf::from("a.ts"));
        let read = notify::Event::new(EventKind::Access(AccessKind::Read))
            .add_path(PathBuf::from("a.ts"));

        assert_eq!(
            FileChangeEvent::from_notify(&write)[0].kind(),
            ChangeKind::Modified
        );
        assert_eq!(
            FileChangeEvent::from_notify(&read)[0].kind(),
            ChangeKind::Accessed
        );
    }
}
