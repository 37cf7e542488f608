//! Property tests for the change filter and extension normalisation.

use std::path::PathBuf;

use proptest::prelude::*;

use buildwatch::filter::normalize_extension;
use buildwatch::{accept, ChangeKind, ExtensionSet, FileChangeEvent};

fn extension() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9]{1,6}").unwrap()
}

fn stem() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-]{1,16}").unwrap()
}

fn dirs() -> impl Strategy<Value = PathBuf> {
    let segment = proptest::string::string_regex("[A-Za-z0-9_-]{1,8}").unwrap();
    proptest::collection::vec(segment, 0..=4).prop_map(|segments| segments.iter().collect())
}

fn edit_kind() -> impl Strategy<Value = ChangeKind> {
    prop_oneof![
        Just(ChangeKind::Created),
        Just(ChangeKind::Modified),
        Just(ChangeKind::Removed),
        Just(ChangeKind::Renamed),
        Just(ChangeKind::Other),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The filter never panics, whatever the path.
    #[test]
    fn property_accept_never_panics(path in "(?s).{0,128}", ext in extension()) {
        let set = ExtensionSet::new([ext]);
        let _ = accept(&FileChangeEvent::new(path, ChangeKind::Modified), &set);
    }

    /// PROPERTY: A file is accepted iff its final extension is in the set.
    #[test]
    fn property_accept_iff_extension_in_set(
        dir in dirs(),
        stem in stem(),
        ext in extension(),
        watched in proptest::collection::btree_set(extension(), 1..4),
        kind in edit_kind(),
    ) {
        let set = ExtensionSet::new(&watched);
        let path = dir.join(format!("{stem}.{ext}"));
        let event = FileChangeEvent::new(path, kind);

        prop_assert_eq!(accept(&event, &set), watched.contains(&ext));
    }

    /// PROPERTY: Paths without an extension are always rejected.
    #[test]
    fn property_no_extension_rejected(
        dir in dirs(),
        stem in stem(),
        watched in proptest::collection::btree_set(extension(), 1..4),
    ) {
        let set = ExtensionSet::new(&watched);
        let event = FileChangeEvent::new(dir.join(stem), ChangeKind::Modified);
        prop_assert!(!accept(&event, &set));
    }

    /// PROPERTY: Directory events never pass, even with a watched suffix.
    #[test]
    fn property_directories_rejected(dir in dirs(), stem in stem(), ext in extension()) {
        let set = ExtensionSet::new([ext.clone()]);
        let event = FileChangeEvent::directory(dir.join(format!("{stem}.{ext}")), ChangeKind::Created);
        prop_assert!(!accept(&event, &set));
    }

    /// PROPERTY: Leading dots and surrounding whitespace do not matter.
    #[test]
    fn property_normalize_ignores_dots_and_whitespace(
        ext in extension(),
        dots in 0usize..3,
        pad in "[ \t]{0,2}",
    ) {
        let raw = format!("{pad}{}{ext}{pad}", ".".repeat(dots));
        prop_assert_eq!(normalize_extension(&raw), Some(ext.clone()));
        prop_assert_eq!(ExtensionSet::new([raw]), ExtensionSet::new([ext]));
    }

    /// PROPERTY: Normalisation is idempotent.
    #[test]
    fn property_normalize_idempotent(raw in "(?s).{0,24}") {
        if let Some(once) = normalize_extension(&raw) {
            prop_assert_eq!(normalize_extension(&once), Some(once.clone()));
        }
    }
}
