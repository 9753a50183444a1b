//! Property tests for change classification.

use std::path::PathBuf;

use proptest::prelude::*;

use devloop::supervisor::{ChangeEvent, ChangeKind, Classification, Classifier};

fn path_segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9._-]{1,16}").unwrap()
}

fn relative_suffix() -> impl Strategy<Value = PathBuf> {
    proptest::collection::vec(path_segment(), 1..=4)
        .prop_map(|segments| segments.iter().collect::<PathBuf>())
}

fn tracked_kind() -> impl Strategy<Value = ChangeKind> {
    prop_oneof![
        Just(ChangeKind::Created),
        Just(ChangeKind::Modified),
        Just(ChangeKind::Deleted),
    ]
}

fn any_kind() -> impl Strategy<Value = ChangeKind> {
    prop_oneof![
        Just(ChangeKind::Created),
        Just(ChangeKind::Modified),
        Just(ChangeKind::Deleted),
        Just(ChangeKind::Other),
    ]
}

/// Nonexistent absolute roots: canonicalization is a no-op for these, so
/// the properties hold without touching the filesystem.
fn dependency_root() -> impl Strategy<Value = PathBuf> {
    path_segment().prop_map(|segment| PathBuf::from("/devloop-prop-deps").join(segment))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Classification is deterministic - the same event always
    /// yields the same answer, regardless of how often it is asked.
    #[test]
    fn property_classification_is_deterministic(
        root in dependency_root(),
        suffix in relative_suffix(),
        kind in any_kind()
    ) {
        let classifier = Classifier::new(std::slice::from_ref(&root));
        let event = ChangeEvent { path: root.join(&suffix), kind };

        let first = classifier.classify(&event);
        prop_assert_eq!(classifier.classify(&event), first);
        prop_assert_eq!(classifier.classify(&event), first);
    }

    /// PROPERTY: Other-kind events are ignored no matter where they point.
    #[test]
    fn property_other_kind_is_always_ignored(
        root in dependency_root(),
        suffix in relative_suffix()
    ) {
        let classifier = Classifier::new(std::slice::from_ref(&root));
        let event = ChangeEvent { path: root.join(&suffix), kind: ChangeKind::Other };

        prop_assert_eq!(classifier.classify(&event), Classification::Ignored);
    }

    /// PROPERTY: A tracked-kind event under a dependency root is always a
    /// dependency change.
    #[test]
    fn property_under_dependency_root_is_dependency(
        root in dependency_root(),
        suffix in relative_suffix(),
        kind in tracked_kind()
    ) {
        let classifier = Classifier::new(std::slice::from_ref(&root));
        let event = ChangeEvent { path: root.join(&suffix), kind };

        prop_assert_eq!(classifier.classify(&event), Classification::Dependency);
    }

    /// PROPERTY: A tracked-kind event outside every dependency root is
    /// internal - including under a sibling whose name merely extends a
    /// dependency root's name (prefix matching is per path component).
    #[test]
    fn property_sibling_with_extended_name_is_internal(
        root in dependency_root(),
        extension in path_segment(),
        suffix in relative_suffix(),
        kind in tracked_kind()
    ) {
        let classifier = Classifier::new(std::slice::from_ref(&root));

        let mut sibling_name = root.file_name().unwrap().to_os_string();
        sibling_name.push(&extension);
        let sibling = root.with_file_name(sibling_name);

        let event = ChangeEvent { path: sibling.join(&suffix), kind };
        prop_assert_eq!(classifier.classify(&event), Classification::Internal);
    }

    /// PROPERTY: Classification never panics on arbitrary path strings.
    #[test]
    fn property_classify_never_panics(
        path in "(?s).{0,256}",
        kind in any_kind()
    ) {
        let classifier = Classifier::new(&[PathBuf::from("/devloop-prop-deps/core")]);
        let _ = classifier.classify(&ChangeEvent { path: PathBuf::from(path), kind });
    }
}
