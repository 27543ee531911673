//! Loading, editing and saving hierarchy files.

use prodtags_core::{Error, Tag};
use prodtags_hierarchy::TagHierarchy;

use crate::common::create_test_file;

fn tag(s: &str) -> Tag {
    s.parse().unwrap()
}

#[test]
fn test_load_requires_yaml_extension() {
    let (_dir, path) = create_test_file("tags.txt", "tags:\n- foo\n");
    let err = TagHierarchy::load(&path).unwrap_err();
    assert!(matches!(err, Error::InvalidTagFile { .. }));
}

#[test]
fn test_load_empty_path() {
    let err = TagHierarchy::load("").unwrap_err();
    assert!(matches!(err, Error::InvalidTagFile { .. }));
}

#[test]
fn test_load_yaml_and_yml() {
    let (_dir, path) = create_test_file("tags.yaml", "");
    assert!(TagHierarchy::load(&path).unwrap().tags().is_empty());

    let (_dir, path) = create_test_file("tags.yml", "tags:\n- foo\n");
    assert_eq!(TagHierarchy::load(&path).unwrap().tags(), vec![tag("foo")]);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = TagHierarchy::load(dir.path().join("nope.yaml")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_read_file_keeps_text() {
    let content = "tags:\n- foo\n- bar\n";
    let (_dir, path) = create_test_file("tags.yaml", content);

    let hierarchy = TagHierarchy::load(&path).unwrap();
    assert_eq!(hierarchy.contents(), content);
    assert_eq!(hierarchy.tags(), vec![tag("foo"), tag("bar")]);
}

#[test]
fn test_save_and_reload() {
    let (_dir, path) = create_test_file("tags.yaml", "tags:\n- foo\n- bar\n");

    let mut hierarchy = TagHierarchy::load(&path).unwrap();
    hierarchy.add_tag(&tag("baz")).unwrap();
    hierarchy.save().unwrap();

    hierarchy.reload().unwrap();
    assert_eq!(hierarchy.tags(), vec![tag("foo"), tag("bar"), tag("baz")]);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), hierarchy.contents());
}

#[test]
fn test_reload_discards_unsaved_edits() {
    let (_dir, path) = create_test_file("tags.yaml", "tags:\n- foo\n");

    let mut hierarchy = TagHierarchy::load(&path).unwrap();
    hierarchy.remove_tag(&tag("foo")).unwrap();
    assert!(hierarchy.tags().is_empty());

    hierarchy.reload().unwrap();
    assert_eq!(hierarchy.tags(), vec![tag("foo")]);
}

#[test]
fn test_lint_then_save_is_valid_yaml() {
    let (_dir, path) = create_test_file(
        "tags.yaml",
        "tags:\n- work:\n  - projects:\n    - prodtags\n  - meetings\n- home:\n  - garden\n- inbox\n",
    );

    let mut hierarchy = TagHierarchy::load(&path).unwrap();
    let before = hierarchy.tags();
    hierarchy.lint().unwrap();
    hierarchy.save().unwrap();

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("\n\n"));

    let reloaded = TagHierarchy::load(&path).unwrap();
    let mut after = reloaded.tags();
    let mut before_sorted = before.clone();
    after.sort();
    before_sorted.sort();
    assert_eq!(after, before_sorted);
    assert_eq!(reloaded.tags()[0], tag("inbox"));
}
