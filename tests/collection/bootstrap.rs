//! Bootstrap Tests
//!
//! Opening a directory creates the four regions and `.meta` exactly once.

use crate::common::*;

#[test]
fn bootstrap_creates_regions_and_meta() {
    let tc = TestCollection::new();

    assert!(tc.path.join(".meta").is_file());
    assert!(tc.path.join("index").is_dir());
    assert!(tc.path.join("document").is_dir());
    assert!(tc.path.join("document").join("meta").is_dir());
    assert!(tc.store.metadata_exists());
}

#[test]
fn bootstrap_twice_is_idempotent() {
    let tc = TestCollection::new();
    let before = snapshot_tree(&tc.path);
    let meta_before = tc.store.get_metadata().unwrap();

    let again = tc.reopen();

    assert_eq!(snapshot_tree(&tc.path), before);
    assert_eq!(again.get_metadata().unwrap(), meta_before);
}

#[test]
fn bootstrap_fills_in_missing_directories() {
    let tc = TestCollection::new();
    let registry = tc.store.registry().unwrap();
    std::fs::remove_dir_all(tc.path.join("index")).unwrap();

    let again = tc.reopen();

    assert!(tc.path.join("index").is_dir());
    assert_eq!(again.registry().unwrap(), registry);
}

#[test]
fn bootstrap_recreates_meta_when_missing() {
    let tc = TestCollection::new();
    let old_registry = tc.store.registry().unwrap();
    std::fs::remove_file(tc.path.join(".meta")).unwrap();
    assert!(!tc.store.metadata_exists());

    let again = tc.reopen();

    assert!(again.metadata_exists());
    assert_ne!(again.registry().unwrap(), old_registry);
}

#[test]
fn bootstrap_creates_nested_parents() {
    init_tracing();
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("a").join("b").join("shelf");

    let store: CollectionStore =
        CollectionStore::open_with_options(&path, StoreOptions::for_testing()).unwrap();

    assert_eq!(store.name().unwrap(), "shelf");
    assert_eq!(store.path(), path.as_path());
}

#[test]
fn distinct_collections_get_distinct_registries() {
    let a = TestCollection::new();
    let b = TestCollection::new();
    assert_ne!(a.store.registry().unwrap(), b.store.registry().unwrap());
}
