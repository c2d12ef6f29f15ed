//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

pub use flatdb::{
    CachePolicy, CollectionStore, Document, Error, MetaData, Revision, StoreOptions,
    MAX_KEY_LEN, REVISION_MAX, REVISION_MIN,
};
pub use serde_json::{json, Value};

static INIT_TRACING: Once = Once::new();

/// Install a fmt subscriber that writes through the test harness.
///
/// Output only shows for failing tests.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// TestCollection - store over a scratch directory
// ============================================================================

/// A collection store rooted in a temporary directory.
pub struct TestCollection {
    pub store: CollectionStore,
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TestCollection {
    /// Fresh collection named `books` with test options.
    pub fn new() -> Self {
        Self::with_options(StoreOptions::for_testing())
    }

    /// Fresh collection named `books` with the given options.
    pub fn with_options(options: StoreOptions) -> Self {
        init_tracing();
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("books");
        let store = CollectionStore::open_with_options(&path, options).expect("open collection");
        TestCollection { store, dir, path }
    }

    /// Open a second store instance over the same directory.
    pub fn reopen(&self) -> CollectionStore {
        CollectionStore::open_with_options(&self.path, StoreOptions::for_testing())
            .expect("reopen collection")
    }

    /// Write a document and publish it as current.
    pub fn put(&self, id: Option<&str>, body: Value) -> Document {
        let doc = self.store.write_document(id, body).expect("write document");
        self.store
            .publish_revision(doc.id().expect("stamped id"), doc.revision().expect("stamped rev"))
            .expect("publish revision");
        doc
    }
}

/// Sorted relative paths of every file under `root`.
pub fn snapshot_tree(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<(PathBuf, Vec<u8>)>) {
    for entry in std::fs::read_dir(dir).expect("read_dir") {
        let entry = entry.expect("dir entry");
        let path = entry.path();
        if path.is_dir() {
            out.push((path.strip_prefix(root).unwrap().to_path_buf(), Vec::new()));
            walk(root, &path, out);
        } else {
            let bytes = std::fs::read(&path).expect("read file");
            out.push((path.strip_prefix(root).unwrap().to_path_buf(), bytes));
        }
    }
}

/// True if `ts` matches `YYYY-MM-DD HH:MM:SS.ffffff`.
pub fn is_store_timestamp(ts: &str) -> bool {
    ts.len() == 26 && chrono::NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S%.6f").is_ok()
}
