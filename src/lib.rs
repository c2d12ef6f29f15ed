//! FlatDB - Flat-file document store
//!
//! A collection is a plain directory holding immutable JSON document
//! revisions, per-document pointers to the current revision, opaque index
//! blobs and a small metadata file.
//!
//! # Quick Start
//!
//! ```ignore
//! use flatdb::CollectionStore;
//! use serde_json::json;
//!
//! let store: CollectionStore = CollectionStore::open("/var/lib/app/books")?;
//!
//! // Write a revision, then publish it as current
//! let doc = store.write_document(None, json!({"title": "Dune"}))?;
//! let id = doc.id().unwrap();
//! store.publish_revision(id, doc.revision().unwrap())?;
//!
//! let current = store.get_document(id, None)?;
//! ```
//!
//! # Architecture
//!
//! - `flatdb-core`: errors, identifiers, documents and metadata types
//! - `flatdb-durability`: directory layout, codecs, retrying atomic file I/O
//! - `flatdb-engine`: the [`CollectionStore`] and its [`StoreOptions`]

pub use flatdb_core::{
    is_reserved_field, new_registry, new_revision, new_timestamp, new_unique_id, ConfigValue,
    Document, Error, MetaData, Result, Revision, FIELD_ID, FIELD_REVISION, FIELD_TIMESTAMP,
    MAX_KEY_LEN, REVISION_MAX, REVISION_MIN,
};
pub use flatdb_durability::{CollectionPaths, RetryConfig};
pub use flatdb_engine::{CachePolicy, CollectionStore, StoreOptions};
