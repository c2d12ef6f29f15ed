//! Storage engine for FlatDB
//!
//! The engine puts the collection semantics on top of the durability layer:
//! bootstrap, metadata caching, document revisions with write-then-publish,
//! and opaque index blobs. See [`CollectionStore`].

#![warn(missing_docs)]
#![warn(clippy::all)]

mod cache;
pub mod collection;
pub mod config;

pub use collection::CollectionStore;
pub use config::{CachePolicy, StoreOptions};
