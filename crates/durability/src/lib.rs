//! Durability layer for FlatDB
//!
//! This crate handles everything that touches disk:
//!
//! - Collection directory layout (`.meta`, `index/`, `document/`, `document/meta/`)
//! - Serialization lanes: MessagePack for collection metadata, JSON for documents
//! - File I/O with atomic replacement and bounded, backed-off write retries

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod io;
pub mod paths;
pub mod retry;

pub use codec::{Codec, JsonCodec, MetaCodec};
pub use io::{FileIo, FileStamp};
pub use paths::CollectionPaths;
pub use retry::RetryConfig;
