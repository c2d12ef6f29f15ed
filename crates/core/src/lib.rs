//! Core types for FlatDB
//!
//! This crate defines the foundational types shared by the storage layers:
//! - Error: Error type hierarchy and `Result` alias
//! - Revision: Random revision identifier for document snapshots
//! - Document: JSON object with the reserved `__id`/`__revision`/`__timestamp` fields
//! - MetaData: Collection-level metadata (name, opaque config, registry)
//! - Key validation for document and index identifiers
//! - Generators: unique IDs, revision numbers, timestamps, registry hashes

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::{new_registry, new_revision, new_timestamp, new_unique_id};
pub use types::{
    is_reserved_field, validate_key, ConfigValue, Document, MetaData, Revision, FIELD_ID,
    FIELD_REVISION, FIELD_TIMESTAMP, MAX_KEY_LEN, REVISION_MAX, REVISION_MIN,
};
