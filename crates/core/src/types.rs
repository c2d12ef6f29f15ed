//! Core types for FlatDB
//!
//! This module defines the foundational types:
//! - Revision: Random identifier of one immutable document snapshot
//! - Document: JSON object carrying the reserved store fields
//! - MetaData: Collection metadata persisted in `.meta`
//! - ConfigValue: Bound for the opaque collection configuration

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Reserved document field holding the document id
pub const FIELD_ID: &str = "__id";
/// Reserved document field holding the revision number
pub const FIELD_REVISION: &str = "__revision";
/// Reserved document field holding the creation timestamp
pub const FIELD_TIMESTAMP: &str = "__timestamp";

/// Smallest revision number handed out by the generator
pub const REVISION_MIN: u32 = 1_000_001;
/// Largest revision number handed out by the generator
pub const REVISION_MAX: u32 = 9_999_999;

/// Longest accepted document or index id, in bytes
///
/// File names are capped at 255 bytes and a revision file appends
/// `.NNNNNNN` to the document id.
pub const MAX_KEY_LEN: usize = 255 - 8;

// ============================================================================
// Revision
// ============================================================================

/// Identifier of one immutable document snapshot
///
/// Revisions are random, not sequential. Two revisions of the same document
/// carry no ordering in their numbers; which one is current is decided solely
/// by the document-meta entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(u32);

impl Revision {
    /// Wrap a raw revision number
    pub const fn new(value: u32) -> Self {
        Revision(value)
    }

    /// Raw revision number
    pub const fn get(self) -> u32 {
        self.0
    }

    /// True if the number lies in the generator's range
    pub fn is_generated_range(self) -> bool {
        (REVISION_MIN..=REVISION_MAX).contains(&self.0)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Revision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::invalid_input(format!("invalid revision '{}'", s)));
        }
        s.parse::<u32>()
            .map(Revision)
            .map_err(|e| Error::invalid_input(format!("invalid revision '{}': {}", s, e)))
    }
}

impl From<u32> for Revision {
    fn from(value: u32) -> Self {
        Revision(value)
    }
}

// ============================================================================
// Document
// ============================================================================

/// A stored document: a JSON object
///
/// The store stamps three reserved fields on every write ([`FIELD_ID`],
/// [`FIELD_REVISION`], [`FIELD_TIMESTAMP`]); all other fields pass through
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Document(Map::new())
    }

    /// Convert a JSON value into a document
    ///
    /// # Errors
    /// Returns `InvalidInput` if the value is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Document(map)),
            other => Err(Error::invalid_input(format!(
                "document must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Document id recorded by the store, if stamped
    pub fn id(&self) -> Option<&str> {
        self.0.get(FIELD_ID).and_then(Value::as_str)
    }

    /// Revision recorded by the store, if stamped
    pub fn revision(&self) -> Option<Revision> {
        self.0
            .get(FIELD_REVISION)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .map(Revision)
    }

    /// Creation timestamp recorded by the store, if stamped
    pub fn timestamp(&self) -> Option<&str> {
        self.0.get(FIELD_TIMESTAMP).and_then(Value::as_str)
    }

    /// Overwrite the three reserved fields
    pub fn stamp(&mut self, id: &str, revision: Revision, timestamp: &str) {
        self.0.insert(FIELD_ID.to_string(), Value::from(id));
        self.0
            .insert(FIELD_REVISION.to_string(), Value::from(revision.get()));
        self.0
            .insert(FIELD_TIMESTAMP.to_string(), Value::from(timestamp));
    }

    /// Get a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Copy of the document without the reserved fields
    pub fn user_fields(&self) -> Map<String, Value> {
        self.0
            .iter()
            .filter(|(k, _)| !is_reserved_field(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Consume into a JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// True for the fields the store owns
pub fn is_reserved_field(field: &str) -> bool {
    field == FIELD_ID || field == FIELD_REVISION || field == FIELD_TIMESTAMP
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Collection metadata
// ============================================================================

/// Bound for the opaque collection configuration
///
/// The store never inspects the configuration; it only needs to persist it,
/// read it back and build a default one at bootstrap.
pub trait ConfigValue: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static {}

impl<T> ConfigValue for T where
    T: Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
}

/// Collection metadata stored in `<dir>/.meta`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaData<C> {
    /// Collection name (base name of the collection directory)
    pub name: String,
    /// Opaque collection configuration
    pub config: C,
    /// Fixed random identifier assigned at bootstrap
    pub registry: String,
}

impl<C: ConfigValue> MetaData<C> {
    /// Metadata for a freshly bootstrapped collection
    ///
    /// Uses a default configuration and a newly generated registry.
    pub fn fresh(name: impl Into<String>) -> Self {
        MetaData {
            name: name.into(),
            config: C::default(),
            registry: crate::ids::new_registry(),
        }
    }
}

// ============================================================================
// Key validation
// ============================================================================

/// Check that `key` is usable as a single file name inside a region
///
/// `kind` names the key in the error message ("document id", "index id").
pub fn validate_key(kind: &str, key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::invalid_input(format!("{} must not be empty", kind)));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(Error::invalid_input(format!(
            "{} is {} bytes long, the limit is {}",
            kind,
            key.len(),
            MAX_KEY_LEN
        )));
    }
    if key.starts_with('.') {
        return Err(Error::invalid_input(format!(
            "{} '{}' must not start with '.'",
            kind, key
        )));
    }
    if key.contains(['/', '\\', '\0']) {
        return Err(Error::invalid_input(format!(
            "{} '{}' contains a path separator or NUL",
            kind,
            key.escape_default()
        )));
    }
    Ok(())
}
