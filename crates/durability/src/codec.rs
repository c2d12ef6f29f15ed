//! Serialization lanes
//!
//! Two lanes turn structured values into file bytes:
//!
//! - [`MetaCodec`]: MessagePack with named fields, used only for the
//!   collection metadata file. Handles arbitrarily nested configuration values.
//! - [`JsonCodec`]: JSON, used for document revisions.
//!
//! Index blobs and document-meta entries bypass both lanes and are stored as
//! raw bytes.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A serialization lane
pub trait Codec {
    /// Lane identifier, used in log fields
    const NAME: &'static str;

    /// Encode a value into file bytes
    fn encode<T: Serialize + ?Sized>(value: &T) -> flatdb_core::Result<Vec<u8>>;

    /// Decode file bytes
    ///
    /// The error string is wrapped into a corruption error by the caller,
    /// which knows the file path.
    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String>;
}

/// MessagePack lane for collection metadata
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaCodec;

impl Codec for MetaCodec {
    const NAME: &'static str = "msgpack";

    fn encode<T: Serialize + ?Sized>(value: &T) -> flatdb_core::Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String> {
        rmp_serde::from_slice(bytes).map_err(|e| e.to_string())
    }
}

/// JSON lane for documents
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    const NAME: &'static str = "json";

    fn encode<T: Serialize + ?Sized>(value: &T) -> flatdb_core::Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String> {
        serde_json::from_slice(bytes).map_err(|e| e.to_string())
    }
}
