//! Collection store
//!
//! A `CollectionStore` owns one collection directory and exposes four groups
//! of operations over it:
//!
//! - **Bootstrap**: create the directory regions and the `.meta` file
//! - **Metadata**: read/write the collection metadata and its opaque config
//! - **Documents**: immutable JSON revisions plus a current-revision pointer
//! - **Indexes**: opaque byte blobs keyed by index id
//!
//! ## Write-then-publish
//!
//! [`CollectionStore::write_document`] stores a new immutable revision but
//! never makes it current. Publishing is a separate call that rewrites the
//! document-meta entry ([`CollectionStore::publish_revision`] or
//! [`CollectionStore::write_document_meta`]). Until then readers keep seeing
//! the previous current revision.
//!
//! ## Not found vs. errors
//!
//! Absent documents, meta entries and indexes come back as `None` or empty
//! values. Errors are reserved for invalid keys, undecodable files and writes
//! that fail after every retry.

use crate::cache::MetadataCache;
use crate::config::StoreOptions;
use flatdb_core::{
    new_revision, new_timestamp, new_unique_id, validate_key, ConfigValue, Document, MetaData,
    Result, Revision,
};
use flatdb_durability::paths::parse_document_file_name;
use flatdb_durability::{CollectionPaths, FileIo, FileStamp, JsonCodec, MetaCodec};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info, warn};

const DOCUMENT_ID: &str = "document id";
const INDEX_ID: &str = "index id";

/// Flat-file store for one collection
///
/// `C` is the opaque collection configuration type; it is persisted and
/// returned verbatim. The store is `Send + Sync` and can be shared through an
/// `Arc`, but it assumes a single writer per file: concurrent writers to the
/// same meta entry or to `.meta` race and the last one wins.
pub struct CollectionStore<C: ConfigValue = Value> {
    paths: CollectionPaths,
    io: FileIo,
    options: StoreOptions,
    meta_cache: MetadataCache<C>,
}

impl<C: ConfigValue> std::fmt::Debug for CollectionStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionStore")
            .field("root", &self.paths.root())
            .field("options", &self.options)
            .finish()
    }
}

impl<C: ConfigValue> CollectionStore<C> {
    // ========================================================================
    // Bootstrap
    // ========================================================================

    /// Open (bootstrapping if needed) the collection at `path` with default options
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, StoreOptions::default())
    }

    /// Open (bootstrapping if needed) the collection at `path`
    ///
    /// Missing region directories are created first; `.meta` is written last
    /// and only if absent, so its presence marks a fully bootstrapped
    /// collection. Opening an existing collection never rewrites `.meta`.
    ///
    /// # Errors
    /// `InvalidInput` if the path has no usable base name, I/O errors from
    /// directory creation, `WriteFailed` if `.meta` cannot be written.
    pub fn open_with_options(path: impl AsRef<Path>, options: StoreOptions) -> Result<Self> {
        let paths = CollectionPaths::from_root(path);
        let name = paths.name()?;
        let io = options.file_io();

        paths.create_directories()?;

        if paths.exists() {
            debug!(
                target: "flatdb::collection",
                path = %paths.root().display(),
                "Opened existing collection"
            );
        } else {
            let meta: MetaData<C> = MetaData::fresh(name);
            io.write_value::<MetaCodec, _>(&paths.meta_file(), &meta)?;
            info!(
                target: "flatdb::collection",
                path = %paths.root().display(),
                name = %meta.name,
                registry = %meta.registry,
                "Created collection"
            );
        }

        Ok(CollectionStore {
            meta_cache: MetadataCache::new(options.metadata_cache),
            paths,
            io,
            options,
        })
    }

    /// Root directory of the collection
    pub fn path(&self) -> &Path {
        self.paths.root()
    }

    /// Directory layout of the collection
    pub fn paths(&self) -> &CollectionPaths {
        &self.paths
    }

    /// Options this store was opened with
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    // ========================================================================
    // Collection metadata
    // ========================================================================

    /// True iff the `.meta` file is present
    pub fn metadata_exists(&self) -> bool {
        self.paths.exists()
    }

    /// Read the collection metadata
    ///
    /// Served from the instance cache when the cache policy allows it.
    ///
    /// # Errors
    /// `NotFound` if `.meta` is missing, `Corruption` if it does not decode.
    pub fn get_metadata(&self) -> Result<MetaData<C>> {
        let meta_file = self.paths.meta_file();
        let stamp = FileStamp::of(&meta_file);
        if let Some(meta) = self.meta_cache.get(stamp) {
            return Ok(meta);
        }

        let meta: MetaData<C> = self.io.read_value::<MetaCodec, _>(&meta_file)?;
        self.meta_cache.put(&meta, stamp);
        Ok(meta)
    }

    /// Replace the collection metadata
    ///
    /// The whole structure is written; there are no partial updates.
    pub fn write_metadata(&self, meta: &MetaData<C>) -> Result<()> {
        self.meta_cache.invalidate();
        self.io
            .write_value::<MetaCodec, _>(&self.paths.meta_file(), meta)?;
        debug!(
            target: "flatdb::collection",
            path = %self.paths.root().display(),
            "Wrote collection metadata"
        );
        Ok(())
    }

    /// Read the opaque collection configuration
    pub fn get_configuration(&self) -> Result<C> {
        Ok(self.get_metadata()?.config)
    }

    /// Replace the opaque collection configuration
    ///
    /// Reads the full metadata, swaps the config and writes it all back.
    pub fn set_configuration(&self, config: C) -> Result<()> {
        let mut meta = self.get_metadata()?;
        meta.config = config;
        self.write_metadata(&meta)
    }

    /// Collection name recorded in `.meta`
    pub fn name(&self) -> Result<String> {
        Ok(self.get_metadata()?.name)
    }

    /// Registry identifier recorded in `.meta`
    pub fn registry(&self) -> Result<String> {
        Ok(self.get_metadata()?.registry)
    }

    // ========================================================================
    // Document meta entries
    // ========================================================================

    /// True iff a document-meta entry exists for `id`
    ///
    /// An invalid id can never have been written and reports `false`.
    pub fn document_exists(&self, id: &str) -> bool {
        validate_key(DOCUMENT_ID, id).is_ok() && self.paths.document_meta_file(id).is_file()
    }

    /// Raw content of the document-meta entry, `None` if absent
    pub fn get_document_meta(&self, id: &str) -> Result<Option<Vec<u8>>> {
        validate_key(DOCUMENT_ID, id)?;
        self.io.read_optional(&self.paths.document_meta_file(id))
    }

    /// Create or overwrite the document-meta entry with arbitrary content
    pub fn write_document_meta(&self, id: &str, content: impl AsRef<[u8]>) -> Result<()> {
        validate_key(DOCUMENT_ID, id)?;
        self.io
            .write_raw(&self.paths.document_meta_file(id), content.as_ref())
    }

    /// Remove the document-meta entry
    ///
    /// Revision files are left in place. Returns whether an entry existed;
    /// removing an absent entry is not an error.
    pub fn delete_document_meta(&self, id: &str) -> Result<bool> {
        validate_key(DOCUMENT_ID, id)?;
        let existed = self
            .io
            .remove_if_exists(&self.paths.document_meta_file(id))?;
        debug!(target: "flatdb::collection", id, existed, "Deleted document meta");
        Ok(existed)
    }

    /// Make `revision` the current revision of `id`
    pub fn publish_revision(&self, id: &str, revision: Revision) -> Result<()> {
        self.write_document_meta(id, revision.to_string())
    }

    /// Current revision of `id` according to its meta entry
    ///
    /// `None` if there is no entry or its content is not a revision number.
    pub fn current_revision(&self, id: &str) -> Result<Option<Revision>> {
        let Some(raw) = self.get_document_meta(id)? else {
            return Ok(None);
        };
        let parsed = std::str::from_utf8(&raw)
            .ok()
            .and_then(|text| text.trim().parse::<Revision>().ok());
        if parsed.is_none() {
            warn!(
                target: "flatdb::collection",
                id,
                "Document meta entry does not hold a revision number"
            );
        }
        Ok(parsed)
    }

    /// Ids of all documents that have a meta entry, sorted
    pub fn list_documents(&self) -> Result<Vec<String>> {
        self.io.list_files(&self.paths.document_meta_dir())
    }

    // ========================================================================
    // Documents
    // ========================================================================

    /// Fetch a document revision
    ///
    /// Returns `None` if the document has no meta entry. Without an explicit
    /// revision the current one is taken from the meta entry; with one, any
    /// revision ever written can be read whether or not it is current.
    /// Returns `None` if the revision file is absent.
    ///
    /// # Errors
    /// `InvalidInput` for an invalid id, `Corruption` if the revision file
    /// does not decode.
    pub fn get_document(&self, id: &str, revision: Option<Revision>) -> Result<Option<Document>> {
        validate_key(DOCUMENT_ID, id)?;
        if !self.document_exists(id) {
            return Ok(None);
        }

        let revision = match revision {
            Some(revision) => revision,
            None => match self.current_revision(id)? {
                Some(revision) => revision,
                None => return Ok(None),
            },
        };

        self.read_revision(id, revision)
    }

    /// Store a new immutable revision of a document
    ///
    /// Generates an id when `id` is `None`, always generates a fresh random
    /// revision and a creation timestamp, and overwrites the reserved
    /// `__id`/`__revision`/`__timestamp` fields. The document-meta entry is
    /// not touched; publish the revision separately to make it current.
    ///
    /// Returns the document exactly as stored.
    ///
    /// # Errors
    /// `InvalidInput` if `document` is not a JSON object or `id` is invalid.
    pub fn write_document(&self, id: Option<&str>, document: Value) -> Result<Document> {
        let mut document = Document::from_value(document)?;
        let id = match id {
            Some(id) => {
                validate_key(DOCUMENT_ID, id)?;
                id.to_string()
            }
            None => new_unique_id(),
        };
        let revision = new_revision();
        let timestamp = new_timestamp();

        document.stamp(&id, revision, &timestamp);
        self.io
            .write_value::<JsonCodec, _>(&self.paths.document_file(&id, revision), &document)?;

        debug!(
            target: "flatdb::collection",
            id = %id,
            revision = %revision,
            "Wrote document revision"
        );
        Ok(document)
    }

    /// True iff the file for this revision exists
    pub fn revision_exists(&self, id: &str, revision: Revision) -> bool {
        validate_key(DOCUMENT_ID, id).is_ok() && self.paths.document_file(id, revision).is_file()
    }

    /// Every revision stored for `id`, in numeric order
    ///
    /// Numeric order says nothing about creation order; see
    /// [`revision_history`](Self::revision_history).
    pub fn list_revisions(&self, id: &str) -> Result<Vec<Revision>> {
        validate_key(DOCUMENT_ID, id)?;
        let mut revisions: Vec<Revision> = self
            .io
            .list_files(&self.paths.document_dir())?
            .iter()
            .filter_map(|name| parse_document_file_name(id, name))
            .collect();
        revisions.sort();
        Ok(revisions)
    }

    /// Every stored revision of `id`, oldest first
    ///
    /// Ordered by the `__timestamp` field, ties broken by revision number.
    /// Works whether or not the document currently has a meta entry.
    pub fn revision_history(&self, id: &str) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for revision in self.list_revisions(id)? {
            if let Some(document) = self.read_revision(id, revision)? {
                documents.push(document);
            }
        }
        documents.sort_by(|a, b| {
            a.timestamp()
                .unwrap_or_default()
                .cmp(b.timestamp().unwrap_or_default())
                .then_with(|| a.revision().cmp(&b.revision()))
        });
        Ok(documents)
    }

    fn read_revision(&self, id: &str, revision: Revision) -> Result<Option<Document>> {
        match self
            .io
            .read_value::<JsonCodec, Document>(&self.paths.document_file(id, revision))
        {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    // ========================================================================
    // Indexes
    // ========================================================================

    /// True iff an index blob exists for `id`
    pub fn index_exists(&self, id: &str) -> bool {
        validate_key(INDEX_ID, id).is_ok() && self.paths.index_file(id).is_file()
    }

    /// Raw content of an index blob; empty if it was never written
    pub fn get_index(&self, id: &str) -> Result<Vec<u8>> {
        validate_key(INDEX_ID, id)?;
        Ok(self
            .io
            .read_optional(&self.paths.index_file(id))?
            .unwrap_or_default())
    }

    /// Create or overwrite an index blob
    pub fn write_index(&self, id: &str, content: impl AsRef<[u8]>) -> Result<()> {
        validate_key(INDEX_ID, id)?;
        self.io
            .write_raw(&self.paths.index_file(id), content.as_ref())
    }

    /// Remove an index blob; returns whether it existed
    pub fn delete_index(&self, id: &str) -> Result<bool> {
        validate_key(INDEX_ID, id)?;
        self.io.remove_if_exists(&self.paths.index_file(id))
    }

    /// Ids of all stored index blobs, sorted
    pub fn list_indexes(&self) -> Result<Vec<String>> {
        self.io.list_files(&self.paths.index_dir())
    }
}
