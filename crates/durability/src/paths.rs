//! Collection directory structure
//!
//! A collection is a plain directory containing all of its state.
//! The directory structure is:
//!
//! ```text
//! books/
//! ├── .meta              # Collection metadata (MessagePack)
//! ├── index/             # Opaque index blobs, one file per index id
//! │   └── by_title
//! └── document/          # Immutable document revisions
//!     ├── <id>.<revision>
//!     └── meta/          # Current-revision pointers, one file per document id
//!         └── <id>
//! ```

use flatdb_core::{Error, Result, Revision};
use std::path::{Path, PathBuf};

/// Metadata file name inside the collection directory
pub const META_FILE_NAME: &str = ".meta";
/// Index region directory name
pub const INDEX_DIR_NAME: &str = "index";
/// Document region directory name
pub const DOCUMENT_DIR_NAME: &str = "document";
/// Document-meta region directory name (inside the document region)
pub const DOCUMENT_META_DIR_NAME: &str = "meta";

/// Collection directory paths
///
/// Provides access to all paths within a collection directory. Keys are
/// joined verbatim; callers validate them first.
#[derive(Debug, Clone)]
pub struct CollectionPaths {
    /// Root collection directory
    root: PathBuf,
}

impl CollectionPaths {
    /// Create paths from root directory
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        CollectionPaths {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root collection directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Collection name: the base name of the root directory
    ///
    /// # Errors
    /// Returns `InvalidInput` if the root has no usable UTF-8 base name.
    pub fn name(&self) -> Result<String> {
        self.root
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "collection path '{}' has no usable directory name",
                    self.root.display()
                ))
            })
    }

    /// Get the metadata file path
    pub fn meta_file(&self) -> PathBuf {
        self.root.join(META_FILE_NAME)
    }

    /// Get the index directory
    pub fn index_dir(&self) -> PathBuf {
        self.root.join(INDEX_DIR_NAME)
    }

    /// Get the document directory
    pub fn document_dir(&self) -> PathBuf {
        self.root.join(DOCUMENT_DIR_NAME)
    }

    /// Get the document-meta directory
    pub fn document_meta_dir(&self) -> PathBuf {
        self.document_dir().join(DOCUMENT_META_DIR_NAME)
    }

    /// Path of one index blob
    pub fn index_file(&self, index_id: &str) -> PathBuf {
        self.index_dir().join(index_id)
    }

    /// Path of one document revision: `document/<id>.<revision>`
    pub fn document_file(&self, document_id: &str, revision: Revision) -> PathBuf {
        self.document_dir()
            .join(format!("{}.{}", document_id, revision))
    }

    /// Path of one document-meta entry
    pub fn document_meta_file(&self, document_id: &str) -> PathBuf {
        self.document_meta_dir().join(document_id)
    }

    /// Check if a collection exists at this path
    ///
    /// A collection exists once its metadata file is present; bootstrap
    /// writes it last.
    pub fn exists(&self) -> bool {
        self.meta_file().exists()
    }

    /// Create the full directory structure
    ///
    /// Idempotent: directories that already exist are left alone.
    pub fn create_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.index_dir())?;
        std::fs::create_dir_all(self.document_dir())?;
        std::fs::create_dir_all(self.document_meta_dir())?;
        Ok(())
    }
}

/// Parse a document file name of the form `<id>.<revision>`
///
/// Returns the revision if `file_name` belongs to `document_id`.
pub fn parse_document_file_name(document_id: &str, file_name: &str) -> Option<Revision> {
    file_name
        .strip_prefix(document_id)?
        .strip_prefix('.')?
        .parse()
        .ok()
}
