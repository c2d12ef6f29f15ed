//! File I/O for collection regions
//!
//! Reads return the exact file contents. Reading an absent file is an error
//! at this level ([`Error::NotFound`]); the collection layer checks existence
//! first and turns absence into `None` or an empty value.
//!
//! Writes replace the target atomically:
//! 1. Write to a hidden temporary sibling (`.tmp.<pid>.<n>`)
//! 2. fsync the temporary file (durable mode)
//! 3. Rename over the target
//! 4. fsync the parent directory (durable mode)
//!
//! A failed attempt is retried according to [`RetryConfig`]; when the budget
//! is exhausted the last error is returned as [`Error::WriteFailed`].

use crate::codec::Codec;
use crate::retry::RetryConfig;
use flatdb_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use tracing::{debug, warn};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Modification stamp of a file, used to detect external rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStamp {
    /// Last modification time
    pub modified: SystemTime,
    /// File length in bytes
    pub len: u64,
}

impl FileStamp {
    /// Stamp of the file at `path`, or `None` if it cannot be inspected
    pub fn of(path: &Path) -> Option<Self> {
        let meta = std::fs::metadata(path).ok()?;
        Some(FileStamp {
            modified: meta.modified().ok()?,
            len: meta.len(),
        })
    }
}

/// File reader/writer shared by all collection regions
#[derive(Debug, Clone)]
pub struct FileIo {
    retry: RetryConfig,
    durable: bool,
}

impl Default for FileIo {
    fn default() -> Self {
        FileIo::new(RetryConfig::default(), true)
    }
}

impl FileIo {
    /// Create a file I/O handle
    ///
    /// With `durable` set, every write is fsynced along with its parent
    /// directory before returning.
    pub fn new(retry: RetryConfig, durable: bool) -> Self {
        FileIo { retry, durable }
    }

    /// Whether writes are fsynced
    pub fn is_durable(&self) -> bool {
        self.durable
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Read the exact bytes of a file
    pub fn read_raw(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(|e| not_found_or_io(path, e))
    }

    /// Read a file, mapping absence to `None`
    pub fn read_optional(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::IoError(e)),
        }
    }

    /// Read and decode a file through a serialization lane
    ///
    /// # Errors
    /// `NotFound` if the file is absent, `Corruption` if it does not decode.
    pub fn read_value<C: Codec, T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let bytes = self.read_raw(path)?;
        C::decode(&bytes).map_err(|reason| {
            warn!(
                target: "flatdb::io",
                path = %path.display(),
                codec = C::NAME,
                error = %reason,
                "Failed to decode file"
            );
            Error::corruption(path, reason)
        })
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Replace a file's contents with `bytes`
    pub fn write_raw(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.with_retry(path, || self.replace_file(path, bytes))
    }

    /// Encode a value through a serialization lane and write it
    pub fn write_value<C: Codec, T: Serialize + ?Sized>(
        &self,
        path: &Path,
        value: &T,
    ) -> Result<()> {
        let bytes = C::encode(value)?;
        self.write_raw(path, &bytes)
    }

    /// Run `op` until it succeeds or the retry budget is spent
    pub fn with_retry<F>(&self, path: &Path, mut op: F) -> Result<()>
    where
        F: FnMut() -> io::Result<()>,
    {
        let attempts = self.retry.max_attempts();
        let mut attempt = 0;
        loop {
            match op() {
                Ok(()) => return Ok(()),
                Err(e) => {
                    attempt += 1;
                    if attempt >= attempts {
                        warn!(
                            target: "flatdb::io",
                            path = %path.display(),
                            attempts,
                            error = %e,
                            "Write failed, giving up"
                        );
                        return Err(Error::WriteFailed {
                            path: path.to_path_buf(),
                            attempts,
                            source: e,
                        });
                    }
                    let delay = self.retry.calculate_delay(attempt - 1);
                    warn!(
                        target: "flatdb::io",
                        path = %path.display(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Write failed, retrying"
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                }
            }
        }
    }

    fn replace_file(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let temp_path = temp_path_for(path)?;

        let result = self.write_temp_and_rename(&temp_path, path, bytes);
        if result.is_err() {
            let _ = std::fs::remove_file(&temp_path);
        }
        result
    }

    fn write_temp_and_rename(
        &self,
        temp_path: &Path,
        path: &Path,
        bytes: &[u8],
    ) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(temp_path)?;
        file.write_all(bytes)?;
        if self.durable {
            file.sync_all()?;
        }
        drop(file);

        std::fs::rename(temp_path, path)?;

        if self.durable {
            if let Some(parent) = path.parent() {
                sync_dir(parent)?;
            }
        }

        debug!(
            target: "flatdb::io",
            path = %path.display(),
            bytes = bytes.len(),
            "Wrote file"
        );
        Ok(())
    }

    // ========================================================================
    // Removal and listing
    // ========================================================================

    /// Remove a file; returns whether it existed
    pub fn remove_if_exists(&self, path: &Path) -> Result<bool> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::IoError(e)),
        }
    }

    /// Names of the regular files in `dir`, sorted
    ///
    /// Hidden entries (temporary files, `.meta`) and names that are not
    /// valid UTF-8 are skipped. A missing directory lists as empty.
    pub fn list_files(&self, dir: &Path) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::IoError(e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) if !name.starts_with('.') => names.push(name),
                _ => {}
            }
        }
        names.sort();
        Ok(names)
    }
}

fn not_found_or_io(path: &Path, e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::NotFound {
        Error::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        Error::IoError(e)
    }
}

fn temp_path_for(path: &Path) -> io::Result<PathBuf> {
    if path.file_name().is_none() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' has no file name", path.display()),
        ));
    }
    // Fixed-width name: a target already at the file-name limit must still
    // have a representable temp sibling.
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    Ok(path.with_file_name(format!(".tmp.{}.{}", std::process::id(), n)))
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    std::fs::File::open(dir)?.sync_all()
}

// Directories cannot be opened for syncing on Windows
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
