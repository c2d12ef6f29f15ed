//! Store configuration
//!
//! `StoreOptions` controls how a [`CollectionStore`](crate::CollectionStore)
//! touches the disk: write durability, write retries and metadata caching.
//! Options live outside the collection directory; they can be built in code
//! or loaded from a TOML file.

use flatdb_core::{Error, Result};
use flatdb_durability::{FileIo, RetryConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How long a store instance may serve collection metadata from memory
///
/// Independently of the policy, a cached value is dropped as soon as the
/// `.meta` file's modification stamp changes, and every write through the
/// same instance invalidates it. Separate instances over one directory are
/// otherwise not coherent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CachePolicy {
    /// Always read `.meta` from disk
    Disabled,
    /// Serve the cached value for at most `ttl_ms` milliseconds
    Ttl {
        /// Time to live in milliseconds
        ttl_ms: u64,
    },
    /// Keep the cached value until this instance writes metadata
    UntilWrite,
}

impl Default for CachePolicy {
    fn default() -> Self {
        CachePolicy::Ttl { ttl_ms: 1000 }
    }
}

impl CachePolicy {
    /// Time-to-live of a cached value; `None` means unbounded
    pub fn ttl(&self) -> Option<Duration> {
        match self {
            CachePolicy::Disabled => Some(Duration::ZERO),
            CachePolicy::Ttl { ttl_ms } => Some(Duration::from_millis(*ttl_ms)),
            CachePolicy::UntilWrite => None,
        }
    }

    /// Whether values are cached at all
    pub fn is_enabled(&self) -> bool {
        !matches!(self, CachePolicy::Disabled)
    }
}

/// Store options
///
/// # Example
///
/// ```toml
/// # fsync every write and its parent directory
/// durable_writes = true
///
/// [retry]
/// max_retries = 3
/// base_delay_ms = 10
/// max_delay_ms = 100
///
/// [metadata_cache]
/// mode = "ttl"        # "disabled", "ttl" or "until_write"
/// ttl_ms = 1000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
    /// fsync every write and its parent directory
    #[serde(default = "default_durable_writes")]
    pub durable_writes: bool,
    /// Write retry behaviour
    #[serde(default)]
    pub retry: RetryConfig,
    /// Metadata cache behaviour
    #[serde(default)]
    pub metadata_cache: CachePolicy,
}

fn default_durable_writes() -> bool {
    true
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            durable_writes: default_durable_writes(),
            retry: RetryConfig::default(),
            metadata_cache: CachePolicy::default(),
        }
    }
}

impl StoreOptions {
    /// Options for tests: no fsync, no retry delays
    pub fn for_testing() -> Self {
        StoreOptions {
            durable_writes: false,
            retry: RetryConfig::default()
                .with_base_delay_ms(0)
                .with_max_delay_ms(0),
            metadata_cache: CachePolicy::default(),
        }
    }

    /// Set write durability
    pub fn with_durable_writes(mut self, durable: bool) -> Self {
        self.durable_writes = durable;
        self
    }

    /// Set retry configuration
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set metadata cache policy
    pub fn with_metadata_cache(mut self, policy: CachePolicy) -> Self {
        self.metadata_cache = policy;
        self
    }

    /// File I/O handle configured from these options
    pub fn file_io(&self) -> FileIo {
        FileIo::new(self.retry.clone(), self.durable_writes)
    }

    /// Returns the default options file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# FlatDB store options
#
# fsync every write and its parent directory (default: true)
durable_writes = true

# Bounded write retries with exponential backoff.
# A write that still fails after max_retries retries is reported as an error.
[retry]
max_retries = 3
base_delay_ms = 10
max_delay_ms = 100

# Collection metadata cache.
#   "disabled"    = always read .meta from disk
#   "ttl"         = cache for ttl_ms milliseconds (default)
#   "until_write" = cache until this store writes metadata
[metadata_cache]
mode = "ttl"
ttl_ms = 1000
"#
    }

    /// Parse options from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse store options: {}", e)))
    }

    /// Read and parse options from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to read options file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            Error::ConfigError(msg) => {
                Error::ConfigError(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })
    }

    /// Serialize these options to TOML and write them to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize options: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to write options file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
