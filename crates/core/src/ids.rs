//! Identifier, revision and timestamp generation
//!
//! - Unique IDs: `YYYYMMDDHHMMSSffffff` (UTC, microseconds) followed by a
//!   12-hex-digit disambiguator built from a per-process random seed plus a
//!   process-wide counter. IDs sort roughly by creation time and are unique
//!   within a process; across processes uniqueness rests on the seed's entropy.
//! - Revisions: uniform random integers in `REVISION_MIN..=REVISION_MAX`.
//! - Timestamps: `YYYY-MM-DD HH:MM:SS.ffffff` (UTC), informational only.
//! - Registry: hex SHA-256 of a fresh unique ID.

use crate::types::{Revision, REVISION_MAX, REVISION_MIN};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

/// Disambiguator width in bits (12 hex digits)
const DISAMBIGUATOR_MASK: u64 = (1 << 48) - 1;

static PROCESS_SEED: Lazy<u64> = Lazy::new(|| rand::random::<u64>() & DISAMBIGUATOR_MASK);
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique ID
pub fn new_unique_id() -> String {
    unique_id_at(Utc::now())
}

fn unique_id_at(now: DateTime<Utc>) -> String {
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);
    let disambiguator = PROCESS_SEED.wrapping_add(count) & DISAMBIGUATOR_MASK;
    format!("{}{:012x}", now.format("%Y%m%d%H%M%S%6f"), disambiguator)
}

/// Generate a new random revision number
pub fn new_revision() -> Revision {
    Revision::new(rand::thread_rng().gen_range(REVISION_MIN..=REVISION_MAX))
}

/// Current wall-clock time as `YYYY-MM-DD HH:MM:SS.ffffff`
pub fn new_timestamp() -> String {
    format_timestamp(Utc::now())
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Generate a registry identifier for a new collection
pub fn new_registry() -> String {
    let digest = Sha256::digest(new_unique_id().as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest.iter() {
        // Writing to a String cannot fail
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}
