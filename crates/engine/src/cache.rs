//! Per-instance collection metadata cache

use crate::config::CachePolicy;
use flatdb_core::MetaData;
use flatdb_durability::FileStamp;
use parking_lot::Mutex;
use std::time::Instant;

struct Cached<C> {
    meta: MetaData<C>,
    loaded_at: Instant,
    stamp: Option<FileStamp>,
}

/// Cache slot for one collection's metadata
///
/// An entry is served only while it is younger than the policy's TTL and the
/// `.meta` stamp observed by the caller matches the one recorded at load.
pub(crate) struct MetadataCache<C> {
    policy: CachePolicy,
    slot: Mutex<Option<Cached<C>>>,
}

impl<C: Clone> MetadataCache<C> {
    pub(crate) fn new(policy: CachePolicy) -> Self {
        MetadataCache {
            policy,
            slot: Mutex::new(None),
        }
    }

    /// Cached metadata, if still valid for `current_stamp`
    pub(crate) fn get(&self, current_stamp: Option<FileStamp>) -> Option<MetaData<C>> {
        if !self.policy.is_enabled() {
            return None;
        }
        let mut slot = self.slot.lock();
        let fresh = match slot.as_ref() {
            Some(cached) => {
                let young = self
                    .policy
                    .ttl()
                    .map_or(true, |ttl| cached.loaded_at.elapsed() < ttl);
                young && cached.stamp.is_some() && cached.stamp == current_stamp
            }
            None => return None,
        };
        if fresh {
            slot.as_ref().map(|cached| cached.meta.clone())
        } else {
            *slot = None;
            None
        }
    }

    pub(crate) fn put(&self, meta: &MetaData<C>, stamp: Option<FileStamp>) {
        if !self.policy.is_enabled() {
            return;
        }
        *self.slot.lock() = Some(Cached {
            meta: meta.clone(),
            loaded_at: Instant::now(),
            stamp,
        });
    }

    pub(crate) fn invalidate(&self) {
        *self.slot.lock() = None;
    }

    #[cfg(test)]
    pub(crate) fn is_populated(&self) -> bool {
        self.slot.lock().is_some()
    }
}
