//! Content-addressed embedding cache with single-flight computation.
//!
//! Keys are SHA-256 fingerprints of the full text. Each key owns a slot (`OnceLock`):
//! the map lock is held only long enough to find or create the slot, and the embedding
//! itself is computed outside it. Concurrent requests for the same fingerprint block on
//! the slot until the first computation finishes, so each text is embedded at most once
//! while it stays cached. Requests for different fingerprints never wait on each other's
//! computation.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use sha2::{Digest, Sha256};

pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// SHA-256 digest of a text, used as the cache key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(text: &str) -> Self {
        Self(Sha256::digest(text.as_bytes()).into())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({self})")
    }
}

/// Shared embedding; `None` records that the embedder produced nothing for this text.
pub type CachedEmbedding = Option<Arc<[f32]>>;

type Slot = Arc<OnceLock<CachedEmbedding>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

pub struct EmbeddingCache {
    slots: Mutex<LruCache<Fingerprint, Slot>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl EmbeddingCache {
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            slots: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the cached embedding for `text`, running `compute` only if no other caller
    /// has produced (or is producing) it.
    pub fn get_or_compute<F>(&self, text: &str, compute: F) -> CachedEmbedding
    where
        F: FnOnce(&str) -> Option<Vec<f32>>,
    {
        let key = Fingerprint::of(text);
        let slot = {
            let mut slots = self.slots.lock();
            match slots.get(&key) {
                Some(slot) => Arc::clone(slot),
                None => {
                    let slot: Slot = Arc::new(OnceLock::new());
                    slots.put(key, Arc::clone(&slot));
                    slot
                }
            }
        };

        let mut computed = false;
        let embedding = slot
            .get_or_init(|| {
                computed = true;
                compute(text).map(Arc::from)
            })
            .clone();

        if computed {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        embedding
    }

    #[cfg(test)]
    pub fn contains(&self, text: &str) -> bool {
        self.slots.lock().contains(&Fingerprint::of(text))
    }

    pub fn stats(&self) -> CacheStats {
        let slots = self.slots.lock();
        CacheStats {
            entries: slots.len(),
            capacity: slots.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Drops every cached embedding. Counters are kept.
    pub fn clear(&self) {
        self.slots.lock().clear();
    }
}

impl Default for EmbeddingCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}
