use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use lru::LruCache;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::CacheConfig;
use crate::error::CacheConfigError;

/// One resident document handle.
#[derive(Debug)]
pub struct CacheEntry<H> {
    handle: Arc<H>,
    created_at: Instant,
    last_used_at: Instant,
    acquisitions: u64,
}

impl<H> CacheEntry<H> {
    fn new(handle: Arc<H>, now: Instant) -> Self {
        Self {
            handle,
            created_at: now,
            last_used_at: now,
            acquisitions: 1,
        }
    }

    fn touch(&mut self, now: Instant) {
        self.last_used_at = now;
        self.acquisitions += 1;
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn last_used_at(&self) -> Instant {
        self.last_used_at
    }

    /// Number of successful `acquire` calls served by this entry.
    pub fn acquisitions(&self) -> u64 {
        self.acquisitions
    }
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// Bounded, least-recently-acquired cache of opened document handles.
///
/// Handles are shared as `Arc<H>`. Evicting an entry drops only the cache's
/// reference, so a scan that acquired the handle earlier keeps using it until
/// it finishes; the handle is released when the last holder lets go.
///
/// The cache does no I/O of its own. `acquire` runs the caller's opener on a
/// miss, and the internal lock is never held across that await point.
pub struct DocumentCache<K: Hash + Eq, H> {
    entries: Mutex<LruCache<K, CacheEntry<H>>>,
    capacity: NonZeroUsize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<K, H> DocumentCache<K, H>
where
    K: Hash + Eq + Clone + Debug,
{
    pub fn new(config: &CacheConfig) -> Result<Self, CacheConfigError> {
        Ok(Self::with_capacity(config.validate()?))
    }

    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Returns the handle for `key`, opening it with `opener` on a miss.
    ///
    /// A hit refreshes the entry's recency and never evicts. A miss inserts
    /// the opened handle as the most recent entry and then evicts the least
    /// recently acquired entries until the cache is back within capacity.
    /// Opener failures are propagated and nothing is cached.
    ///
    /// When two callers miss on the same key concurrently, both open; the
    /// first handle admitted stays resident and the later one is released in
    /// favour of it.
    pub async fn acquire<F, Fut, E>(&self, key: K, opener: F) -> Result<Arc<H>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<H, E>>,
    {
        if let Some(handle) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = ?key, "cache_hit");
            return Ok(handle);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(key = ?key, "cache_miss");

        let opened = opener().await?;
        Ok(self.admit(key, opened))
    }

    /// Returns the resident handle for `key` and marks it most recent.
    pub fn get(&self, key: &K) -> Option<Arc<H>> {
        let mut entries = self.lock();
        entries.get_mut(key).map(|entry| {
            entry.touch(Instant::now());
            Arc::clone(&entry.handle)
        })
    }

    /// Checks residency without touching recency.
    pub fn contains(&self, key: &K) -> bool {
        self.lock().contains(key)
    }

    pub fn last_used_at(&self, key: &K) -> Option<Instant> {
        self.lock().peek(key).map(CacheEntry::last_used_at)
    }

    pub fn acquisitions(&self, key: &K) -> Option<u64> {
        self.lock().peek(key).map(CacheEntry::acquisitions)
    }

    /// Resident keys, most recently acquired first.
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.lock().iter().map(|(key, _)| key.clone()).collect()
    }

    /// Drops the cache's reference to `key`.
    pub fn remove(&self, key: &K) -> Option<Arc<H>> {
        let removed = self.lock().pop(key);
        removed.map(|entry| entry.handle)
    }

    pub fn clear(&self) {
        let drained: Vec<(K, CacheEntry<H>)> = {
            let mut entries = self.lock();
            let mut drained = Vec::with_capacity(entries.len());
            while let Some(pair) = entries.pop_lru() {
                drained.push(pair);
            }
            drained
        };
        debug!(released = drained.len(), "cache_clear");
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn admit(&self, key: K, opened: H) -> Arc<H> {
        let now = Instant::now();
        let (resident, evicted, duplicate) = {
            let mut entries = self.lock();
            if let Some(entry) = entries.get_mut(&key) {
                entry.touch(now);
                (Arc::clone(&entry.handle), None, Some(opened))
            } else {
                let handle = Arc::new(opened);
                let evicted = entries.push(key.clone(), CacheEntry::new(Arc::clone(&handle), now));
                (handle, evicted, None)
            }
        };

        if duplicate.is_some() {
            debug!(key = ?key, "cache_duplicate_open_released");
        }

        if let Some((evicted_key, entry)) = evicted {
            self.evictions.fetch_add(1, Ordering::Relaxed);
            info!(
                key = ?evicted_key,
                acquisitions = entry.acquisitions,
                still_in_use = Arc::strong_count(&entry.handle) > 1,
                "cache_evict"
            );
        }

        resident
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<K, CacheEntry<H>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
