//! Key/value stores with per-entry expiry.

use std::hash::Hash;
use std::time::{Duration, Instant};

use moka::sync::Cache;
use moka::Expiry;

use crate::Result;

/// A key/value store whose entries expire at an absolute deadline.
///
/// Implementations must run `init` at most once per key for concurrent
/// misses and hand every waiting caller the same value. A store that cannot
/// serve a request reports [`Error::CacheUnavailable`](crate::Error::CacheUnavailable).
pub trait CacheStore<K, V>: Send + Sync {
    /// Returns the unexpired value for `key`, if any.
    fn get(&self, key: &K) -> Result<Option<V>>;

    /// Returns the unexpired value for `key`, or stores `init()` with a
    /// deadline of now + `ttl` and returns it.
    fn get_or_insert_with<F>(&self, key: K, ttl: Duration, init: F) -> Result<V>
    where
        F: FnOnce() -> V;

    fn invalidate(&self, key: &K) -> Result<()>;

    fn invalidate_all(&self) -> Result<()>;

    /// Number of live entries.
    fn entry_count(&self) -> u64;
}

/// Value wrapper carrying the ttl it was inserted with.
#[derive(Debug, Clone)]
struct Timed<V> {
    value: V,
    ttl: Duration,
}

/// Expires each entry after the ttl it was created with. Reads and
/// overwrites keep the original deadline.
struct PerEntryTtl;

impl<K, V> Expiry<K, Timed<V>> for PerEntryTtl {
    fn expire_after_create(&self, _key: &K, entry: &Timed<V>, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process store backed by `moka`.
///
/// Concurrent misses on one key are coalesced into a single `init` call;
/// misses on different keys proceed in parallel.
pub struct MemoryStore<K, V> {
    inner: Cache<K, Timed<V>>,
}

impl<K, V> MemoryStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a store, optionally bounded to `max_entries`.
    ///
    /// Without a bound, entries leave only by expiry or invalidation.
    #[must_use]
    pub fn new(max_entries: Option<u64>) -> Self {
        let mut builder = Cache::<K, Timed<V>>::builder().expire_after(PerEntryTtl);
        if let Some(max_entries) = max_entries {
            builder = builder.max_capacity(max_entries);
        }
        Self {
            inner: builder.build(),
        }
    }
}

impl<K, V> Default for MemoryStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(None)
    }
}

impl<K, V> CacheStore<K, V> for MemoryStore<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Result<Option<V>> {
        Ok(self.inner.get(key).map(|entry| entry.value))
    }

    fn get_or_insert_with<F>(&self, key: K, ttl: Duration, init: F) -> Result<V>
    where
        F: FnOnce() -> V,
    {
        let entry = self.inner.get_with(key, || Timed { value: init(), ttl });
        Ok(entry.value)
    }

    fn invalidate(&self, key: &K) -> Result<()> {
        self.inner.invalidate(key);
        Ok(())
    }

    fn invalidate_all(&self) -> Result<()> {
        self.inner.invalidate_all();
        Ok(())
    }

    fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}
