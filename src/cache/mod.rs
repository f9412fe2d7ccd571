//! Result cache.
//!
//! Memoizes expensive pure computations (here: span extraction) under a key
//! with an absolute time-to-live. The backing store is pluggable through
//! [`CacheStore`]; [`MemoryStore`] is the in-process default.
//!
//! ## Semantics
//!
//! - A hit returns the stored value without running the computation.
//! - Concurrent misses on the same key run the computation once.
//! - Empty results are cached like any other value.
//! - Expiry is fixed at insertion; reads never extend it.

mod key;
mod store;

use std::hash::Hash;
use std::marker::PhantomData;
use std::time::Duration;

pub use key::DocumentKey;
pub use store::{CacheStore, MemoryStore};

use crate::Result;

/// Time-to-live used when the caller does not pick one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(20 * 60);

/// Shorter time-to-live for the highlighting path, trading memory for
/// responsiveness.
pub const CLASSIFIER_TTL: Duration = Duration::from_secs(10 * 60);

/// Typed get-or-compute front end over a [`CacheStore`].
pub struct ResultCache<K, V, S = MemoryStore<K, V>> {
    store: S,
    _types: PhantomData<fn(K) -> V>,
}

impl<K, V> ResultCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates an unbounded in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(MemoryStore::default())
    }

    /// Creates an in-memory cache holding at most `max_entries` values.
    #[must_use]
    pub fn with_capacity(max_entries: u64) -> Self {
        Self::with_store(MemoryStore::new(Some(max_entries)))
    }
}

impl<K, V> Default for ResultCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ResultCache<K, V, S>
where
    S: CacheStore<K, V>,
{
    #[must_use]
    pub const fn with_store(store: S) -> Self {
        Self {
            store,
            _types: PhantomData,
        }
    }

    /// Returns the cached value for `key`, computing and storing it on a miss.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use ko_spans::cache::ResultCache;
    ///
    /// let cache: ResultCache<String, usize> = ResultCache::new();
    /// let ttl = Duration::from_secs(60);
    /// let first = cache.get_or_compute("doc".to_string(), || 42, ttl)?;
    /// let second = cache.get_or_compute("doc".to_string(), || unreachable!(), ttl)?;
    /// assert_eq!((first, second), (42, 42));
    /// # Ok::<(), ko_spans::Error>(())
    /// ```
    pub fn get_or_compute<F>(&self, key: K, compute: F, ttl: Duration) -> Result<V>
    where
        F: FnOnce() -> V,
    {
        self.store.get_or_insert_with(key, ttl, compute)
    }

    /// [`get_or_compute`](Self::get_or_compute) with [`DEFAULT_TTL`].
    pub fn get_or_compute_default<F>(&self, key: K, compute: F) -> Result<V>
    where
        F: FnOnce() -> V,
    {
        self.get_or_compute(key, compute, DEFAULT_TTL)
    }

    /// Stores a precomputed `value` unless `key` is already cached.
    ///
    /// Returns whichever value the cache holds afterwards.
    pub fn get_or_store(&self, key: K, value: V, ttl: Duration) -> Result<V> {
        self.store.get_or_insert_with(key, ttl, || value)
    }

    /// [`get_or_store`](Self::get_or_store) with [`DEFAULT_TTL`].
    pub fn get_or_store_default(&self, key: K, value: V) -> Result<V> {
        self.get_or_store(key, value, DEFAULT_TTL)
    }

    /// Returns the unexpired value for `key` without computing anything.
    pub fn get(&self, key: &K) -> Result<Option<V>> {
        self.store.get(key)
    }

    pub fn invalidate(&self, key: &K) -> Result<()> {
        self.store.invalidate(key)
    }

    pub fn invalidate_all(&self) -> Result<()> {
        self.store.invalidate_all()
    }

    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.store.entry_count()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_default_ttls() {
        assert_eq!(DEFAULT_TTL, Duration::from_secs(1200));
        assert_eq!(CLASSIFIER_TTL, Duration::from_secs(600));
    }

    #[test]
    fn test_compute_runs_once_per_key() {
        let cache: ResultCache<&str, u32> = ResultCache::new();
        let calls = AtomicUsize::new(0);
        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            7
        };

        assert_eq!(cache.get_or_compute_default("k", compute).ok(), Some(7));
        assert_eq!(cache.get_or_compute_default("k", compute).ok(), Some(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_distinct_keys_compute_separately() {
        let cache: ResultCache<&str, u32> = ResultCache::new();
        assert_eq!(cache.get_or_compute_default("a", || 1).ok(), Some(1));
        assert_eq!(cache.get_or_compute_default("b", || 2).ok(), Some(2));
        assert_eq!(cache.entry_count(), 2);
    }

    #[test]
    fn test_empty_result_is_cached() {
        let cache: ResultCache<&str, Vec<u32>> = ResultCache::new();
        let calls = AtomicUsize::new(0);
        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        };

        let _ = cache.get_or_compute_default("empty", compute);
        let _ = cache.get_or_compute_default("empty", compute);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get(&"empty").ok().flatten(), Some(Vec::new()));
    }

    #[test]
    fn test_expired_entry_is_recomputed() {
        let cache: ResultCache<&str, u32> = ResultCache::new();
        let ttl = Duration::from_millis(30);
        let calls = AtomicUsize::new(0);
        let compute = || calls.fetch_add(1, Ordering::SeqCst) as u32;

        assert_eq!(cache.get_or_compute("k", compute, ttl).ok(), Some(0));
        thread::sleep(Duration::from_millis(120));
        assert_eq!(cache.get_or_compute("k", compute, ttl).ok(), Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_get_or_store_keeps_existing_value() {
        let cache: ResultCache<&str, &str> = ResultCache::new();
        let ttl = Duration::from_secs(60);
        assert_eq!(cache.get_or_store("k", "first", ttl).ok(), Some("first"));
        assert_eq!(cache.get_or_store("k", "second", ttl).ok(), Some("first"));
        assert_eq!(cache.get_or_store_default("other", "third").ok(), Some("third"));
    }

    #[test]
    fn test_concurrent_misses_compute_once() {
        const THREADS: usize = 8;
        let cache: Arc<ResultCache<&str, u32>> = Arc::new(ResultCache::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache
                        .get_or_compute_default("shared", || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(50));
                            99
                        })
                        .ok()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().ok().flatten(), Some(99));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_capacity_bound_evicts() {
        let cache: ResultCache<u32, u32> = ResultCache::with_capacity(4);
        for i in 0..64 {
            let _ = cache.get_or_compute_default(i, || i);
        }
        assert!(cache.entry_count() <= 4);
    }
}
