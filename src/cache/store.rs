//! Cache Store Module
//!
//! Default cache engine: a concurrent map of keys to wrapped values with
//! lazy expiry on read and an explicit clean-up sweep.

use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info, trace};

use crate::cache::{Cache, CacheStats, StatsRecorder, WrappedValue};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Timed Cache ==
/// Thread-safe cache whose entries expire after a per-entry lifetime.
///
/// Map bookkeeping is sharded by `DashMap`; each entry carries its own lock,
/// so readers of live values never serialize against each other.
pub struct TimedCache<K, V> {
    /// Key to wrapped value storage
    entries: DashMap<K, Arc<WrappedValue<V>>>,
    /// Lifetime in seconds used by `save`
    default_life_in_seconds: AtomicI64,
    /// Read and expiration counters
    stats: StatsRecorder,
}

impl<K, V> TimedCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    // == Constructor ==
    /// Creates an empty cache whose default lifetime is zero (never expire).
    pub fn new() -> Self {
        Self::with_default_life(0)
    }

    /// Creates an empty cache with the given default lifetime in seconds.
    pub fn with_default_life(default_life_in_seconds: i64) -> Self {
        Self {
            entries: DashMap::new(),
            default_life_in_seconds: AtomicI64::new(default_life_in_seconds),
            stats: StatsRecorder::new(),
        }
    }

    /// Creates an empty cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_default_life(config.default_life_in_seconds)
    }

    // == Lookup ==
    /// Returns the live value for `key`, evicting the entry if it has expired.
    pub(crate) fn lookup(&self, key: &K) -> Option<V> {
        loop {
            // Clone the handle so the shard lock is released before touching the wrapper
            let wrapped = self.entries.get(key).map(|entry| Arc::clone(entry.value()));

            let Some(wrapped) = wrapped else {
                self.stats.record_miss();
                debug!("Cache miss: {:?}", key);
                return None;
            };

            if let Some(value) = wrapped.read() {
                self.stats.record_hit();
                trace!("Cache hit: {:?}", key);
                return Some(value);
            }

            // Only evict the wrapper we observed
            if self
                .entries
                .remove_if(key, |_, current| Arc::ptr_eq(current, &wrapped))
                .is_some()
            {
                self.stats.record_expirations(1);
                self.stats.record_miss();
                debug!("Cache entry expired: {:?}", key);
                return None;
            }
            // A concurrent save or remove replaced the entry; look again
        }
    }

    // == Insert ==
    fn insert(&self, key: K, value: V, life_in_seconds: i64) {
        let wrapped = Arc::new(WrappedValue::new(value, life_in_seconds));
        self.entries.insert(key, wrapped);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }

    // == Remaining Lifetime ==
    /// Returns the remaining lifetime of a live entry.
    ///
    /// # Returns
    /// - `None` if there is no live entry for `key`
    /// - `Some(None)` if the entry never expires
    /// - `Some(Some(remaining))` otherwise
    pub fn remaining_lifetime(&self, key: &K) -> Option<Option<std::time::Duration>> {
        let wrapped = self.entries.get(key).map(|entry| Arc::clone(entry.value()))?;
        if wrapped.is_available() {
            Some(wrapped.remaining_lifetime())
        } else {
            None
        }
    }

    // == Length ==
    /// Returns the number of entries in the backing map, including expired
    /// entries that have not been swept yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> Default for TimedCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Debug for TimedCache<K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedCache")
            .field("entries", &self.entries.len())
            .field(
                "default_life_in_seconds",
                &self.default_life_in_seconds.load(Ordering::Relaxed),
            )
            .finish()
    }
}

impl<K, V> Cache<K, V> for TimedCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default_life_in_seconds(&self) -> i64 {
        self.default_life_in_seconds.load(Ordering::Relaxed)
    }

    fn set_default_life_in_seconds(&self, life_in_seconds: i64) {
        self.default_life_in_seconds
            .store(life_in_seconds, Ordering::Relaxed);
    }

    // == Save ==
    fn save_with_ttl(&self, key: K, value: Option<V>, life_in_seconds: i64) {
        match value {
            Some(value) => self.insert(key, value, life_in_seconds),
            None => self.remove(&key),
        }
    }

    // == Read ==
    fn read(&self, key: &K) -> Result<V> {
        self.lookup(key).ok_or_else(|| CacheError::miss(key))
    }

    fn read_or(&self, key: &K, fallback: V) -> V {
        self.lookup(key).unwrap_or(fallback)
    }

    // == Compute If Absent ==
    fn compute_if_absent_with_ttl(
        &self,
        key: K,
        generator: &dyn Fn() -> V,
        life_in_seconds: i64,
    ) -> V {
        if let Some(value) = self.lookup(&key) {
            return value;
        }

        let value = generator();
        self.insert(key, value.clone(), life_in_seconds);
        value
    }

    // == Remove ==
    fn remove(&self, key: &K) {
        if let Some((_, wrapped)) = self.entries.remove(key) {
            wrapped.release();
            debug!("Removed cache entry: {:?}", key);
        }
    }

    fn remove_all(&self) {
        let count = self.entries.len();
        self.entries.retain(|_, wrapped| {
            wrapped.release();
            false
        });
        info!("Cleared {} entries from cache", count);
    }

    // == Clean Up ==
    fn clean_up(&self) -> usize {
        let before = self.entries.len();
        let mut removed = 0usize;
        self.entries.retain(|_, wrapped| {
            let live = wrapped.is_available();
            if !live {
                removed += 1;
            }
            live
        });
        self.stats.record_expirations(removed as u64);

        if removed > 0 {
            info!("Cache clean-up: removed {} of {} entries", removed, before);
        } else {
            trace!("Cache clean-up: no expired entries found");
        }
        removed
    }

    // == Cached Key Set ==
    fn cached_key_set(&self) -> HashSet<K> {
        self.entries
            .iter()
            .filter(|entry| entry.value().is_available())
            .map(|entry| entry.key().clone())
            .collect()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize};
    use std::thread::{self, sleep};
    use std::time::Duration;

    fn store() -> TimedCache<String, String> {
        TimedCache::new()
    }

    #[test]
    fn test_store_new() {
        let store = store();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.default_life_in_seconds(), 0);
    }

    #[test]
    fn test_store_save_and_read() {
        let store = store();

        store.save("key1".to_string(), Some("value1".to_string()));
        let value = store.read(&"key1".to_string()).unwrap();

        assert_eq!(value, "value1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_read_nonexistent() {
        let store = store();

        let result = store.read(&"nonexistent".to_string());
        assert!(matches!(result, Err(CacheError::Miss(_))));
    }

    #[test]
    fn test_store_save_none_removes() {
        let store = store();

        store.save("key1".to_string(), Some("value1".to_string()));
        store.save("key1".to_string(), None);

        assert!(store.is_empty());
        assert!(store.read(&"key1".to_string()).is_err());
    }

    #[test]
    fn test_store_read_or_fallback() {
        let store = store();
        store.save("present".to_string(), Some("value".to_string()));

        assert_eq!(
            store.read_or(&"present".to_string(), "fallback".to_string()),
            "value"
        );
        assert_eq!(
            store.read_or(&"absent".to_string(), "fallback".to_string()),
            "fallback"
        );
    }

    #[test]
    fn test_store_overwrite() {
        let store = store();

        store.save("key1".to_string(), Some("value1".to_string()));
        store.save("key1".to_string(), Some("value2".to_string()));

        assert_eq!(store.read(&"key1".to_string()).unwrap(), "value2");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let store = store();

        store.save_with_ttl("key1".to_string(), Some("value1".to_string()), 1);
        assert!(store.read(&"key1".to_string()).is_ok());

        sleep(Duration::from_millis(1100));

        assert!(matches!(
            store.read(&"key1".to_string()),
            Err(CacheError::Miss(_))
        ));
        // Lazy eviction removed the entry from the map
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_default_life_applies_to_save() {
        let store: TimedCache<&str, i32> = TimedCache::with_default_life(1);
        store.save("short", Some(1));

        store.set_default_life_in_seconds(0);
        store.save("forever", Some(2));

        sleep(Duration::from_millis(1100));

        assert!(store.read(&"short").is_err());
        assert_eq!(store.read(&"forever").unwrap(), 2);
    }

    #[test]
    fn test_store_from_config() {
        let config = CacheConfig {
            default_life_in_seconds: 30,
            ..CacheConfig::default()
        };
        let store: TimedCache<u32, u32> = TimedCache::from_config(&config);
        assert_eq!(store.default_life_in_seconds(), 30);
    }

    #[test]
    fn test_compute_if_absent_calls_generator_once() {
        let store: TimedCache<&str, u32> = TimedCache::new();
        let calls = AtomicUsize::new(0);

        let first = store.compute_if_absent("k", &|| {
            calls.fetch_add(1, Ordering::SeqCst);
            7
        });
        let second = store.compute_if_absent("k", &|| {
            calls.fetch_add(1, Ordering::SeqCst);
            8
        });

        assert_eq!(first, 7);
        assert_eq!(second, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_compute_if_absent_after_expiry() {
        let store: TimedCache<&str, u32> = TimedCache::new();

        store.compute_if_absent_with_ttl("k", &|| 1, 1);
        sleep(Duration::from_millis(1100));

        assert_eq!(store.compute_if_absent("k", &|| 2), 2);
        assert_eq!(store.read(&"k").unwrap(), 2);
    }

    #[test]
    fn test_store_remove() {
        let store = store();

        store.save("key1".to_string(), Some("value1".to_string()));
        store.remove(&"key1".to_string());
        // Removing a missing key is a no-op
        store.remove(&"key1".to_string());

        assert!(store.is_empty());
    }

    #[test]
    fn test_store_remove_all() {
        let store: TimedCache<u32, u32> = TimedCache::new();
        for i in 0..10 {
            store.save(i, Some(i));
        }

        store.remove_all();

        assert!(store.is_empty());
        assert!(store.cached_key_set().is_empty());
    }

    #[test]
    fn test_store_clean_up() {
        let store: TimedCache<&str, &str> = TimedCache::new();

        store.save_with_ttl("key1", Some("value1"), 1);
        store.save_with_ttl("key2", Some("value2"), 10);
        store.save("key3", Some("value3"));

        sleep(Duration::from_millis(1100));

        assert_eq!(store.clean_up(), 1);
        assert_eq!(store.clean_up(), 0);
        assert_eq!(store.len(), 2);
        assert!(store.read(&"key2").is_ok());
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_cached_key_set_skips_expired() {
        let store: TimedCache<&str, u8> = TimedCache::new();

        store.save_with_ttl("short", Some(1), 1);
        store.save("long", Some(2));

        sleep(Duration::from_millis(1100));

        let keys = store.cached_key_set();
        assert_eq!(keys, HashSet::from(["long"]));
    }

    #[test]
    fn test_remaining_lifetime() {
        let store: TimedCache<&str, u8> = TimedCache::new();
        store.save_with_ttl("ttl", Some(1), 10);
        store.save("forever", Some(2));

        let remaining = store.remaining_lifetime(&"ttl").unwrap().unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert_eq!(store.remaining_lifetime(&"forever"), Some(None));
        assert_eq!(store.remaining_lifetime(&"missing"), None);
    }

    #[test]
    fn test_store_stats() {
        let store = store();

        store.save("key1".to_string(), Some("value1".to_string()));
        store.read(&"key1".to_string()).unwrap(); // hit
        let _ = store.read(&"nonexistent".to_string()); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_concurrent_save_and_read() {
        let store: Arc<TimedCache<u32, u32>> = Arc::new(TimedCache::new());

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..500 {
                        let key = t * 1000 + i;
                        store.save(key, Some(i));
                        assert_eq!(store.read(&key).unwrap(), i);
                        store.clean_up();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.cached_key_set().len(), 2000);
    }

    #[test]
    fn test_overwrite_never_hides_live_value() {
        let store: Arc<TimedCache<u32, u32>> = Arc::new(TimedCache::new());
        let writing = Arc::new(AtomicBool::new(true));
        let misses = Arc::new(AtomicUsize::new(0));
        let generator_calls = Arc::new(AtomicUsize::new(0));
        store.save(1, Some(0));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                let writing = Arc::clone(&writing);
                let misses = Arc::clone(&misses);
                let generator_calls = Arc::clone(&generator_calls);
                thread::spawn(move || {
                    while writing.load(Ordering::SeqCst) {
                        if store.read(&1).is_err() {
                            misses.fetch_add(1, Ordering::SeqCst);
                        }
                        store.compute_if_absent(1, &|| {
                            generator_calls.fetch_add(1, Ordering::SeqCst);
                            u32::MAX
                        });
                    }
                })
            })
            .collect();

        for i in 1..=50_000 {
            store.save(1, Some(i));
        }
        writing.store(false, Ordering::SeqCst);

        for reader in readers {
            reader.join().unwrap();
        }

        assert_eq!(misses.load(Ordering::SeqCst), 0);
        assert_eq!(generator_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.read(&1).unwrap(), 50_000);
    }

    #[test]
    fn test_remove_then_save_serves_new_value() {
        let store: TimedCache<&str, u32> = TimedCache::new();
        store.save("k", Some(1));

        store.remove(&"k");
        store.save("k", Some(2));

        assert_eq!(store.read(&"k").unwrap(), 2);
        assert_eq!(store.stats().expirations, 0);
    }
}
