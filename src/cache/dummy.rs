//! Dummy Cache Module
//!
//! A cache that never retains anything, for call sites that need caching
//! switched off without changing how they call it.

use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::cache::{AsyncCache, Cache};
use crate::error::{CacheError, Result};

// == Dummy Cache ==
/// Null-object implementation of [`Cache`] and [`AsyncCache`].
///
/// Every read misses and every generator runs; nothing is ever stored.
pub struct DummyCache<K, V> {
    /// Kept so configuration round-trips, but never applied
    default_life_in_seconds: AtomicI64,
    _marker: PhantomData<fn(K) -> V>,
}

impl<K, V> DummyCache<K, V> {
    pub fn new() -> Self {
        Self {
            default_life_in_seconds: AtomicI64::new(0),
            _marker: PhantomData,
        }
    }
}

impl<K, V> Default for DummyCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Debug for DummyCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyCache").finish()
    }
}

impl<K, V> Cache<K, V> for DummyCache<K, V>
where
    K: Debug,
{
    fn default_life_in_seconds(&self) -> i64 {
        self.default_life_in_seconds.load(Ordering::Relaxed)
    }

    fn set_default_life_in_seconds(&self, life_in_seconds: i64) {
        self.default_life_in_seconds
            .store(life_in_seconds, Ordering::Relaxed);
    }

    fn save_with_ttl(&self, _key: K, _value: Option<V>, _life_in_seconds: i64) {}

    fn read(&self, key: &K) -> Result<V> {
        Err(CacheError::miss(key))
    }

    fn read_or(&self, _key: &K, fallback: V) -> V {
        fallback
    }

    fn compute_if_absent_with_ttl(
        &self,
        _key: K,
        generator: &dyn Fn() -> V,
        _life_in_seconds: i64,
    ) -> V {
        generator()
    }

    fn remove(&self, _key: &K) {}

    fn remove_all(&self) {}

    fn clean_up(&self) -> usize {
        0
    }

    fn cached_key_set(&self) -> HashSet<K> {
        HashSet::new()
    }
}

#[async_trait]
impl<K, V> AsyncCache<K, V> for DummyCache<K, V>
where
    K: Debug + Send + Sync,
    V: Send + Sync,
{
    fn default_life_in_seconds(&self) -> i64 {
        self.default_life_in_seconds.load(Ordering::Relaxed)
    }

    fn set_default_life_in_seconds(&self, life_in_seconds: i64) {
        self.default_life_in_seconds
            .store(life_in_seconds, Ordering::Relaxed);
    }

    async fn save_with_ttl(&self, _key: K, _value: Option<V>, _life_in_seconds: i64) {}

    async fn read(&self, key: &K) -> Result<V> {
        Err(CacheError::miss(key))
    }

    async fn read_or(&self, _key: &K, fallback: V) -> V {
        fallback
    }

    async fn read_or_populate<'a>(
        &'a self,
        _key: K,
        generator: BoxFuture<'a, anyhow::Result<V>>,
        _life_in_seconds: i64,
    ) -> anyhow::Result<V> {
        generator.await
    }

    async fn remove(&self, _key: &K) {}

    async fn remove_all(&self) {}

    async fn clean_up(&self) -> usize {
        0
    }

    async fn cached_key_set(&self) -> HashSet<K> {
        HashSet::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_dummy_never_stores() {
        let cache: DummyCache<&str, u32> = DummyCache::new();

        Cache::save(&cache, "a", Some(1));

        assert!(Cache::read(&cache, &"a").unwrap_err().is_miss());
        assert_eq!(Cache::read_or(&cache, &"a", 5), 5);
        assert!(Cache::cached_key_set(&cache).is_empty());
        assert_eq!(Cache::clean_up(&cache), 0);
    }

    #[test]
    fn test_dummy_always_runs_generator() {
        let cache: DummyCache<&str, usize> = DummyCache::new();
        let calls = AtomicUsize::new(0);
        let generator = || calls.fetch_add(1, Ordering::SeqCst) + 1;

        assert_eq!(Cache::compute_if_absent(&cache, "k", &generator), 1);
        assert_eq!(Cache::compute_if_absent(&cache, "k", &generator), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dummy_keeps_default_life_setting() {
        let cache: DummyCache<u8, u8> = DummyCache::default();

        Cache::set_default_life_in_seconds(&cache, 42);

        assert_eq!(Cache::default_life_in_seconds(&cache), 42);
    }

    #[tokio::test]
    async fn test_dummy_async_surface() {
        let cache: DummyCache<&str, u32> = DummyCache::new();

        AsyncCache::save(&cache, "a", Some(1)).await;
        assert!(AsyncCache::read(&cache, &"a").await.is_err());

        let first = cache
            .read_or_populate("a", async { Ok::<_, anyhow::Error>(3) }.boxed(), 60)
            .await
            .unwrap();
        let second = cache
            .read_or_populate("a", async { Ok::<_, anyhow::Error>(4) }.boxed(), 60)
            .await
            .unwrap();

        assert_eq!((first, second), (3, 4));
        assert!(AsyncCache::cached_key_set(&cache).await.is_empty());
    }
}
