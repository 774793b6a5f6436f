//! Async Cache Store Module
//!
//! Non-blocking facade over [`TimedCache`]. Both facades share one storage
//! engine, so expiration behaves identically whichever surface is used.

use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tracing::debug;

use crate::cache::{AsyncCache, Cache, CacheStats, TimedCache};
use crate::config::CacheConfig;
use crate::error::Result;

// == Async Timed Cache ==
/// Asynchronous handle to a [`TimedCache`].
///
/// Cloning the handle is cheap and every clone sees the same entries.
pub struct AsyncTimedCache<K, V> {
    inner: Arc<TimedCache<K, V>>,
}

impl<K: Eq + Hash, V> fmt::Debug for AsyncTimedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncTimedCache")
            .field("inner", &self.inner)
            .finish()
    }
}

impl<K, V> Clone for AsyncTimedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> AsyncTimedCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    /// Creates an empty cache whose default lifetime is zero (never expire).
    pub fn new() -> Self {
        Self::from_sync(Arc::new(TimedCache::new()))
    }

    pub fn with_default_life(default_life_in_seconds: i64) -> Self {
        Self::from_sync(Arc::new(TimedCache::with_default_life(
            default_life_in_seconds,
        )))
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::from_sync(Arc::new(TimedCache::from_config(config)))
    }

    /// Wraps an existing synchronous store without copying its entries.
    pub fn from_sync(inner: Arc<TimedCache<K, V>>) -> Self {
        Self { inner }
    }

    /// Returns the synchronous store backing this handle.
    pub fn to_sync(&self) -> Arc<TimedCache<K, V>> {
        Arc::clone(&self.inner)
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.stats()
    }
}

impl<K, V> Default for AsyncTimedCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K, V> AsyncCache<K, V> for AsyncTimedCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default_life_in_seconds(&self) -> i64 {
        self.inner.default_life_in_seconds()
    }

    fn set_default_life_in_seconds(&self, life_in_seconds: i64) {
        self.inner.set_default_life_in_seconds(life_in_seconds);
    }

    async fn save_with_ttl(&self, key: K, value: Option<V>, life_in_seconds: i64) {
        self.inner.save_with_ttl(key, value, life_in_seconds);
    }

    async fn read(&self, key: &K) -> Result<V> {
        self.inner.read(key)
    }

    async fn read_or(&self, key: &K, fallback: V) -> V {
        self.inner.read_or(key, fallback)
    }

    // == Read Or Populate ==
    async fn read_or_populate<'a>(
        &'a self,
        key: K,
        generator: BoxFuture<'a, anyhow::Result<V>>,
        life_in_seconds: i64,
    ) -> anyhow::Result<V> {
        if let Some(value) = self.inner.lookup(&key) {
            return Ok(value);
        }

        debug!("Populating cache entry: {:?}", key);
        let value = generator.await?;
        // Stored before the returned future resolves
        self.inner
            .save_with_ttl(key, Some(value.clone()), life_in_seconds);
        Ok(value)
    }

    async fn remove(&self, key: &K) {
        self.inner.remove(key);
    }

    async fn remove_all(&self) {
        self.inner.remove_all();
    }

    async fn clean_up(&self) -> usize {
        self.inner.clean_up()
    }

    async fn cached_key_set(&self) -> HashSet<K> {
        self.inner.cached_key_set()
    }
}
