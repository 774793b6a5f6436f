//! Cache Contracts
//!
//! The blocking [`Cache`] and non-blocking [`AsyncCache`] access surfaces.
//! Both are object safe, so call sites can hold an `Arc<dyn Cache<K, V>>`
//! and swap the default store for the dummy one without branching.

use std::collections::HashSet;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::Result;

// == Synchronous Contract ==
/// Blocking, time-bounded key-value cache.
///
/// A `None` value is never stored: saving `None` removes the key.
pub trait Cache<K, V>: Send + Sync {
    /// Returns the lifetime applied by [`Cache::save`]. Zero or negative
    /// means entries saved with the default never expire.
    fn default_life_in_seconds(&self) -> i64;

    /// Changes the lifetime applied by subsequent [`Cache::save`] calls.
    fn set_default_life_in_seconds(&self, life_in_seconds: i64);

    /// Saves `value` under `key` with an explicit lifetime in seconds.
    /// Saving `None` is the same as [`Cache::remove`].
    fn save_with_ttl(&self, key: K, value: Option<V>, life_in_seconds: i64);

    /// Saves `value` under `key` with the default lifetime.
    fn save(&self, key: K, value: Option<V>) {
        self.save_with_ttl(key, value, self.default_life_in_seconds());
    }

    /// Returns the live value for `key`, or a [`CacheError::Miss`](crate::error::CacheError::Miss).
    fn read(&self, key: &K) -> Result<V>;

    /// Returns the live value for `key`, or `fallback`. Never fails.
    fn read_or(&self, key: &K, fallback: V) -> V;

    /// Returns the live value for `key`; otherwise calls `generator`, saves
    /// its result with `life_in_seconds` and returns it.
    ///
    /// Concurrent misses on the same key may each call their generator; the
    /// last save wins.
    fn compute_if_absent_with_ttl(
        &self,
        key: K,
        generator: &dyn Fn() -> V,
        life_in_seconds: i64,
    ) -> V;

    /// [`Cache::compute_if_absent_with_ttl`] with the default lifetime.
    fn compute_if_absent(&self, key: K, generator: &dyn Fn() -> V) -> V {
        let life = self.default_life_in_seconds();
        self.compute_if_absent_with_ttl(key, generator, life)
    }

    fn remove(&self, key: &K);

    fn remove_all(&self);

    /// Evicts every entry that is no longer live. Returns how many were evicted.
    fn clean_up(&self) -> usize;

    /// Snapshot of the keys that were live at the time of the call.
    fn cached_key_set(&self) -> HashSet<K>;
}

// == Asynchronous Contract ==
/// Non-blocking counterpart of [`Cache`]; every operation returns a future.
#[async_trait]
pub trait AsyncCache<K, V>: Send + Sync
where
    K: Send + Sync,
    V: Send + Sync,
{
    fn default_life_in_seconds(&self) -> i64;

    fn set_default_life_in_seconds(&self, life_in_seconds: i64);

    async fn save_with_ttl(&self, key: K, value: Option<V>, life_in_seconds: i64);

    async fn save(&self, key: K, value: Option<V>)
    where
        K: 'async_trait,
        V: 'async_trait,
    {
        let life = self.default_life_in_seconds();
        self.save_with_ttl(key, value, life).await
    }

    /// Resolves to the live value, or fails with a cache miss.
    async fn read(&self, key: &K) -> Result<V>;

    async fn read_or(&self, key: &K, fallback: V) -> V;

    /// Resolves to the live value for `key` if there is one. Otherwise awaits
    /// `generator`, saves its value with `life_in_seconds`, and only then
    /// resolves to it.
    ///
    /// A generator error is returned as is and nothing is saved. The
    /// generator is not awaited at all on a hit.
    async fn read_or_populate<'a>(
        &'a self,
        key: K,
        generator: BoxFuture<'a, anyhow::Result<V>>,
        life_in_seconds: i64,
    ) -> anyhow::Result<V>;

    async fn remove(&self, key: &K);

    async fn remove_all(&self);

    async fn clean_up(&self) -> usize;

    async fn cached_key_set(&self) -> HashSet<K>;
}
