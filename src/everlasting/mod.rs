//! Everlasting Cache Module
//!
//! A key-value store whose entries never expire by time. Entries leave only
//! through explicit removal or a full replacement.

mod store;

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::Result;

pub use store::MapEverlastingCache;

// == Everlasting Contract ==
/// Non-expiring cache with bulk operations and atomic replacement.
pub trait EverlastingCache<K, V>: Send + Sync {
    fn save(&self, key: K, value: V);

    /// Upserts every entry of `entries`.
    fn save_all(&self, entries: HashMap<K, V>);

    /// Returns the value for `key`, or a [`CacheError::Miss`](crate::error::CacheError::Miss).
    fn read(&self, key: &K) -> Result<V>;

    fn read_or(&self, key: &K, fallback: V) -> V;

    /// Atomically replaces the value for `key` with `compute(current)`.
    ///
    /// Returning `None` removes the key. Runs while holding the key's lock,
    /// so `compute` must not call back into this cache.
    fn computed(&self, key: K, compute: &dyn Fn(Option<&V>) -> Option<V>) -> Option<V>;

    fn remove(&self, key: &K);

    fn remove_keys(&self, keys: &HashSet<K>);

    fn remove_all(&self);

    /// Swaps the whole content for `entries` in one step; no reader sees a
    /// mix of old and new entries.
    fn replace_all(&self, entries: HashMap<K, V>);

    /// Returns an owned copy of the current content.
    fn snapshot_map(&self) -> HashMap<K, V>;
}

/// Returns the standard map-backed everlasting cache.
pub fn create_default_instance<K, V>() -> Arc<dyn EverlastingCache<K, V>>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    Arc::new(MapEverlastingCache::new())
}
