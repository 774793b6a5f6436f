//! Everlasting Store Module
//!
//! Default [`EverlastingCache`]: a `DashMap` behind a swappable outer lock.

use std::collections::{HashMap, HashSet};
use std::fmt::{self, Debug};
use std::hash::Hash;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{CacheError, Result};
use crate::everlasting::EverlastingCache;

// == Map Everlasting Cache ==
/// Map-backed everlasting cache.
///
/// Per-key operations share the outer lock and rely on the map's shard
/// locks; only [`EverlastingCache::replace_all`] takes the outer lock
/// exclusively.
pub struct MapEverlastingCache<K, V> {
    entries: RwLock<DashMap<K, V>>,
}

impl<K, V> MapEverlastingCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(DashMap::new()),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<K, V> Default for MapEverlastingCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for MapEverlastingCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl<K: Eq + Hash, V> Debug for MapEverlastingCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapEverlastingCache")
            .field("entries", &self.entries.read().len())
            .finish()
    }
}

impl<K, V> EverlastingCache<K, V> for MapEverlastingCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn save(&self, key: K, value: V) {
        self.entries.read().insert(key, value);
    }

    fn save_all(&self, entries: HashMap<K, V>) {
        let map = self.entries.read();
        for (key, value) in entries {
            map.insert(key, value);
        }
    }

    fn read(&self, key: &K) -> Result<V> {
        self.entries
            .read()
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| CacheError::miss(key))
    }

    fn read_or(&self, key: &K, fallback: V) -> V {
        self.entries
            .read()
            .get(key)
            .map(|entry| entry.value().clone())
            .unwrap_or(fallback)
    }

    // == Computed ==
    fn computed(&self, key: K, compute: &dyn Fn(Option<&V>) -> Option<V>) -> Option<V> {
        let map = self.entries.read();
        // The entry holds the shard write lock until it is dropped
        let computed = match map.entry(key) {
            Entry::Occupied(mut occupied) => match compute(Some(occupied.get())) {
                Some(value) => {
                    occupied.insert(value.clone());
                    Some(value)
                }
                None => {
                    debug!("Computed removal of key: {:?}", occupied.key());
                    occupied.remove();
                    None
                }
            },
            Entry::Vacant(vacant) => match compute(None) {
                Some(value) => {
                    vacant.insert(value.clone());
                    Some(value)
                }
                None => None,
            },
        };
        computed
    }

    fn remove(&self, key: &K) {
        if self.entries.read().remove(key).is_some() {
            debug!("Removed everlasting entry: {:?}", key);
        }
    }

    fn remove_keys(&self, keys: &HashSet<K>) {
        let map = self.entries.read();
        for key in keys {
            map.remove(key);
        }
    }

    fn remove_all(&self) {
        let map = self.entries.read();
        let count = map.len();
        map.clear();
        info!("Cleared {} everlasting entries", count);
    }

    // == Replace All ==
    fn replace_all(&self, entries: HashMap<K, V>) {
        let fresh: DashMap<K, V> = entries.into_iter().collect();
        let count = fresh.len();
        let previous = std::mem::replace(&mut *self.entries.write(), fresh);
        info!(
            "Replaced {} everlasting entries with {} new entries",
            previous.len(),
            count
        );
    }

    fn snapshot_map(&self) -> HashMap<K, V> {
        self.entries
            .read()
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}
