//! Cache Module
//!
//! Provides in-process caching with per-entry TTL expiration through a
//! blocking and a non-blocking contract, plus a no-op implementation.

mod async_store;
mod dummy;
mod entry;
mod stats;
mod store;
mod traits;


use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

// Re-export public types
pub use async_store::AsyncTimedCache;
pub use dummy::DummyCache;
pub use entry::WrappedValue;
pub use stats::{CacheStats, StatsRecorder};
pub use store::TimedCache;
pub use traits::{AsyncCache, Cache};

// == Factories ==
/// Returns the standard map-backed cache behind the blocking contract.
pub fn create_default_instance<K, V>() -> Arc<dyn Cache<K, V>>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    Arc::new(TimedCache::new())
}

/// Returns a blocking cache that never stores anything.
pub fn dummy_instance<K, V>() -> Arc<dyn Cache<K, V>>
where
    K: Debug + 'static,
    V: 'static,
{
    Arc::new(DummyCache::new())
}

/// Returns the standard map-backed cache behind the non-blocking contract.
pub fn create_default_async_instance<K, V>() -> Arc<dyn AsyncCache<K, V>>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    Arc::new(AsyncTimedCache::new())
}

/// Returns a non-blocking cache that never stores anything.
pub fn dummy_async_instance<K, V>() -> Arc<dyn AsyncCache<K, V>>
where
    K: Debug + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    Arc::new(DummyCache::new())
}
