//! Periodic Clean-Up Task
//!
//! Background task that repeatedly sweeps expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Cache;

/// Spawns a background task that calls [`Cache::clean_up`] every `interval`.
///
/// The task loops until the returned handle is aborted or the runtime shuts
/// down; the caller owns its lifecycle.
///
/// # Example
/// ```ignore
/// let cache: Arc<dyn Cache<String, String>> = Arc::new(TimedCache::new());
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<K, V>(cache: Arc<dyn Cache<K, V>>, interval: Duration) -> JoinHandle<()>
where
    K: 'static,
    V: 'static,
{
    tokio::spawn(async move {
        info!("Starting cache clean-up task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.clean_up();
            if removed > 0 {
                debug!("Periodic clean-up removed {} expired entries", removed);
            }
        }
    })
}
