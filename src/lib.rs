//! Mini Cache - A lightweight in-process cache engine
//!
//! Provides time-bounded key-value caching with blocking and async access,
//! a non-expiring everlasting store, and a no-op cache for disabling caching.

pub mod cache;
pub mod config;
pub mod error;
pub mod everlasting;
pub mod holder;
pub mod tasks;

pub use cache::{AsyncCache, AsyncTimedCache, Cache, DummyCache, TimedCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use everlasting::{EverlastingCache, MapEverlastingCache};
pub use holder::{ExpirableHolder, HolderState};
pub use tasks::spawn_cleanup_task;
