//! Configuration Module
//!
//! Handles loading cache engine configuration from environment variables.

use std::env;
use std::time::Duration;

/// Cache engine configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Default lifetime in seconds for entries saved without an explicit TTL.
    /// Zero or negative means such entries never expire.
    pub default_life_in_seconds: i64,
    /// Interval in milliseconds between periodic clean-up runs
    pub cleanup_interval_ms: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DEFAULT_LIFE_SECONDS` - Default entry lifetime (default: 0, never expire)
    /// - `CACHE_CLEANUP_INTERVAL_MS` - Clean-up frequency in milliseconds (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_life_in_seconds: env::var("CACHE_DEFAULT_LIFE_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_life_in_seconds),
            cleanup_interval_ms: env::var("CACHE_CLEANUP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval_ms),
        }
    }

    /// Returns the clean-up interval as a Duration.
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_millis(self.cleanup_interval_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_life_in_seconds: 0,
            cleanup_interval_ms: 1000,
        }
    }
}
