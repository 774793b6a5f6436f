//! Error types for the cache engine
//!
//! Provides the Cache-Miss signal using thiserror.

use std::fmt::Debug;

use thiserror::Error;

// == Cache Error Enum ==
/// Error type for cache reads that require a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// No live value is associated with the requested key
    #[error("Cache miss for key: {0}")]
    Miss(String),
}

impl CacheError {
    /// Builds a miss carrying the `Debug` rendering of the key.
    pub fn miss<K: Debug + ?Sized>(key: &K) -> Self {
        CacheError::Miss(format!("{:?}", key))
    }

    /// Returns true if this error is a cache miss.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::Miss(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache reads.
pub type Result<T> = std::result::Result<T, CacheError>;
