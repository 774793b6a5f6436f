//! Background Tasks Module
//!
//! Helpers for the caller-owned periodic work around a cache.
//!
//! # Tasks
//! - Clean-up: sweeps expired cache entries at a fixed interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
