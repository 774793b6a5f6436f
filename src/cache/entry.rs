//! Wrapped Value Module
//!
//! Binds a cached value to a deadline and guards it with a per-entry lock.

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::trace;

// == Wrapped Value ==
/// A value bound to an optional deadline.
///
/// Once a read observes the value as absent (deadline crossed or released),
/// the inner value is dropped and the wrapper never reports it again.
pub struct WrappedValue<V> {
    /// The stored value, `None` once expired or released
    value: RwLock<Option<V>>,
    /// Creation instant
    created_at: Instant,
    /// Expiration instant, None = no deadline
    deadline: Option<Instant>,
}

impl<V> WrappedValue<V> {
    // == Constructor ==
    /// Creates a new wrapper around `value`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `life_in_seconds` - Lifetime; zero or negative means no deadline
    pub fn new(value: V, life_in_seconds: i64) -> Self {
        let created_at = Instant::now();
        let deadline = u64::try_from(life_in_seconds)
            .ok()
            .filter(|secs| *secs > 0)
            .and_then(|secs| created_at.checked_add(Duration::from_secs(secs)));

        Self {
            value: RwLock::new(Some(value)),
            created_at,
            deadline,
        }
    }

    // == Is Past Deadline ==
    /// Boundary condition: the value is live in `[created_at, deadline)`, so
    /// it is expired as soon as the current instant reaches the deadline.
    fn is_past_deadline(&self) -> bool {
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    // == Is Available ==
    /// Returns true if a read would currently yield the value.
    pub fn is_available(&self) -> bool {
        {
            let guard = self.value.read();
            match guard.as_ref() {
                None => return false,
                Some(_) if !self.is_past_deadline() => return true,
                Some(_) => {}
            }
        }
        self.release();
        false
    }

    // == Release ==
    /// Moves the wrapper to absent and drops the inner value. Idempotent.
    pub fn release(&self) {
        let mut guard = self.value.write();
        if guard.take().is_some() {
            trace!("Wrapped value released");
        }
    }

    // == Remaining Lifetime ==
    /// Returns the time left before the deadline.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the deadline has passed
    /// - `Some(remaining)` if the deadline is still ahead
    /// - `None` if the value has no deadline (unbounded)
    pub fn remaining_lifetime(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns the instant the wrapper was created.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Returns the deadline, or None if the value never expires under the clock.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl<V: Clone> WrappedValue<V> {
    // == Read ==
    /// Returns a clone of the value if it is still live.
    ///
    /// The liveness check runs under the shared lock; the transition to
    /// absent takes the exclusive lock only after the shared one is dropped.
    pub fn read(&self) -> Option<V> {
        {
            let guard = self.value.read();
            match guard.as_ref() {
                None => return None,
                Some(value) if !self.is_past_deadline() => return Some(value.clone()),
                Some(_) => {}
            }
        }
        self.release();
        None
    }
}

impl<V> fmt::Debug for WrappedValue<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WrappedValue")
            .field("present", &self.value.read().is_some())
            .field("created_at", &self.created_at)
            .field("deadline", &self.deadline)
            .finish()
    }
}
