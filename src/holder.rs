//! Expirable Holder Module
//!
//! A single optionally-expiring value slot, e.g. for an interrupt signal or a
//! lazily computed singleton. Unlike the cache, "absent" is a state of the
//! slot, so a holder of `Option<T>` can legitimately hold `None`.

use std::time::{Duration, Instant};

use parking_lot::RwLock;

// == Holder State ==
/// Observable state of an [`ExpirableHolder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HolderState<T> {
    /// Nothing was ever set, or the holder was cleared
    Unset,
    /// A value was set but its lifetime has ended
    Expired,
    /// A live value
    Present(T),
}

impl<T> HolderState<T> {
    /// Returns the live value, if any.
    pub fn present(self) -> Option<T> {
        match self {
            HolderState::Present(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, HolderState::Present(_))
    }
}

#[derive(Debug)]
enum Slot<T> {
    Unset,
    Expired,
    Set {
        value: T,
        deadline: Option<Instant>,
    },
}

// == Expirable Holder ==
/// Thread-safe slot holding at most one value with an optional deadline.
#[derive(Debug)]
pub struct ExpirableHolder<T> {
    slot: RwLock<Slot<T>>,
}

impl<T: Clone> ExpirableHolder<T> {
    /// Creates an unset holder.
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(Slot::Unset),
        }
    }

    /// Sets a value that never expires.
    pub fn set(&self, value: T) {
        *self.slot.write() = Slot::Set {
            value,
            deadline: None,
        };
    }

    /// Sets a value that expires after `life`.
    pub fn set_for(&self, value: T, life: Duration) {
        *self.slot.write() = Slot::Set {
            value,
            deadline: Instant::now().checked_add(life),
        };
    }

    /// Returns the holder to the unset state.
    pub fn clear(&self) {
        *self.slot.write() = Slot::Unset;
    }

    // == Get ==
    /// Returns the current state, moving an overdue value to `Expired`.
    pub fn get(&self) -> HolderState<T> {
        {
            let guard = self.slot.read();
            match &*guard {
                Slot::Unset => return HolderState::Unset,
                Slot::Expired => return HolderState::Expired,
                Slot::Set { value, deadline } => {
                    if !deadline.is_some_and(|d| Instant::now() >= d) {
                        return HolderState::Present(value.clone());
                    }
                }
            }
        }

        let mut guard = self.slot.write();
        // Re-check: a writer may have replaced the value in between
        let overdue = matches!(
            &*guard,
            Slot::Set { deadline: Some(d), .. } if Instant::now() >= *d
        );
        if overdue {
            *guard = Slot::Expired;
        }
        match &*guard {
            Slot::Set { value, .. } => HolderState::Present(value.clone()),
            Slot::Expired => HolderState::Expired,
            Slot::Unset => HolderState::Unset,
        }
    }

    /// Returns the live value, computing and storing it with `init` if the
    /// holder is unset or expired.
    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> T {
        if let HolderState::Present(value) = self.get() {
            return value;
        }

        let mut guard = self.slot.write();
        if let Slot::Set { value, deadline } = &*guard {
            if !deadline.is_some_and(|d| Instant::now() >= d) {
                return value.clone();
            }
        }
        let value = init();
        *guard = Slot::Set {
            value: value.clone(),
            deadline: None,
        };
        value
    }
}

impl<T: Clone> Default for ExpirableHolder<T> {
    fn default() -> Self {
        Self::new()
    }
}
