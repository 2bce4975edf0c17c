//! A single counter bundled with the lock that guards it.
//!
//! [`LockedCell`] stores its value in an `AtomicI64` so that an unlocked,
//! best-effort [`peek`](LockedCell::peek) is well defined, but the only way
//! to *change* the value is through a [`CellGuard`], which holds the cell's
//! mutex for its whole lifetime.
//!
//! All atomic accesses use `Ordering::Relaxed`: mutations are already
//! ordered by the mutex, and peeks are diagnostic only.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::{Mutex, MutexGuard};

/// An `i64` counter whose mutations require holding its lock.
pub struct LockedCell {
    value: AtomicI64,
    lock: Mutex<()>,
}

impl LockedCell {
    /// Creates a cell holding `value`.
    pub fn new(value: i64) -> Self {
        LockedCell {
            value: AtomicI64::new(value),
            lock: Mutex::new(()),
        }
    }

    /// Blocks until the cell's lock is available and returns a guard that
    /// allows mutation.
    #[inline]
    pub fn lock(&self) -> CellGuard<'_> {
        CellGuard {
            value: &self.value,
            _held: self.lock.lock(),
        }
    }

    /// Reads the value without taking the lock.
    ///
    /// The result is a point-in-time snapshot that may already be stale when
    /// returned. Use it for diagnostics only.
    #[inline]
    pub fn peek(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Returns `true` if the lock is currently held by someone.
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }
}

impl Debug for LockedCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.peek())?;
        if self.is_locked() {
            write!(f, "*")?;
        }
        Ok(())
    }
}

/// Exclusive access to a [`LockedCell`]; the lock is released on drop.
pub struct CellGuard<'a> {
    value: &'a AtomicI64,
    _held: MutexGuard<'a, ()>,
}

impl CellGuard<'_> {
    /// Adds `delta` (may be negative) to the guarded value.
    #[inline]
    pub fn add(&mut self, delta: i64) {
        let current = self.value.load(Ordering::Relaxed);
        self.value.store(current.wrapping_add(delta), Ordering::Relaxed);
    }

    /// Subtracts `delta` from the guarded value.
    #[inline]
    pub fn sub(&mut self, delta: i64) {
        self.add(delta.wrapping_neg());
    }

    /// Returns the guarded value.
    #[inline]
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}
