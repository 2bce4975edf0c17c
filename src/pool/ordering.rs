//! Lock identities and the acquisition order used by transfers.
//!
//! Every lock in a [`CounterPool`](super::CounterPool) is named by a
//! [`LockSlot`]: the bucket index plus which of the bucket's two counters it
//! guards. Slots are totally ordered by index first and kind second, with
//! [`LockKind::Decrease`] before [`LockKind::Increase`] at equal index.
//!
//! A transfer always takes its two locks in ascending slot order, whichever
//! role (increment or decrement) each index plays. Since every worker climbs
//! the same order no cycle of waiters can form.
//!
//! ```text
//!   (0,D) < (0,I) < (1,D) < (1,I) < ... < (n-1,D) < (n-1,I)
//! ```

use std::fmt::{self, Display};

/// Which counter of a bucket a lock guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LockKind {
    /// The lock guarding `decrease_count`.
    Decrease,
    /// The lock guarding `increase_count`.
    Increase,
}

/// One lock of the pool.
///
/// Field order matters: the derived `Ord` compares `index` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LockSlot {
    pub index: usize,
    pub kind: LockKind,
}

impl LockSlot {
    pub const fn increase(index: usize) -> Self {
        LockSlot {
            index,
            kind: LockKind::Increase,
        }
    }

    pub const fn decrease(index: usize) -> Self {
        LockSlot {
            index,
            kind: LockKind::Decrease,
        }
    }
}

impl Display for LockSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LockKind::Decrease => write!(f, "decrease[{}]", self.index),
            LockKind::Increase => write!(f, "increase[{}]", self.index),
        }
    }
}

/// Returns `true` when the increment-side lock must be taken first.
///
/// Strict less-than: equal indices go through the decrease-first branch,
/// which is also what the slot order says for `(i, Decrease) < (i, Increase)`.
#[inline]
pub fn increment_first(increment: usize, decrement: usize) -> bool {
    increment < decrement
}

/// Observer notified immediately before each lock acquisition.
///
/// Attach one with [`CounterPool::with_observer`](super::CounterPool::with_observer)
/// to record the order in which workers request locks.
pub trait AcquireObserver: Send + Sync {
    /// Called by `worker` right before blocking on `slot`.
    fn acquiring(&self, worker: usize, slot: LockSlot);

    /// Called by `worker` once `slot` has been unlocked again.
    fn released(&self, _worker: usize, _slot: LockSlot) {}
}
