//! Bucketed counter pool with per-counter locks.
//!
//! A [`CounterPool`] owns `bucket_size` [`Bucket`]s. Each bucket holds an
//! `increase` and a `decrease` counter, and each counter carries its own lock
//! ([`LockedCell`]), so two workers touching different counters never
//! contend.
//!
//! # Transfers
//!
//! [`CounterPool::transfer`] moves one unit between two (possibly equal)
//! buckets while holding exactly the two locks it mutates under:
//!
//! ```text
//!     increment < decrement          otherwise
//!     ───────────────────────        ───────────────────────
//!     lock increment side            lock decrease[decrement]
//!     lock decrease[decrement]       lock increment side
//!     decrease[decrement] -= 1       decrease[decrement] -= 1
//!     <increment side>    += 1       <increment side>    += 1
//!     release both                   release both
//! ```
//!
//! Both branches climb the [`LockSlot`] order, which is what keeps the pool
//! deadlock free for any number of workers and buckets.
//!
//! # Diagnostic snapshot
//!
//! After releasing its locks a transfer peeks at the two counters it touched,
//! without locking, and compares the difference against the pool-wide
//! `last_diff`. Both the peek and the `last_diff` update are plain relaxed
//! accesses: other workers may be mutating those counters at the same time,
//! so the logged numbers are approximate and must not be used for any
//! correctness check.
//!
//! # Examples
//!
//! ```rust
//! use secchi::pool::{CounterPool, TransferKind};
//!
//! let pool = CounterPool::new(4, 100).unwrap();
//! pool.transfer(0, 1, 3, TransferKind::Balanced).unwrap();
//!
//! let (increase, decrease) = pool.totals();
//! assert_eq!(increase, 1);
//! assert_eq!(decrease, 4 * 100 - 1);
//! ```

pub mod cell;
pub mod global;
pub mod ordering;

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crossbeam_utils::CachePadded;
use tracing::debug;

use crate::error::{Error, Result};

pub use cell::{CellGuard, LockedCell};
pub use global::{GlobalCounter, GlobalSnapshot};
pub use ordering::{increment_first, AcquireObserver, LockKind, LockSlot};

/// Which counter a transfer increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TransferKind {
    /// `decrease[dec] -= 1`, `increase[inc] += 1`.
    ///
    /// Σ increase + Σ decrease is preserved and every operation shows up in
    /// Σ increase.
    Balanced,
    /// `decrease[dec] -= 1`, `decrease[inc] += 1`.
    ///
    /// Units only move between `decrease` counters: the grand total is still
    /// preserved but Σ increase does not account for these operations.
    Crossed,
}

impl TransferKind {
    /// Lock guarding the counter this kind increments in bucket `index`.
    #[inline]
    pub fn increment_slot(&self, index: usize) -> LockSlot {
        match self {
            TransferKind::Balanced => LockSlot::increase(index),
            TransferKind::Crossed => LockSlot::decrease(index),
        }
    }
}

/// One slot of the pool: an increase/decrease pair, each with its own lock.
///
/// Counters are cache padded so that neighbouring buckets do not share a
/// cache line.
pub struct Bucket {
    increase: CachePadded<LockedCell>,
    decrease: CachePadded<LockedCell>,
}

impl Bucket {
    fn new(total: i64) -> Self {
        Bucket {
            increase: CachePadded::new(LockedCell::new(0)),
            decrease: CachePadded::new(LockedCell::new(total)),
        }
    }

    /// The `increase` counter of this bucket.
    pub fn increase(&self) -> &LockedCell {
        &self.increase
    }

    /// The `decrease` counter of this bucket.
    pub fn decrease(&self) -> &LockedCell {
        &self.decrease
    }

    fn cell(&self, kind: LockKind) -> &LockedCell {
        match kind {
            LockKind::Increase => &self.increase,
            LockKind::Decrease => &self.decrease,
        }
    }
}

impl Debug for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(+{:?} -{:?})", self.increase, self.decrease)
    }
}

/// The shared pool mutated by bucketed workers.
pub struct CounterPool {
    buckets: Vec<Bucket>,
    total: i64,
    last_diff: AtomicI64,
    observer: Option<Arc<dyn AcquireObserver>>,
}

impl CounterPool {
    /// Allocates `bucket_size` buckets, each starting with `decrease = total`
    /// and `increase = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceExhausted`] if the bucket storage cannot be
    /// allocated.
    pub fn new(bucket_size: usize, total: i64) -> Result<Self> {
        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(bucket_size)
            .map_err(|source| Error::ResourceExhausted {
                what: "bucket storage",
                source,
            })?;
        buckets.extend((0..bucket_size).map(|_| Bucket::new(total)));

        Ok(CounterPool {
            buckets,
            total,
            last_diff: AtomicI64::new(0),
            observer: None,
        })
    }

    /// Attaches an observer notified before every lock acquisition.
    pub fn with_observer(mut self, observer: Arc<dyn AcquireObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Units each bucket's `decrease` counter started with.
    pub fn total(&self) -> i64 {
        self.total
    }

    /// The most recently logged divergence. Approximate while workers run.
    pub fn last_diff(&self) -> i64 {
        self.last_diff.load(Ordering::Relaxed)
    }

    /// Returns the bucket at `index`, if any.
    pub fn bucket(&self, index: usize) -> Option<&Bucket> {
        self.buckets.get(index)
    }

    /// Returns the counter guarded by `slot`, if the index is in range.
    pub fn cell(&self, slot: LockSlot) -> Option<&LockedCell> {
        self.buckets.get(slot.index).map(|bucket| bucket.cell(slot.kind))
    }

    /// Moves one unit out of `decrease[decrement]` and into the counter
    /// selected by `kind` in bucket `increment`.
    ///
    /// `worker` only identifies the caller in observer callbacks and
    /// diagnostic lines.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BucketOutOfRange`] if either index is not a bucket of
    /// this pool. Nothing is locked or mutated in that case.
    pub fn transfer(
        &self,
        worker: usize,
        increment: usize,
        decrement: usize,
        kind: TransferKind,
    ) -> Result<()> {
        let size = self.buckets.len();
        for index in [increment, decrement] {
            if index >= size {
                return Err(Error::BucketOutOfRange { index, size });
            }
        }

        let inc_slot = kind.increment_slot(increment);
        let dec_slot = LockSlot::decrease(decrement);
        let inc_cell = self.buckets[increment].cell(inc_slot.kind);
        let dec_cell = &*self.buckets[decrement].decrease;

        if inc_slot == dec_slot {
            // crossed transfer onto itself: one lock, net zero
            self.notify(worker, dec_slot);
            let mut guard = dec_cell.lock();
            guard.sub(1);
            guard.add(1);
        } else {
            let (mut inc_guard, mut dec_guard) = if increment_first(increment, decrement) {
                self.notify(worker, inc_slot);
                let inc_guard = inc_cell.lock();
                self.notify(worker, dec_slot);
                (inc_guard, dec_cell.lock())
            } else {
                self.notify(worker, dec_slot);
                let dec_guard = dec_cell.lock();
                self.notify(worker, inc_slot);
                (inc_cell.lock(), dec_guard)
            };
            dec_guard.sub(1);
            inc_guard.add(1);
        }

        if let Some(observer) = &self.observer {
            observer.released(worker, dec_slot);
            if inc_slot != dec_slot {
                observer.released(worker, inc_slot);
            }
        }

        self.observe_diff(worker, increment, decrement);
        Ok(())
    }

    /// Unlocked read of `decrease[decrement] - increase[increment]`, logged
    /// when it differs from the last observed value.
    ///
    /// The compare and the store are not atomic together; two workers may
    /// both log, or one update may be lost. That is acceptable for a value
    /// that exists only to be printed.
    fn observe_diff(&self, worker: usize, increment: usize, decrement: usize) {
        let increase = self.buckets[increment].increase.peek();
        let decrease = self.buckets[decrement].decrease.peek();
        let diff = decrease.wrapping_sub(increase);

        if diff != self.last_diff.load(Ordering::Relaxed) {
            self.last_diff.store(diff, Ordering::Relaxed);
            debug!("Thread {worker} increasing {increase} decreasing {decrease} diff {diff}");
        }
    }

    #[inline]
    fn notify(&self, worker: usize, slot: LockSlot) {
        if let Some(observer) = &self.observer {
            observer.acquiring(worker, slot);
        }
    }

    /// Sums `increase` and `decrease` across all buckets.
    ///
    /// Exact only once no transfer is in flight.
    pub fn totals(&self) -> (i64, i64) {
        self.buckets.iter().fold((0, 0), |(inc, dec), bucket| {
            (inc + bucket.increase.peek(), dec + bucket.decrease.peek())
        })
    }
}

impl Debug for CounterPool {
    /// Formats the pool as `total{ [i]:(+inc -dec) ... }`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.total)?;
        for (i, bucket) in self.buckets.iter().enumerate() {
            write!(f, " [{i}]:{bucket:?}")?;
        }
        write!(f, " }}")
    }
}
