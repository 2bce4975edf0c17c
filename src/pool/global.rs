//! Single-lock counter used by the `single-lock` and `budget` variants.
//!
//! All three fields live behind one mutex, so `increase + decrease == total`
//! holds at every instant an observer can see under the lock.

use std::fmt::{self, Debug};

use parking_lot::Mutex;
use tracing::debug;

#[derive(Debug, Default)]
struct Totals {
    increase: i64,
    decrease: i64,
    diff: i64,
}

/// A consistent copy of the counter's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalSnapshot {
    pub increase: i64,
    pub decrease: i64,
    pub diff: i64,
}

/// An increase/decrease pair guarded by one global lock.
pub struct GlobalCounter {
    state: Mutex<Totals>,
    total: i64,
    eager_diff: bool,
}

impl GlobalCounter {
    /// Creates a counter with `decrease = total` and `increase = 0`.
    pub fn new(total: i64) -> Self {
        GlobalCounter {
            state: Mutex::new(Totals {
                increase: 0,
                decrease: total,
                diff: 0,
            }),
            total,
            eager_diff: false,
        }
    }

    /// Stores the freshly computed diff before comparing it with the stored
    /// one, as the budget variant does.
    ///
    /// With this set the "log on change" branch in [`step`](Self::step) can
    /// never fire.
    pub fn with_eager_diff(self) -> Self {
        Self {
            eager_diff: true,
            ..self
        }
    }

    /// Units the counter started with.
    pub fn total(&self) -> i64 {
        self.total
    }

    /// Moves one unit from `decrease` to `increase` and returns the
    /// resulting `total - (decrease + increase)`.
    pub fn step(&self, worker: usize) -> i64 {
        let mut state = self.state.lock();

        state.decrease -= 1;
        state.increase += 1;

        let diff = self.total - (state.decrease + state.increase);

        if self.eager_diff {
            state.diff = diff;
        }

        if diff != state.diff {
            state.diff = diff;
            debug!(
                "Thread {worker} increasing {} decreasing {} diff {diff}",
                state.increase, state.decrease
            );
        }

        diff
    }

    /// Returns the current fields, read under the lock.
    pub fn snapshot(&self) -> GlobalSnapshot {
        let state = self.state.lock();
        GlobalSnapshot {
            increase: state.increase,
            decrease: state.decrease,
            diff: state.diff,
        }
    }
}

impl Debug for GlobalCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        write!(
            f,
            "{}{{ +{} -{} diff {} }}",
            self.total, snapshot.increase, snapshot.decrease, snapshot.diff
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let counter = GlobalCounter::new(100);
        assert_eq!(counter.total(), 100);
        assert_eq!(
            counter.snapshot(),
            GlobalSnapshot {
                increase: 0,
                decrease: 100,
                diff: 0
            }
        );
    }

    #[test]
    fn test_step() {
        let counter = GlobalCounter::new(10);
        assert_eq!(counter.step(0), 0);
        assert_eq!(counter.step(1), 0);

        let snapshot = counter.snapshot();
        assert_eq!(snapshot.increase, 2);
        assert_eq!(snapshot.decrease, 8);
        assert_eq!(snapshot.diff, 0);
    }

    #[test]
    fn test_step_past_total() {
        let counter = GlobalCounter::new(1);
        counter.step(0);
        counter.step(0);
        let snapshot = counter.snapshot();
        assert_eq!(snapshot.increase, 2);
        assert_eq!(snapshot.decrease, -1);
        assert_eq!(snapshot.increase + snapshot.decrease, 1);
    }

    #[test]
    fn test_eager_diff() {
        let counter = GlobalCounter::new(5).with_eager_diff();
        assert_eq!(counter.step(0), 0);
        assert_eq!(counter.snapshot().diff, 0);
    }

    #[test]
    fn test_debug() {
        let counter = GlobalCounter::new(3);
        counter.step(0);
        assert_eq!(format!("{:?}", counter), "3{ +1 -2 diff 0 }");
    }

    #[test]
    fn test_multiple_threads() {
        use std::thread;

        let counter = GlobalCounter::new(4 * 250);

        thread::scope(|scope| {
            for worker in 0..4 {
                let counter = &counter;
                scope.spawn(move || {
                    for _ in 0..250 {
                        assert_eq!(counter.step(worker), 0);
                    }
                });
            }
        });

        let snapshot = counter.snapshot();
        assert_eq!(snapshot.increase, 1000);
        assert_eq!(snapshot.decrease, 0);
    }
}
