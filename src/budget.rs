//! Shared countdown of remaining work.
//!
//! [`WorkBudget`] behaves as a one-slot work queue: claiming a unit is the
//! dequeue. The emptiness check and the decrement run inside one critical
//! section, so `remaining` never drops below zero and the number of
//! successful claims equals the starting budget exactly.
//!
//! # Examples
//!
//! ```rust
//! use secchi::budget::WorkBudget;
//!
//! let budget = WorkBudget::new(2);
//! assert!(budget.claim());
//! assert!(budget.claim());
//! assert!(!budget.claim());
//! assert_eq!(budget.claimed(), 2);
//! ```

use parking_lot::Mutex;

#[derive(Debug)]
struct BudgetState {
    remaining: i64,
    claimed: u64,
}

/// A bounded amount of work distributed among any number of workers.
#[derive(Debug)]
pub struct WorkBudget {
    state: Mutex<BudgetState>,
}

impl WorkBudget {
    /// Creates a budget of `units`, saturating at `i64::MAX`.
    pub fn new(units: u64) -> Self {
        WorkBudget {
            state: Mutex::new(BudgetState {
                remaining: i64::try_from(units).unwrap_or(i64::MAX),
                claimed: 0,
            }),
        }
    }

    /// Takes one unit of work. Returns `false` once the budget is exhausted.
    #[inline]
    pub fn claim(&self) -> bool {
        let mut state = self.state.lock();
        if state.remaining <= 0 {
            return false;
        }
        state.remaining -= 1;
        state.claimed += 1;
        true
    }

    /// Units not yet claimed.
    pub fn remaining(&self) -> i64 {
        self.state.lock().remaining
    }

    /// Units claimed so far across all workers.
    pub fn claimed(&self) -> u64 {
        self.state.lock().claimed
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let budget = WorkBudget::new(3);
        assert_eq!(budget.remaining(), 3);
        assert_eq!(budget.claimed(), 0);
        assert!(!budget.is_exhausted());
    }

    #[test]
    fn test_zero_budget() {
        let budget = WorkBudget::new(0);
        assert!(budget.is_exhausted());
        assert!(!budget.claim());
        assert_eq!(budget.remaining(), 0);
        assert_eq!(budget.claimed(), 0);
    }

    #[test]
    fn test_claim_until_exhausted() {
        let budget = WorkBudget::new(5);
        let mut claims = 0;
        while budget.claim() {
            claims += 1;
        }
        assert_eq!(claims, 5);
        assert_eq!(budget.remaining(), 0);
        assert!(!budget.claim());
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn test_saturates() {
        let budget = WorkBudget::new(u64::MAX);
        assert_eq!(budget.remaining(), i64::MAX);
    }

    #[test]
    fn test_multiple_threads() {
        use std::thread;

        let budget = WorkBudget::new(10_000);

        let claims: u64 = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let budget = &budget;
                    scope.spawn(move || {
                        let mut mine = 0u64;
                        while budget.claim() {
                            mine += 1;
                        }
                        mine
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(claims, 10_000);
        assert_eq!(budget.claimed(), 10_000);
        assert_eq!(budget.remaining(), 0);
    }
}
