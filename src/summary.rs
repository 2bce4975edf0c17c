//! Aggregated result of a run.
//!
//! [`Summary`] is what the coordinator hands back once every worker has been
//! joined. Its `Display` implementation is the one-line report printed by the
//! binary:
//!
//! ```text
//! Final: increasing 4000 decreasing 36000 diff 32000 got 40000 expected 40000
//! ```
//!
//! The `got ... expected ...` tail is only printed for the bucketed variant.

use std::fmt::{self, Display};

use crate::config::Variant;

/// Final counts of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    pub variant: Variant,
    /// Configured thread count.
    pub threads: usize,
    /// Worker threads actually spawned.
    pub workers: usize,
    pub bucket_size: usize,
    pub iterations: u64,
    /// Starting units per bucket (or of the global counter).
    pub total: i64,
    pub total_increase: i64,
    pub total_decrease: i64,
    /// `total - (increase + decrease)` for the single-lock variants,
    /// `Σ decrease - Σ increase` for the bucketed one.
    pub diff: i64,
    /// `increase + decrease` as found at the end.
    pub observed: i64,
    /// What `observed` should be if every unit is accounted for.
    pub expected: i64,
    /// Operations performed across all workers.
    pub operations: u64,
    pub balanced_operations: u64,
    pub crossed_operations: u64,
    /// Units claimed from the work budget, for the budget variant.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub claimed: Option<u64>,
    /// Last diff seen by the diagnostic path (approximate for bucketed runs).
    pub last_diff: i64,
    /// Wall time between the first spawn and the last join.
    pub elapsed_us: u64,
}

impl Summary {
    /// Returns `true` if every unit is accounted for.
    pub fn is_conserved(&self) -> bool {
        self.observed == self.expected
    }

    /// Units by which the observed total misses the expected one.
    pub fn drift(&self) -> i64 {
        self.observed - self.expected
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Final: increasing {} decreasing {} diff {}",
            self.total_increase, self.total_decrease, self.diff
        )?;
        if self.variant == Variant::Bucketed {
            write!(f, " got {} expected {}", self.observed, self.expected)?;
        }
        Ok(())
    }
}
