//! Run configuration.
//!
//! [`Config`] is produced once, before any shared state is built, and is
//! never mutated afterwards. Validation happens in [`Config::new`], so a
//! `Config` value in hand is always runnable.
//!
//! # Examples
//!
//! ```rust
//! use secchi::config::{Config, Variant};
//!
//! let config = Config::new(4, 1000, 10)
//!     .unwrap()
//!     .with_variant(Variant::Budget)
//!     .with_seed(7);
//!
//! assert_eq!(config.thread_count(), 4);
//! assert_eq!(config.variant(), Variant::Budget);
//! ```

use std::fmt::{self, Display};

use crate::error::ConfigError;

/// Default number of worker threads.
pub const DEFAULT_THREADS: usize = 4;

/// Default number of buckets in the pool.
pub const DEFAULT_BUCKETS: usize = 10;

/// Default number of iterations per worker.
pub const DEFAULT_ITERATIONS: u64 = 100_000;

/// Which counter layout and worker loop a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Variant {
    /// One global lock, every worker performs `iterations` steps.
    SingleLock,
    /// One global lock, workers share a countdown of `iterations` steps.
    Budget,
    /// Per-bucket locks, `2 × threads` workers performing random transfers.
    #[default]
    Bucketed,
}

impl Variant {
    /// Returns the kebab-case name used on the command line and in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::SingleLock => "single-lock",
            Variant::Budget => "budget",
            Variant::Bucketed => "bucketed",
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable run parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    thread_count: usize,
    iterations: u64,
    bucket_size: usize,
    variant: Variant,
    seed: Option<u64>,
}

impl Config {
    /// Validates and builds a configuration for the default variant.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroThreads`] or [`ConfigError::ZeroBuckets`]
    /// when the corresponding value is zero.
    pub fn new(thread_count: usize, iterations: u64, bucket_size: usize) -> Result<Self, ConfigError> {
        if thread_count == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if bucket_size == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        Ok(Config {
            thread_count,
            iterations,
            bucket_size,
            variant: Variant::default(),
            seed: None,
        })
    }

    /// Selects the counter variant, returning `self` for method chaining.
    pub const fn with_variant(self, variant: Variant) -> Self {
        Self { variant, ..self }
    }

    /// Seeds the per-worker random generators for reproducible bucket picks.
    pub const fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn bucket_size(&self) -> usize {
        self.bucket_size
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Units each bucket (or the global counter) starts with:
    /// `iterations × thread_count`, saturating at `i64::MAX`.
    pub fn total(&self) -> i64 {
        let total = (self.iterations as u128) * (self.thread_count as u128);
        i64::try_from(total).unwrap_or(i64::MAX)
    }

    /// Number of worker threads the coordinator spawns for this variant.
    ///
    /// `None` when the bucketed worker count does not fit in a `usize`.
    pub fn worker_count(&self) -> Option<usize> {
        match self.variant {
            Variant::SingleLock | Variant::Budget => Some(self.thread_count),
            Variant::Bucketed => self.thread_count.checked_mul(2),
        }
    }

    /// Operations each bucketed worker performs: the total operation count
    /// divided by the thread count.
    pub fn operations_per_worker(&self) -> u64 {
        self.total() as u64 / self.thread_count as u64
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            thread_count: DEFAULT_THREADS,
            iterations: DEFAULT_ITERATIONS,
            bucket_size: DEFAULT_BUCKETS,
            variant: Variant::default(),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.thread_count(), 4);
        assert_eq!(config.bucket_size(), 10);
        assert_eq!(config.iterations(), 100_000);
        assert_eq!(config.variant(), Variant::Bucketed);
        assert_eq!(config.seed(), None);
    }

    #[test]
    fn test_rejects_zero_threads() {
        assert_eq!(Config::new(0, 10, 10), Err(ConfigError::ZeroThreads));
    }

    #[test]
    fn test_rejects_zero_buckets() {
        assert_eq!(Config::new(4, 10, 0), Err(ConfigError::ZeroBuckets));
    }

    #[test]
    fn test_zero_iterations_is_valid() {
        let config = Config::new(1, 0, 1).unwrap();
        assert_eq!(config.total(), 0);
        assert_eq!(config.operations_per_worker(), 0);
    }

    #[test]
    fn test_total_and_workers() {
        let config = Config::new(4, 1000, 10).unwrap();
        assert_eq!(config.total(), 4000);
        assert_eq!(config.worker_count(), Some(8));
        assert_eq!(config.operations_per_worker(), 1000);

        let config = config.with_variant(Variant::SingleLock);
        assert_eq!(config.worker_count(), Some(4));
    }

    #[test]
    fn test_worker_count_overflow() {
        let config = Config::new(usize::MAX / 2 + 1, 0, 1).unwrap();
        assert_eq!(config.worker_count(), None);
        assert_eq!(
            config.with_variant(Variant::Budget).worker_count(),
            Some(usize::MAX / 2 + 1)
        );
    }

    #[test]
    fn test_total_saturates() {
        let config = Config::new(usize::MAX, u64::MAX, 1).unwrap();
        assert_eq!(config.total(), i64::MAX);
    }

    #[test]
    fn test_builders_preserve_fields() {
        let config = Config::new(2, 5, 3)
            .unwrap()
            .with_seed(42)
            .with_variant(Variant::Budget);
        assert_eq!(config.seed(), Some(42));
        assert_eq!(config.variant(), Variant::Budget);
        assert_eq!(config.bucket_size(), 3);
    }

    #[test]
    fn test_variant_names() {
        assert_eq!(Variant::SingleLock.to_string(), "single-lock");
        assert_eq!(Variant::Budget.to_string(), "budget");
        assert_eq!(Variant::Bucketed.to_string(), "bucketed");
    }
}
