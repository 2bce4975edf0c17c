//! # Secchi - Bucketed Counters Under Ordered Locking
//!
//! A small, faithful model of contended shared-state updates: a pool of
//! counter buckets mutated by many worker threads, each operation taking two
//! independent locks without ever risking a circular wait.
//!
//! ## The Problem
//!
//! A single lock around every counter is trivially correct but serializes
//! all workers. Splitting the state into buckets, each with its own locks,
//! lets unrelated updates run in parallel, but an operation that touches two
//! buckets now needs two locks, and two workers taking the same pair in
//! opposite order deadlock.
//!
//! ## The Solution: One Global Acquisition Order
//!
//! Every lock in the pool has a position in a single total order
//! ([`pool::LockSlot`]): bucket index first, `decrease` before `increase` at
//! equal index. A transfer always takes the lower slot first, whichever role
//! (increment or decrement) that bucket plays. With every worker climbing the
//! same order, no cycle of waiters can form.
//!
//! ```text
//!   worker A: transfer(inc=1, dec=4)     worker B: transfer(inc=4, dec=1)
//!             lock increase[1]                     lock decrease[1]
//!             lock decrease[4]                     lock increase[4]
//!                      └──── both climb the same order ────┘
//! ```
//!
//! ## Variants
//!
//! | Variant | Shared state | Workers | Invariant |
//! |---------|--------------|---------|-----------|
//! | [`SingleLock`](config::Variant::SingleLock) | [`GlobalCounter`](pool::GlobalCounter) | `threads` × `iterations` steps | `increase + decrease == total` at every instant |
//! | [`Budget`](config::Variant::Budget) | `GlobalCounter` + [`WorkBudget`](budget::WorkBudget) | `threads`, `iterations` steps shared | same, and exactly `iterations` claims |
//! | [`Bucketed`](config::Variant::Bucketed) | [`CounterPool`](pool::CounterPool) | `2 × threads` random transfers | `Σ increase + Σ decrease == total × buckets` after the join |
//!
//! In the bucketed variant the first half of the workers perform
//! [`Balanced`](pool::TransferKind::Balanced) transfers and the second half
//! [`Crossed`](pool::TransferKind::Crossed) ones, which move units between
//! `decrease` counters only.
//!
//! ## Quick Start
//!
//! ```rust
//! use secchi::config::Config;
//! use secchi::coordinator::Coordinator;
//!
//! let config = Config::new(4, 1000, 10).unwrap();
//! let summary = Coordinator::new(config).run().unwrap();
//!
//! assert!(summary.is_conserved());
//! println!("{summary}");
//! ```
//!
//! ## Diagnostics
//!
//! Workers log `Thread <id> increasing <inc> decreasing <dec> diff <diff>`
//! through `tracing` at `debug` level whenever the observed difference
//! changes. In the bucketed pool that observation is an unlocked snapshot
//! and is approximate by nature.
//!
//! ## Feature Flags
//!
//! | Feature | Module | Description |
//! |---------|--------|-------------|
//! | `table` | [`report::table`] | Render the summary as a table, in one of several styles |
//! | `json` | [`report::json`] | Serialize the summary to JSON |
//! | `serde` | - | `Serialize`/`Deserialize` on summary types |

pub mod budget;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod logging;
pub mod pool;
pub mod report;
pub mod summary;
pub mod worker;

pub use error::{ConfigError, Error, Result};
