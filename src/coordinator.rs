//! Setup, spawn, join and aggregation around the concurrent core.
//!
//! The [`Coordinator`] builds the shared state for the configured
//! [`Variant`], hands workers shared references to it through
//! [`std::thread::scope`], waits for all of them and folds their reports and
//! the final counter values into a [`Summary`].
//!
//! ```text
//!   Config ──► Coordinator::run
//!                 │ build GlobalCounter / WorkBudget / CounterPool
//!                 │ spawn worker-0 .. worker-(n-1)   (scoped, borrowing)
//!                 │ join all (any completion order)
//!                 ▼
//!              Summary
//! ```
//!
//! A spawn failure aborts the run: workers already started are still joined
//! by the scope, but no summary is produced.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tracing::{info, instrument, warn};

use crate::budget::WorkBudget;
use crate::config::{Config, Variant};
use crate::error::{Error, Result};
use crate::pool::{AcquireObserver, CounterPool, GlobalCounter, TransferKind};
use crate::summary::Summary;
use crate::worker::{Role, Worker, WorkerReport};

/// Owns a run from configuration to summary.
pub struct Coordinator {
    config: Config,
    observer: Option<Arc<dyn AcquireObserver>>,
}

impl Coordinator {
    pub fn new(config: Config) -> Self {
        Coordinator {
            config,
            observer: None,
        }
    }

    /// Attaches a lock-acquisition observer to the bucketed pool.
    ///
    /// Ignored by the single-lock variants, which have only one lock.
    pub fn with_observer(mut self, observer: Arc<dyn AcquireObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Runs every worker to completion and returns the aggregated summary.
    ///
    /// # Errors
    ///
    /// - [`Error::ResourceExhausted`] if the pool cannot be allocated.
    /// - [`Error::Spawn`] if any worker thread cannot be created.
    /// - [`Error::WorkerPanicked`] if a worker panics.
    #[instrument(skip(self), fields(variant = %self.config.variant(), threads = self.config.thread_count()))]
    pub fn run(&self) -> Result<Summary> {
        let summary = match self.config.variant() {
            Variant::SingleLock | Variant::Budget => self.run_global()?,
            Variant::Bucketed => self.run_bucketed()?,
        };

        info!(
            operations = summary.operations,
            elapsed_us = summary.elapsed_us,
            conserved = summary.is_conserved(),
            "run complete"
        );
        Ok(summary)
    }

    fn run_global(&self) -> Result<Summary> {
        let config = &self.config;
        let total = config.total();
        let threads = config.thread_count();

        let (counter, budget) = match config.variant() {
            Variant::Budget => (
                GlobalCounter::new(total).with_eager_diff(),
                Some(WorkBudget::new(config.iterations())),
            ),
            _ => (GlobalCounter::new(total), None),
        };

        let mut workers = reserve_workers(config.worker_count())?;
        for id in 0..threads {
            workers.push(match &budget {
                Some(budget) => Worker::claimer(id, &counter, budget),
                None => Worker::stepper(id, &counter, config.iterations()),
            });
        }

        let started = Instant::now();
        let reports = run_workers(workers)?;
        let elapsed_us = started.elapsed().as_micros() as u64;

        let snapshot = counter.snapshot();
        let observed = snapshot.increase + snapshot.decrease;

        Ok(Summary {
            variant: config.variant(),
            threads,
            workers: reports.len(),
            bucket_size: config.bucket_size(),
            iterations: config.iterations(),
            total,
            total_increase: snapshot.increase,
            total_decrease: snapshot.decrease,
            diff: total - observed,
            observed,
            expected: total,
            operations: reports.iter().map(|r| r.operations).sum(),
            balanced_operations: 0,
            crossed_operations: 0,
            claimed: budget.as_ref().map(WorkBudget::claimed),
            last_diff: snapshot.diff,
            elapsed_us,
        })
    }

    fn run_bucketed(&self) -> Result<Summary> {
        let config = &self.config;
        let total = config.total();
        let threads = config.thread_count();
        let operations = config.operations_per_worker();

        let mut pool = CounterPool::new(config.bucket_size(), total)?;
        if let Some(observer) = &self.observer {
            pool = pool.with_observer(Arc::clone(observer));
        }

        let mut workers = reserve_workers(config.worker_count())?;
        for id in 0..threads * 2 {
            let kind = if id < threads {
                TransferKind::Balanced
            } else {
                TransferKind::Crossed
            };
            workers.push(Worker::transfer(id, &pool, kind, operations, config.seed()));
        }

        let started = Instant::now();
        let reports = run_workers(workers)?;
        let elapsed_us = started.elapsed().as_micros() as u64;

        let (total_increase, total_decrease) = pool.totals();
        let expected = total.saturating_mul(pool.len() as i64);
        let ops_of = |kind: TransferKind| -> u64 {
            reports
                .iter()
                .filter(|r| r.role == Role::Transfer(kind))
                .map(|r| r.operations)
                .sum()
        };

        Ok(Summary {
            variant: Variant::Bucketed,
            threads,
            workers: reports.len(),
            bucket_size: pool.len(),
            iterations: config.iterations(),
            total,
            total_increase,
            total_decrease,
            diff: total_decrease - total_increase,
            observed: total_increase + total_decrease,
            expected,
            operations: reports.iter().map(|r| r.operations).sum(),
            balanced_operations: ops_of(TransferKind::Balanced),
            crossed_operations: ops_of(TransferKind::Crossed),
            claimed: None,
            last_diff: pool.last_diff(),
            elapsed_us,
        })
    }
}

/// Reserves room for `count` workers up front.
///
/// A count that overflows `usize` is reported like any other failed
/// reservation.
fn reserve_workers<'a>(count: Option<usize>) -> Result<Vec<Worker<'a>>> {
    let mut workers = Vec::new();
    workers
        .try_reserve_exact(count.unwrap_or(usize::MAX))
        .map_err(|source| Error::ResourceExhausted {
            what: "worker arguments",
            source,
        })?;
    Ok(workers)
}

/// Spawns one named thread per worker and joins them all.
///
/// Every handle is joined before any error is returned, so a panicking
/// worker never leaves siblings unjoined.
fn run_workers(workers: Vec<Worker<'_>>) -> Result<Vec<WorkerReport>> {
    info!("creating {} threads", workers.len());

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(workers.len());
        let mut spawn_error = None;

        for worker in workers {
            let id = worker.id();
            let spawned = thread::Builder::new()
                .name(format!("worker-{id}"))
                .spawn_scoped(scope, move || worker.run());
            match spawned {
                Ok(handle) => handles.push((id, handle)),
                Err(source) => {
                    warn!(worker = id, error = %source, "spawn failed, aborting run");
                    spawn_error = Some(Error::Spawn { worker: id, source });
                    break;
                }
            }
        }

        let joined: Vec<Result<WorkerReport>> = handles
            .into_iter()
            .map(|(id, handle)| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(Error::WorkerPanicked { worker: id }))
            })
            .collect();

        if let Some(err) = spawn_error {
            return Err(err);
        }
        joined.into_iter().collect()
    })
}
