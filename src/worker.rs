//! Per-thread work loops.
//!
//! A [`Worker`] owns its task-local data (its id, its random generator) and
//! borrows the shared state it mutates. The coordinator moves each worker
//! into its own scoped thread and calls [`Worker::run`].

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::budget::WorkBudget;
use crate::error::Result;
use crate::pool::{CounterPool, GlobalCounter, TransferKind};

/// What a worker did, as reported back to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Fixed number of steps against the global counter.
    Stepper,
    /// Steps against the global counter, one per claimed budget unit.
    Claimer,
    /// Random transfers against the bucketed pool.
    Transfer(TransferKind),
}

/// Outcome of one worker's run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    pub role: Role,
    pub operations: u64,
}

enum Task<'a> {
    Stepper {
        counter: &'a GlobalCounter,
        iterations: u64,
    },
    Claimer {
        counter: &'a GlobalCounter,
        budget: &'a WorkBudget,
    },
    Transfer {
        pool: &'a CounterPool,
        kind: TransferKind,
        operations: u64,
        rng: SmallRng,
    },
}

/// The unit of parallel execution.
pub struct Worker<'a> {
    id: usize,
    task: Task<'a>,
}

impl<'a> Worker<'a> {
    /// A worker performing `iterations` single-lock steps.
    pub fn stepper(id: usize, counter: &'a GlobalCounter, iterations: u64) -> Self {
        Worker {
            id,
            task: Task::Stepper {
                counter,
                iterations,
            },
        }
    }

    /// A worker stepping once per unit it claims from `budget`.
    pub fn claimer(id: usize, counter: &'a GlobalCounter, budget: &'a WorkBudget) -> Self {
        Worker {
            id,
            task: Task::Claimer { counter, budget },
        }
    }

    /// A worker performing `operations` transfers between random buckets.
    ///
    /// With a `seed` the bucket picks are reproducible: worker `id` uses
    /// `seed + id`. Without one the generator is seeded from the thread RNG.
    pub fn transfer(
        id: usize,
        pool: &'a CounterPool,
        kind: TransferKind,
        operations: u64,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(id as u64)),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        Worker {
            id,
            task: Task::Transfer {
                pool,
                kind,
                operations,
                rng,
            },
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Runs the loop to completion.
    pub fn run(self) -> Result<WorkerReport> {
        let id = self.id;
        match self.task {
            Task::Stepper {
                counter,
                iterations,
            } => {
                for _ in 0..iterations {
                    counter.step(id);
                }
                Ok(WorkerReport {
                    id,
                    role: Role::Stepper,
                    operations: iterations,
                })
            }
            Task::Claimer { counter, budget } => {
                let mut operations = 0;
                while budget.claim() {
                    counter.step(id);
                    operations += 1;
                }
                Ok(WorkerReport {
                    id,
                    role: Role::Claimer,
                    operations,
                })
            }
            Task::Transfer {
                pool,
                kind,
                operations,
                mut rng,
            } => {
                let size = pool.len();
                for _ in 0..operations {
                    let increment = rng.random_range(0..size);
                    let decrement = rng.random_range(0..size);
                    pool.transfer(id, increment, decrement, kind)?;
                }
                Ok(WorkerReport {
                    id,
                    role: Role::Transfer(kind),
                    operations,
                })
            }
        }
    }
}
