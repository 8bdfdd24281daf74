// Copyright @yucwang 2026

use crate::error::{EstimateError, Result};

pub const DEFAULT_WORKERS: usize = 150;
pub const DEFAULT_POINTS_PER_WORKER: usize = 10_000;

/// Sampling configuration shared by the dispatcher and the reducer.
///
/// Every mapper task draws `samples_per_task()` points over the global
/// bounding box, and the reducer divides by the same number, so the two
/// cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleBudget {
    workers: usize,
    points_per_worker: usize,
}

impl Default for SampleBudget {
    fn default() -> Self {
        Self { workers: DEFAULT_WORKERS, points_per_worker: DEFAULT_POINTS_PER_WORKER }
    }
}

impl SampleBudget {
    pub fn new(workers: usize, points_per_worker: usize) -> Result<Self> {
        if workers == 0 {
            return Err(EstimateError::Validation("worker count must be at least 1".into()));
        }
        if points_per_worker == 0 {
            return Err(EstimateError::Validation("points per worker must be at least 1".into()));
        }
        Ok(Self { workers, points_per_worker })
    }

    /// Upper bound on concurrently running mapper tasks.
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn points_per_worker(&self) -> usize {
        self.points_per_worker
    }

    pub fn samples_per_task(&self) -> u64 {
        self.workers as u64 * self.points_per_worker as u64
    }
}
