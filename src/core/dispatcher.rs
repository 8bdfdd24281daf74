// Copyright @yucwang 2026

use std::sync::Arc;

use crate::core::budget::SampleBudget;
use crate::core::mapper::{mapper_task, PartialCount};
use crate::core::pool::{TaskHandle, WorkerPool};
use crate::core::prism::Prism;
use crate::core::rng::task_rng;
use crate::error::Result;
use crate::math::aabb::AABB;

/// Submits one mapper task per prism and returns the handles in prism order.
/// Failures stay inside the handles until they are resolved.
pub fn dispatch(pool: &WorkerPool, prisms: &Arc<Vec<Prism>>, bounds: &AABB,
                budget: &SampleBudget, seed: u64) -> Result<Vec<TaskHandle<PartialCount>>> {
    let samples = budget.samples_per_task();
    let mut handles = Vec::with_capacity(prisms.len());
    for task in 0..prisms.len() {
        let prisms = Arc::clone(prisms);
        let bounds = *bounds;
        let cancelled = pool.cancel_flag();
        let handle = pool.submit(task, move || {
            mapper_task(task, &bounds, samples, &prisms[task], task_rng(seed, task), &cancelled)
        })?;
        handles.push(handle);
    }

    log::info!("dispatched {} mapper tasks of {} samples to {} workers",
               handles.len(), samples, pool.size());
    Ok(handles)
}
