// Copyright @yucwang 2026

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::core::budget::SampleBudget;
use crate::core::mapper::PartialCount;
use crate::core::pool::TaskHandle;
use crate::error::Result;
use crate::math::aabb::AABB;
use crate::math::constants::Float;

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeEstimate {
    pub total_hits: u64,
    /// Per-task sample budget; the denominator of the hit ratio.
    pub total_samples: u64,
    pub box_volume: Float,
    pub volume: Float,
    pub prism_count: usize,
    /// Carried from the input, not applied to `volume`.
    pub deg_acc: Float,
}

/// Hit ratio scaled by the volume of the sampled box.
pub fn estimate_volume(total_hits: u64, samples_per_task: u64, box_volume: Float) -> Float {
    if samples_per_task == 0 {
        return 0.0;
    }
    total_hits as Float / samples_per_task as Float * box_volume
}

/// Resolves every handle and folds the partial counts into one estimate.
/// The first failed or timed-out task aborts the reduction.
pub fn reduce(handles: Vec<TaskHandle<PartialCount>>, bounds: &AABB, budget: &SampleBudget,
              deg_acc: Float, timeout: Option<Duration>) -> Result<VolumeEstimate> {
    let prism_count = handles.len();

    let progress = ProgressBar::new(prism_count as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} prisms")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut total_hits: u64 = 0;
    for handle in handles {
        let hits = match timeout {
            Some(timeout) => handle.resolve_timeout(timeout),
            None => handle.resolve(),
        };
        let hits = match hits {
            Ok(hits) => hits,
            Err(err) => {
                progress.abandon();
                return Err(err);
            }
        };
        total_hits += hits;
        progress.inc(1);
    }
    progress.finish_and_clear();

    let total_samples = budget.samples_per_task();
    let box_volume = bounds.volume();
    let volume = estimate_volume(total_hits, total_samples, box_volume);
    log::info!("{} hits over {} prisms, box volume {:.3}, estimate {}",
               total_hits, prism_count, box_volume, volume);

    Ok(VolumeEstimate { total_hits, total_samples, box_volume, volume, prism_count, deg_acc })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pool::WorkerPool;
    use crate::error::EstimateError;
    use crate::math::constants::Vector3f;

    fn bounds() -> AABB {
        AABB::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(2.0, 2.0, 2.0))
    }

    fn fixed_handles(pool: &WorkerPool, counts: &[u64]) -> Vec<TaskHandle<PartialCount>> {
        counts.iter().enumerate()
            .map(|(task, &count)| pool.submit(task, move || Ok(count)).unwrap())
            .collect()
    }

    #[test]
    fn test_reduce_sums_counts() {
        let pool = WorkerPool::new(2).unwrap();
        let budget = SampleBudget::new(10, 100).unwrap();
        let estimate = reduce(fixed_handles(&pool, &[100, 25, 0]), &bounds(), &budget, 0.01, None).unwrap();
        assert_eq!(estimate.total_hits, 125);
        assert_eq!(estimate.total_samples, 1000);
        assert_eq!(estimate.prism_count, 3);
        assert!((estimate.box_volume - 8.0).abs() < 1e-12);
        assert!((estimate.volume - 1.0).abs() < 1e-12);
        assert_eq!(estimate.deg_acc, 0.01);
    }

    #[test]
    fn test_denominator_does_not_depend_on_prism_count() {
        let pool = WorkerPool::new(3).unwrap();
        let budget = SampleBudget::new(4, 250).unwrap();
        let one = reduce(fixed_handles(&pool, &[10]), &bounds(), &budget, 1.0, None).unwrap();
        let five = reduce(fixed_handles(&pool, &[10, 10, 10, 10, 10]), &bounds(), &budget, 1.0, None).unwrap();
        assert_eq!(one.total_samples, five.total_samples);
        assert_eq!(one.total_samples, budget.samples_per_task());
        assert!((five.volume - 5.0 * one.volume).abs() < 1e-12);
    }

    #[test]
    fn test_failed_task_is_not_counted_as_zero() {
        let pool = WorkerPool::new(2).unwrap();
        let budget = SampleBudget::new(1, 10).unwrap();
        let mut handles = fixed_handles(&pool, &[3]);
        handles.push(pool.submit(1, || Err(EstimateError::TaskFailure { task: 1, message: "bad".into() })).unwrap());
        let result = reduce(handles, &bounds(), &budget, 1.0, None);
        assert!(matches!(result, Err(EstimateError::TaskFailure { task: 1, .. })));
    }

    #[test]
    fn test_timeout_aborts_the_reduction() {
        let pool = WorkerPool::new(1).unwrap();
        let budget = SampleBudget::new(1, 10).unwrap();
        let handles = vec![pool.submit(0, || {
            std::thread::sleep(Duration::from_millis(200));
            Ok(1)
        }).unwrap()];
        let result = reduce(handles, &bounds(), &budget, 1.0, Some(Duration::from_millis(10)));
        assert!(matches!(result, Err(EstimateError::TaskTimeout { task: 0, .. })));
    }

    #[test]
    fn test_estimate_volume_formula() {
        assert_eq!(estimate_volume(0, 100, 8.0), 0.0);
        assert!((estimate_volume(50, 100, 8.0) - 4.0).abs() < 1e-12);
        assert_eq!(estimate_volume(5, 0, 8.0), 0.0);
    }
}
