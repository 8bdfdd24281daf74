// Copyright @yucwang 2026

use std::sync::Arc;
use std::time::Duration;

use crate::core::budget::SampleBudget;
use crate::core::dispatcher::dispatch;
use crate::core::pool::WorkerPool;
use crate::core::prism::{bounding_box, Prism};
use crate::core::reducer::{reduce, VolumeEstimate};
use crate::error::{EstimateError, Result};
use crate::math::aabb::AABB;
use crate::math::constants::Float;

#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorConfig {
    pub budget: SampleBudget,
    pub seed: u64,
    /// Per-task limit applied while resolving; `None` waits indefinitely.
    pub task_timeout: Option<Duration>,
    /// Sampling box to use instead of the one spanned by the prisms.
    pub bounds_override: Option<AABB>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self { budget: SampleBudget::default(), seed: 0, task_timeout: None, bounds_override: None }
    }
}

/// Everything a caller needs after a successful run.
pub struct Estimation {
    pub bounds: AABB,
    pub prisms: Arc<Vec<Prism>>,
    pub estimate: VolumeEstimate,
}

pub struct Estimator {
    config: EstimatorConfig,
}

impl Estimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn sampling_bounds(&self, prisms: &[Prism]) -> Result<AABB> {
        let bounds = match self.config.bounds_override {
            Some(bounds) => bounds,
            None => bounding_box(prisms)
                .ok_or_else(|| EstimateError::Validation("input describes no prisms".into()))?,
        };
        if !bounds.is_finite() || !bounds.is_valid() {
            return Err(EstimateError::Validation(format!(
                "bounding box is not valid: {:?} - {:?}", bounds.p_min, bounds.p_max)));
        }
        Ok(bounds)
    }

    /// Starts a pool, runs one mapper per prism and reduces the counts. The
    /// pool is released on return, failed runs included.
    pub fn estimate(&self, prisms: Vec<Prism>, deg_acc: Float) -> Result<Estimation> {
        if !deg_acc.is_finite() || deg_acc <= 0.0 {
            log::warn!("degree of accuracy {} is not a positive number; it is not applied", deg_acc);
        }

        let bounds = self.sampling_bounds(&prisms)?;
        let prisms = Arc::new(prisms);
        let budget = self.config.budget;

        let pool = WorkerPool::new(budget.workers().min(prisms.len().max(1)))?;
        let handles = dispatch(&pool, &prisms, &bounds, &budget, self.config.seed)?;
        let estimate = reduce(handles, &bounds, &budget, deg_acc, self.config.task_timeout)?;
        pool.shutdown();

        Ok(Estimation { bounds, prisms, estimate })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector3f;

    fn unit_prism() -> Prism {
        Prism::from_corners(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(1.0, 1.0, 1.0))
    }

    fn config(workers: usize, points: usize) -> EstimatorConfig {
        EstimatorConfig {
            budget: SampleBudget::new(workers, points).unwrap(),
            seed: 17,
            task_timeout: None,
            bounds_override: Some(AABB::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(2.0, 2.0, 2.0))),
        }
    }

    #[test]
    fn test_unit_cube_in_forced_box() {
        let estimator = Estimator::new(config(4, 50_000));
        let result = estimator.estimate(vec![unit_prism()], 0.01).unwrap();
        assert!((result.estimate.box_volume - 8.0).abs() < 1e-12);
        assert_eq!(result.estimate.total_samples, 200_000);
        assert!((result.estimate.volume - 1.0).abs() < 0.05, "volume = {}", result.estimate.volume);
    }

    #[test]
    fn test_error_shrinks_with_budget() {
        // mean absolute error over several seeds, small vs. large budget
        let mean_error = |points: usize| -> Float {
            let seeds = 8;
            let total: Float = (0..seeds)
                .map(|seed| {
                    let mut cfg = config(1, points);
                    cfg.seed = seed;
                    let result = Estimator::new(cfg).estimate(vec![unit_prism()], 1.0).unwrap();
                    (result.estimate.volume - 1.0).abs()
                })
                .sum();
            total / seeds as Float
        };
        let small = mean_error(200);
        let large = mean_error(200_000);
        assert!(large < small, "small budget error {}, large budget error {}", small, large);
        assert!(large < 0.03);
    }

    #[test]
    fn test_box_from_prisms_when_not_forced() {
        let mut cfg = config(2, 1000);
        cfg.bounds_override = None;
        let prisms = vec![
            unit_prism(),
            Prism::from_corners(Vector3f::new(1.0, 1.0, 1.0), Vector3f::new(3.0, 2.0, 2.0)),
        ];
        let result = Estimator::new(cfg).estimate(prisms, 1.0).unwrap();
        assert_eq!(result.bounds.p_min, Vector3f::new(0.0, 0.0, 0.0));
        assert_eq!(result.bounds.p_max, Vector3f::new(3.0, 2.0, 2.0));
        assert!((result.estimate.box_volume - 12.0).abs() < 1e-12);
        assert_eq!(result.prisms.len(), 2);
    }

    #[test]
    fn test_overlaps_are_counted_per_prism() {
        let estimator = Estimator::new(config(2, 20_000));
        let single = estimator.estimate(vec![unit_prism()], 1.0).unwrap().estimate;
        let doubled = estimator.estimate(vec![unit_prism(), unit_prism()], 1.0).unwrap().estimate;
        assert!((doubled.volume - 2.0 * single.volume).abs() < 0.1);
        assert_eq!(single.total_samples, doubled.total_samples);
    }

    #[test]
    fn test_no_prisms_without_override_is_rejected() {
        let mut cfg = config(2, 10);
        cfg.bounds_override = None;
        assert!(matches!(Estimator::new(cfg).estimate(Vec::new(), 1.0), Err(EstimateError::Validation(_))));
    }

    #[test]
    fn test_timeout_returns_without_waiting_for_running_tasks() {
        // a budget this size takes far longer than the assertion allows
        let mut cfg = config(1, 2_000_000_000);
        cfg.task_timeout = Some(Duration::from_millis(20));
        let start = std::time::Instant::now();
        let result = Estimator::new(cfg).estimate(vec![unit_prism(), unit_prism()], 1.0);
        assert!(matches!(result, Err(EstimateError::TaskTimeout { task: 0, .. })));
        assert!(start.elapsed() < Duration::from_secs(5), "took {:?}", start.elapsed());
    }

    #[test]
    fn test_malformed_prism_fails_the_run() {
        let prisms = vec![
            unit_prism(),
            Prism::from_corners(Vector3f::new(std::f64::NAN, 0.0, 0.0), Vector3f::new(1.0, 1.0, 1.0)),
        ];
        let result = Estimator::new(config(2, 100)).estimate(prisms, 1.0);
        assert!(matches!(result, Err(EstimateError::TaskFailure { task: 1, .. })));
    }
}
