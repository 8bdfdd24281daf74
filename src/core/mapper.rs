// Copyright @yucwang 2026

use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::prism::Prism;
use crate::core::rng::SampleRng;
use crate::core::sampler::PointSampler;
use crate::error::{EstimateError, Result};
use crate::math::aabb::AABB;

/// Number of sampled points one task found inside its prism.
pub type PartialCount = u64;

/// Samples drawn between two looks at the cancel flag.
const CHUNK_SIZE: u64 = 1 << 16;

/// Samples `samples` points over the global `bounds` (never the prism's own
/// extent, so every task shares one denominator) and counts those inside `prism`.
/// Stops with a `TaskFailure` once `cancelled` is set.
pub fn mapper_task(task: usize, bounds: &AABB, samples: u64, prism: &Prism, rng: SampleRng,
                   cancelled: &AtomicBool) -> Result<PartialCount>
{
    if !prism.is_well_formed() || !prism.extent().is_valid() {
        return Err(EstimateError::TaskFailure {
            task,
            message: format!("prism has no comparable extent: {:?}", prism.vertices()),
        });
    }
    if !bounds.is_finite() || !bounds.is_valid() {
        return Err(EstimateError::TaskFailure {
            task,
            message: format!("sampling bounds are not a valid box: {:?} - {:?}", bounds.p_min, bounds.p_max),
        });
    }

    let mut sampler = PointSampler::new(rng);
    let mut hits: PartialCount = 0;
    let mut remaining = samples;
    while remaining > 0 {
        if cancelled.load(Ordering::Relaxed) {
            return Err(EstimateError::TaskFailure {
                task,
                message: format!("cancelled after {} of {} samples", samples - remaining, samples),
            });
        }
        let chunk = remaining.min(CHUNK_SIZE);
        hits += sampler
            .generate(&bounds.p_min, &bounds.p_max, chunk as usize)
            .filter(|p| prism.contains(p))
            .count() as PartialCount;
        remaining -= chunk;
    }

    log::debug!("task {}: {} of {} samples inside prism", task, hits, samples);
    Ok(hits)
}
