// Copyright @yucwang 2026

use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::math::constants::{Float, Vector3f};

/// Uniform points inside an axis-aligned range, each axis drawn independently.
pub struct PointSampler<R: Rng> {
    rng: R,
}

impl<R: Rng> PointSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Yields exactly `count` points with `min[i] <= p[i] <= max[i]`.
    /// An axis with `min[i] == max[i]` always yields that value.
    ///
    /// Panics if `min[i] > max[i]` or the range is not finite.
    pub fn generate<'a>(&'a mut self, min: &Vector3f, max: &Vector3f, count: usize)
        -> impl Iterator<Item = Vector3f> + 'a
    {
        let axes: [Uniform<Float>; 3] = [
            Uniform::new_inclusive(min[0], max[0]),
            Uniform::new_inclusive(min[1], max[1]),
            Uniform::new_inclusive(min[2], max[2]),
        ];
        let rng = &mut self.rng;
        (0..count).map(move |_| {
            let x = axes[0].sample(&mut *rng);
            let y = axes[1].sample(&mut *rng);
            let z = axes[2].sample(&mut *rng);
            Vector3f::new(x, y, z)
        })
    }
}
