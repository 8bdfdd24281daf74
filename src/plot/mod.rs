// Copyright @yucwang 2026

pub mod png;

use crate::core::prism::Prism;
use crate::error::Result;
use crate::math::aabb::AABB;

pub use png::PngPlotter;

/// Presentation-only consumer of a finished run.
pub trait Visualizer {
    fn visualize(&mut self, bounds: &AABB, prisms: &[Prism]) -> Result<()>;
}
