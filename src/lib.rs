// Copyright @yucwang 2021

pub extern crate nalgebra as na;

pub mod app;
pub mod core;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;

pub use crate::core::budget::SampleBudget;
pub use crate::core::estimator::{Estimation, Estimator, EstimatorConfig};
pub use crate::core::prism::Prism;
pub use crate::core::reducer::VolumeEstimate;
pub use crate::error::EstimateError;
pub use crate::math::aabb::AABB;
