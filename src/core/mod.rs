// Copyright @yucwang 2021

pub mod budget;
pub mod dispatcher;
pub mod estimator;
pub mod mapper;
pub mod pool;
pub mod prism;
pub mod reducer;
pub mod rng;
pub mod sampler;
