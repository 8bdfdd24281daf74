// Copyright @yucwang 2021

pub mod prism_loader;
pub mod report;
