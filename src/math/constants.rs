/* Copyright 2020 @Yuchen Wong */

pub type Float = f64;

pub type Vector2f = nalgebra::Vector2<Float>;
pub type Vector3f = nalgebra::Vector3<Float>;
pub type Matrix3f = nalgebra::Matrix3<Float>;

pub const EPSILON: Float = 1e-9;
pub const PI: Float = std::f64::consts::PI;
