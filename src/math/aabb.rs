// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Vector3f };

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABB {
    pub p_min: Vector3f,
    pub p_max: Vector3f
}

impl Default for AABB {
    fn default() -> Self {
        Self { p_min: Vector3f::new(Float::MAX, Float::MAX, Float::MAX),
               p_max: Vector3f::new(Float::MIN, Float::MIN, Float::MIN) }
    }
}

impl AABB {
    pub fn new(p_min: Vector3f, p_max: Vector3f) -> Self {
        let mut min = Vector3f::new(0.0, 0.0, 0.0);
        let mut max = Vector3f::new(0.0, 0.0, 0.0);
        for idx in 0..3 {
            min[idx] = p_min[idx].min(p_max[idx]);
            max[idx] = p_max[idx].max(p_min[idx]);
        }
        Self { p_min: min, p_max: max }
    }

    /// Smallest box holding every point, `None` for an empty iterator.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Vector3f>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = Self { p_min: *first, p_max: *first };
        for p in iter {
            bbox.expand_by_point(p);
        }
        Some(bbox)
    }

    pub fn center(&self) -> Vector3f {
        0.5 * self.p_min + 0.5 * self.p_max
    }

    pub fn expand_by_point(&mut self, p: &Vector3f) {
        for idx in 0..3 {
            self.p_min[idx] = self.p_min[idx].min(p[idx]);
            self.p_max[idx] = self.p_max[idx].max(p[idx]);
        }
    }

    pub fn expand_by_aabb(&mut self, other: &AABB) {
        for idx in 0..3 {
            self.p_min[idx] = self.p_min[idx].min(other.p_min[idx]);
            self.p_max[idx] = self.p_max[idx].max(other.p_max[idx]);
        }
    }

    /// Inclusive on both faces of every axis.
    pub fn contains_point(&self, p: &Vector3f) -> bool {
        (0..3).all(|idx| self.p_min[idx] <= p[idx] && p[idx] <= self.p_max[idx])
    }

    pub fn volume(&self) -> Float {
        let a = self.p_max[0] - self.p_min[0];
        let b = self.p_max[1] - self.p_min[1];
        let c = self.p_max[2] - self.p_min[2];

        a * b * c
    }

    pub fn diagnal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    // Same ordering as the prism corners: bottom face counter-clockwise, then top face.
    pub fn corners(&self) -> [Vector3f; 8] {
        let (lo, hi) = (self.p_min, self.p_max);
        [Vector3f::new(lo.x, lo.y, lo.z), Vector3f::new(hi.x, lo.y, lo.z),
         Vector3f::new(hi.x, hi.y, lo.z), Vector3f::new(lo.x, hi.y, lo.z),
         Vector3f::new(lo.x, lo.y, hi.z), Vector3f::new(hi.x, lo.y, hi.z),
         Vector3f::new(hi.x, hi.y, hi.z), Vector3f::new(lo.x, hi.y, hi.z)]
    }

    pub fn is_valid(&self) -> bool {
        let mut result = true;
        for idx in 0..3 {
            if !(self.p_min[idx] <= self.p_max[idx]) {
                result = false;
                break;
            }
        }

        result
    }

    pub fn is_finite(&self) -> bool {
        self.p_min.iter().chain(self.p_max.iter()).all(|v| v.is_finite())
    }
}

/* Test for AABB */
