// Copyright @yucwang 2026

use crate::math::aabb::AABB;
use crate::math::constants::Vector3f;

/// Corner indices of the six quadrilateral faces, in `Prism::vertices` order.
pub const PRISM_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [1, 2, 6, 5],
    [4, 7, 3, 0],
];

/// Axis-aligned box kept as its eight corners plus the extent those corners span.
#[derive(Debug, Clone, PartialEq)]
pub struct Prism {
    vertices: [Vector3f; 8],
    extent: AABB,
}

impl Prism {
    /// Expands two opposite corners into the eight vertices: the `z1` face
    /// counter-clockwise from `(x1, y1)`, then the `z2` face in the same order.
    pub fn from_corners(a: Vector3f, b: Vector3f) -> Self {
        let vertices = [
            Vector3f::new(a.x, a.y, a.z),
            Vector3f::new(b.x, a.y, a.z),
            Vector3f::new(b.x, b.y, a.z),
            Vector3f::new(a.x, b.y, a.z),
            Vector3f::new(a.x, a.y, b.z),
            Vector3f::new(b.x, a.y, b.z),
            Vector3f::new(b.x, b.y, b.z),
            Vector3f::new(a.x, b.y, b.z),
        ];
        let mut extent = AABB { p_min: vertices[0], p_max: vertices[0] };
        for v in vertices.iter().skip(1) {
            extent.expand_by_point(v);
        }
        Self { vertices, extent }
    }

    pub fn vertices(&self) -> &[Vector3f; 8] {
        &self.vertices
    }

    pub fn extent(&self) -> &AABB {
        &self.extent
    }

    pub fn faces(&self) -> [[Vector3f; 4]; 6] {
        let v = &self.vertices;
        let mut faces = [[Vector3f::zeros(); 4]; 6];
        for (face, indices) in faces.iter_mut().zip(PRISM_FACES.iter()) {
            for (corner, &idx) in face.iter_mut().zip(indices.iter()) {
                *corner = v[idx];
            }
        }
        faces
    }

    /// Whether every vertex coordinate is a finite number.
    pub fn is_well_formed(&self) -> bool {
        self.vertices.iter().all(|v| v.iter().all(|c| c.is_finite()))
    }

    /// Bounding-extent containment, inclusive on every face. Exact for
    /// axis-aligned prisms.
    pub fn contains(&self, point: &Vector3f) -> bool {
        self.extent.contains_point(point)
    }
}

/// Element-wise min/max over every vertex of every prism.
pub fn bounding_box(prisms: &[Prism]) -> Option<AABB> {
    AABB::from_points(prisms.iter().flat_map(|prism| prism.vertices().iter()))
}
