// Copyright @yucwang 2026

use std::path::PathBuf;

use image::{Rgb, RgbImage};

use super::Visualizer;
use crate::core::prism::Prism;
use crate::error::Result;
use crate::math::aabb::AABB;
use crate::math::constants::{Float, Matrix3f, Vector2f, Vector3f, EPSILON, PI};

const BOX_FILL: [u8; 3] = [255, 192, 203];
const BOX_ALPHA: Float = 0.25;
const BOX_EDGE: [u8; 3] = [255, 255, 255];
const PRISM_FILL: [u8; 3] = [165, 42, 42];
const PRISM_EDGE: [u8; 3] = [0, 0, 0];
const BACKGROUND: [u8; 3] = [255, 255, 255];

/// Orthographic view of the bounding box (translucent) and every prism
/// (opaque) drawn over it, written as a PNG.
pub struct PngPlotter {
    path: PathBuf,
    width: u32,
    height: u32,
    azimuth_deg: Float,
    elevation_deg: Float,
}

impl PngPlotter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into(), width: 800, height: 800, azimuth_deg: -60.0, elevation_deg: 30.0 }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn render(&self, bounds: &AABB, prisms: &[Prism]) -> RgbImage {
        let view = View::new(bounds, self.azimuth_deg, self.elevation_deg, self.width, self.height);

        // the box is a translucent backdrop, prisms are painted over it back to front
        let box_prism = Prism::from_corners(bounds.p_min, bounds.p_max);
        let mut box_faces = view.faces(&box_prism, BOX_FILL, BOX_ALPHA, BOX_EDGE);
        sort_back_to_front(&mut box_faces);
        let mut prism_faces: Vec<Face> = prisms.iter()
            .flat_map(|prism| view.faces(prism, PRISM_FILL, 1.0, PRISM_EDGE))
            .collect();
        sort_back_to_front(&mut prism_faces);

        let mut img = RgbImage::from_pixel(self.width, self.height, Rgb(BACKGROUND));
        for face in box_faces.iter().chain(prism_faces.iter()) {
            fill_polygon(&mut img, &face.corners, face.fill, face.alpha);
            for idx in 0..4 {
                draw_line(&mut img, face.corners[idx], face.corners[(idx + 1) % 4], face.edge);
            }
        }
        img
    }
}

impl Visualizer for PngPlotter {
    fn visualize(&mut self, bounds: &AABB, prisms: &[Prism]) -> Result<()> {
        let img = self.render(bounds, prisms);
        img.save(&self.path)?;
        log::info!("Wrote plot of {} prisms to: {}.", prisms.len(), self.path.display());
        Ok(())
    }
}

struct Face {
    corners: [Vector2f; 4],
    depth: Float,
    fill: [u8; 3],
    alpha: Float,
    edge: [u8; 3],
}

/// Maps the bounding box onto a unit cube centred at the origin, rotates it by
/// azimuth/elevation and scales it to the image.
struct View {
    origin: Vector3f,
    inv_extent: Vector3f,
    rotation: Matrix3f,
    scale: Float,
    center: Vector2f,
}

impl View {
    fn new(bounds: &AABB, azimuth_deg: Float, elevation_deg: Float, width: u32, height: u32) -> Self {
        let extent = bounds.diagnal();
        let mut inv_extent = Vector3f::zeros();
        for idx in 0..3 {
            inv_extent[idx] = if extent[idx].abs() > EPSILON { 1.0 / extent[idx] } else { 0.0 };
        }
        let azim = azimuth_deg * PI / 180.0;
        let elev = elevation_deg * PI / 180.0;
        let right = Vector3f::new(-azim.sin(), azim.cos(), 0.0);
        let up = Vector3f::new(-elev.sin() * azim.cos(), -elev.sin() * azim.sin(), elev.cos());
        let eye = Vector3f::new(elev.cos() * azim.cos(), elev.cos() * azim.sin(), elev.sin());
        let rotation = Matrix3f::from_rows(&[right.transpose(), up.transpose(), eye.transpose()]);
        let size = width.min(height) as Float;
        Self {
            origin: bounds.center(),
            inv_extent,
            rotation,
            // the unit cube's half diagonal is ~0.87, keep a margin around it
            scale: 0.5 * size / 0.95,
            center: Vector2f::new(0.5 * width as Float, 0.5 * height as Float),
        }
    }

    /// Screen position and depth (larger is closer to the viewer).
    fn project(&self, p: &Vector3f) -> (Vector2f, Float) {
        let local = (p - self.origin).component_mul(&self.inv_extent);
        let v = self.rotation * local;
        (Vector2f::new(self.center.x + self.scale * v.x, self.center.y - self.scale * v.y), v.z)
    }

    fn faces(&self, prism: &Prism, fill: [u8; 3], alpha: Float, edge: [u8; 3]) -> Vec<Face> {
        prism.faces().iter().map(|quad| {
            let mut corners = [Vector2f::zeros(); 4];
            let mut depth = 0.0;
            for (corner, p) in corners.iter_mut().zip(quad.iter()) {
                let (screen, d) = self.project(p);
                *corner = screen;
                depth += 0.25 * d;
            }
            Face { corners, depth, fill, alpha, edge }
        }).collect()
    }
}

fn sort_back_to_front(faces: &mut [Face]) {
    faces.sort_by(|a, b| a.depth.partial_cmp(&b.depth).unwrap_or(std::cmp::Ordering::Equal));
}

fn blend(img: &mut RgbImage, x: u32, y: u32, color: [u8; 3], alpha: Float) {
    let pixel = img.get_pixel_mut(x, y);
    for c in 0..3 {
        let mixed = alpha * color[c] as Float + (1.0 - alpha) * pixel.0[c] as Float;
        pixel.0[c] = mixed.round().max(0.0).min(255.0) as u8;
    }
}

fn cross(o: &Vector2f, a: &Vector2f, b: &Vector2f) -> Float {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Fills a convex polygon, sampling at pixel centres. Zero-area polygons are skipped.
fn fill_polygon(img: &mut RgbImage, corners: &[Vector2f; 4], color: [u8; 3], alpha: Float) {
    let n = corners.len();
    let area: Float = (0..n).map(|i| cross(&Vector2f::zeros(), &corners[i], &corners[(i + 1) % n])).sum();
    if area.abs() < EPSILON {
        return;
    }
    let sign = area.signum();

    let (w, h) = (img.width() as Float, img.height() as Float);
    let min_x = corners.iter().map(|c| c.x).fold(Float::INFINITY, Float::min).floor().max(0.0);
    let max_x = corners.iter().map(|c| c.x).fold(Float::NEG_INFINITY, Float::max).ceil().min(w - 1.0);
    let min_y = corners.iter().map(|c| c.y).fold(Float::INFINITY, Float::min).floor().max(0.0);
    let max_y = corners.iter().map(|c| c.y).fold(Float::NEG_INFINITY, Float::max).ceil().min(h - 1.0);
    if max_x < min_x || max_y < min_y {
        return;
    }

    for y in (min_y as u32)..=(max_y as u32) {
        for x in (min_x as u32)..=(max_x as u32) {
            let p = Vector2f::new(x as Float + 0.5, y as Float + 0.5);
            let inside = (0..n).all(|i| sign * cross(&corners[i], &corners[(i + 1) % n], &p) >= 0.0);
            if inside {
                blend(img, x, y, color, alpha);
            }
        }
    }
}

fn draw_line(img: &mut RgbImage, from: Vector2f, to: Vector2f, color: [u8; 3]) {
    let delta = to - from;
    let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;
    for step in 0..=steps {
        let p = from + delta * (step as Float / steps as Float);
        if p.x < 0.0 || p.y < 0.0 {
            continue;
        }
        let (x, y) = (p.x as u32, p.y as u32);
        if x < img.width() && y < img.height() {
            img.put_pixel(x, y, Rgb(color));
        }
    }
}
