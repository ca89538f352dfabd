//! CPU-side render surface that collects a frame into one vertex buffer

use glam::DVec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::math::Matrix;
use crate::scheduler::{Color, RenderSurface};

/// Rim segments used for circles
const CIRCLE_SEGMENTS: u32 = 32;

/// Triangle list for one frame
///
/// Transforms are applied on the CPU, so the buffer is ready for a
/// pass-through shader in screen space.
pub struct VertexBatch {
    vertices: Vec<Vertex>,
    transform: Matrix,
    scale: f64,
    clear_color: Color,
}

impl Default for VertexBatch {
    fn default() -> Self {
        Self::new()
    }
}

impl VertexBatch {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            transform: Matrix::identity(3),
            scale: 1.0,
            clear_color: colors::BACKGROUND,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Buffer contents ready for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    #[inline]
    fn apply(&self, p: DVec2) -> DVec2 {
        self.transform.transform_point(p)
    }
}

impl RenderSurface for VertexBatch {
    fn clear(&mut self, color: Color) {
        self.vertices.clear();
        self.clear_color = color;
    }

    fn set_transform(&mut self, transform: &Matrix) {
        self.transform.clone_from(transform);
        self.scale = transform.scale_factor();
    }

    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Color) {
        let (from, to) = (self.apply(from), self.apply(to));
        shapes::line(&mut self.vertices, from, to, width * self.scale, color);
    }

    fn fill_polygon(&mut self, points: &[DVec2], color: Color) {
        let mapped: Vec<DVec2> = points.iter().map(|p| self.apply(*p)).collect();
        shapes::convex_polygon(&mut self.vertices, &mapped, color);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Color) {
        let center = self.apply(center);
        shapes::circle(
            &mut self.vertices,
            center,
            radius * self.scale,
            color,
            CIRCLE_SEGMENTS,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Frame;

    #[test]
    fn test_clear_resets_buffer() {
        let mut batch = VertexBatch::new();
        batch.fill_circle(DVec2::ZERO, 1.0, colors::STAR);
        assert!(!batch.is_empty());
        batch.clear(colors::PLANET);
        assert!(batch.is_empty());
        assert_eq!(batch.clear_color(), colors::PLANET);
    }

    #[test]
    fn test_transform_applied_on_cpu() {
        let mut batch = VertexBatch::new();
        {
            let mut frame = Frame::new(&mut batch);
            let camera = Matrix::scale(2.0, 2.0).multiply(&Matrix::translate(100.0, 0.0));
            frame.with_transform(&camera, |f| {
                f.stroke_line(DVec2::ZERO, DVec2::new(10.0, 0.0), 1.0, colors::STAR);
            });
        }
        let xs: Vec<f32> = batch.vertices().iter().map(|v| v.position[0]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::INFINITY, f32::min), 100.0);
        assert_eq!(xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max), 120.0);
        // Width scales with the transform
        let ys: Vec<f32> = batch.vertices().iter().map(|v| v.position[1].abs()).collect();
        assert!(ys.iter().all(|y| (*y - 1.0).abs() < 1e-6));
    }

    #[test]
    fn test_bytes_match_vertex_count() {
        let mut batch = VertexBatch::new();
        batch.fill_polygon(
            &[DVec2::ZERO, DVec2::X, DVec2::ONE, DVec2::Y],
            colors::HULL,
        );
        assert_eq!(batch.len(), 6);
        assert_eq!(batch.as_bytes().len(), 6 * Vertex::STRIDE);
    }
}
