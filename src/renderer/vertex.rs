//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::DVec2;

/// Screen-space vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Narrow a simulation-space point to GPU precision
    #[inline]
    pub fn at(point: DVec2, color: [f32; 4]) -> Self {
        Self::new(point.x as f32, point.y as f32, color)
    }

    /// Bytes between consecutive vertices in a buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const HULL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const FIRE: [f32; 4] = [1.0, 0.55, 0.1, 0.9];
    pub const PLANET: [f32; 4] = [0.35, 0.45, 0.75, 1.0];
    pub const GOAL_PLANET: [f32; 4] = [0.3, 0.8, 0.4, 1.0];
    pub const FUEL: [f32; 4] = [0.95, 0.75, 0.2, 1.0];
    pub const FOOD: [f32; 4] = [0.4, 0.85, 0.4, 1.0];
    pub const HUD_FRAME: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        assert_eq!(Vertex::STRIDE, 24);
        let v = Vertex::at(DVec2::new(1.5, -2.0), colors::STAR);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 24);
        assert_eq!(&bytes[0..4], &1.5f32.to_ne_bytes());
    }
}
