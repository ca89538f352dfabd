//! Parallax projection around the viewport centre

use glam::DVec2;

use crate::world::WorldContext;

/// Projects world coordinates at a given depth into view space
///
/// A point at depth `z` appears at `center + (p - center) * z`, so deep
/// stars (z near 1) track the viewport almost one to one and shallow ones
/// barely move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    view_position: DVec2,
    view_size: DVec2,
}

impl Projector {
    pub fn new(world: &WorldContext) -> Self {
        Self {
            view_position: world.view_position,
            view_size: world.view_size,
        }
    }

    /// World coordinate on `axis` as seen at depth `z`
    #[inline]
    pub fn from(&self, axis: usize, value: f64, z: f64) -> f64 {
        let center = self.view_position[axis] + self.view_size[axis] / 2.0;
        center + (value - center) * z
    }

    /// Inverse of `from`: which world coordinate lands on `value` at depth `z`
    #[inline]
    pub fn to(&self, axis: usize, value: f64, z: f64) -> f64 {
        self.from(axis, value, 1.0 / z)
    }

    #[inline]
    pub fn project(&self, point: DVec2, z: f64) -> DVec2 {
        DVec2::new(self.from(0, point.x, z), self.from(1, point.y, z))
    }

    #[inline]
    pub fn unproject(&self, point: DVec2, z: f64) -> DVec2 {
        DVec2::new(self.to(0, point.x, z), self.to(1, point.y, z))
    }

    /// World-space rectangle that projects onto the viewport at depth `z`
    pub fn visible_bounds(&self, z: f64) -> (DVec2, DVec2) {
        (
            self.unproject(self.view_position, z),
            self.unproject(self.view_position + self.view_size, z),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector() -> Projector {
        let mut world = WorldContext::new(
            DVec2::splat(40_000.0),
            DVec2::splat(2_000.0),
            DVec2::new(1280.0, 720.0),
            0.1,
        )
        .unwrap();
        world.view_position = DVec2::new(10_000.0, 12_000.0);
        Projector::new(&world)
    }

    #[test]
    fn test_view_center_is_fixed_point() {
        let p = projector();
        let c = DVec2::new(11_000.0, 13_000.0);
        assert_eq!(p.project(c, 0.3), c);
    }

    #[test]
    fn test_depth_scales_offsets() {
        let p = projector();
        let q = p.project(DVec2::new(12_000.0, 13_000.0), 0.5);
        assert!((q.x - 11_500.0).abs() < 1e-9);
        assert!((q.y - 13_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let p = projector();
        let w = DVec2::new(3_210.0, 25_000.0);
        let back = p.unproject(p.project(w, 0.37), 0.37);
        assert!((back - w).length() < 1e-6);
    }

    #[test]
    fn test_visible_bounds_grow_with_shallow_depth() {
        let p = projector();
        let (lo, hi) = p.visible_bounds(0.5);
        assert!((hi.x - lo.x - 4_000.0).abs() < 1e-9);
        assert!((lo.x - 9_000.0).abs() < 1e-9);
    }
}
