//! Shared view of the world: toroidal extent, seam margin and viewport
//!
//! One `WorldContext` is owned by the scheduler and handed to every
//! participant that needs world or camera state.

use glam::DVec2;

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub struct WorldContext {
    /// Full world extent, seams included
    pub world_size: DVec2,
    /// Width of the mirrored band at the world edges (one view at the farthest depth)
    pub margin: DVec2,
    /// Viewport top-left corner in world space
    pub view_position: DVec2,
    /// Viewport extent in world space
    pub view_size: DVec2,
    /// Render target size in pixels
    pub screen_size: DVec2,
    /// Velocity of whatever the camera follows, used for star streaks and zoom
    pub camera_velocity: DVec2,
}

impl WorldContext {
    /// Build a world whose seam margin is `view_size / min_depth`
    pub fn new(
        world_size: DVec2,
        view_size: DVec2,
        screen_size: DVec2,
        min_depth: f64,
    ) -> Result<Self, ConfigError> {
        if !(world_size.x > 0.0 && world_size.y > 0.0) {
            return Err(ConfigError::EmptyWorld {
                width: world_size.x,
                height: world_size.y,
            });
        }
        if !(view_size.x > 0.0 && view_size.y > 0.0) {
            return Err(ConfigError::EmptyViewport {
                width: view_size.x,
                height: view_size.y,
            });
        }
        if !(min_depth > 0.0) {
            return Err(ConfigError::InvalidDepthRange {
                min: min_depth,
                max: f64::NAN,
            });
        }

        let margin = view_size / min_depth;
        for axis in 0..2 {
            if world_size[axis] <= margin[axis] {
                return Err(ConfigError::WorldSmallerThanMargin {
                    axis,
                    world: world_size[axis],
                    margin: margin[axis],
                });
            }
        }

        Ok(Self {
            world_size,
            margin,
            view_position: DVec2::ZERO,
            view_size,
            screen_size,
            camera_velocity: DVec2::ZERO,
        })
    }

    /// Length of one toroidal period on each axis
    #[inline]
    pub fn period(&self) -> DVec2 {
        self.world_size - self.margin
    }

    /// Advance `position` by `velocity`, wrapping into `[margin/2, world - margin/2)`
    pub fn wrap(&self, position: DVec2, velocity: DVec2) -> DVec2 {
        DVec2::new(
            self.wrap_axis(0, position.x + velocity.x),
            self.wrap_axis(1, position.y + velocity.y),
        )
    }

    fn wrap_axis(&self, axis: usize, value: f64) -> f64 {
        let half = self.margin[axis] / 2.0;
        let period = self.world_size[axis] - self.margin[axis];
        let wrapped = (value - half).rem_euclid(period);
        // rem_euclid rounds up to `period` for tiny negative inputs
        let wrapped = if wrapped >= period { 0.0 } else { wrapped };
        wrapped + half
    }

    /// Centre of the world
    pub fn center(&self) -> DVec2 {
        self.world_size / 2.0
    }

    /// Viewport centre in world space
    pub fn view_center(&self) -> DVec2 {
        self.view_position + self.view_size / 2.0
    }

    /// Place the viewport so that `target` sits at its centre
    pub fn center_view_on(&mut self, target: DVec2) {
        self.view_position = target - self.view_size / 2.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn world() -> WorldContext {
        WorldContext::new(
            DVec2::splat(40_000.0),
            DVec2::splat(2_000.0),
            DVec2::new(1280.0, 720.0),
            0.1,
        )
        .unwrap()
    }

    #[test]
    fn test_margin_is_view_at_min_depth() {
        let w = world();
        assert_eq!(w.margin, DVec2::splat(20_000.0));
        assert_eq!(w.period(), DVec2::splat(20_000.0));
    }

    #[test]
    fn test_wrap_matches_seam_formula() {
        let w = world();
        // (p + v + W - m - m/2) mod (W - m) + m/2
        let p = w.wrap(DVec2::new(29_999.0, 10_000.0), DVec2::new(5.0, -1.0));
        assert!((p.x - 10_004.0).abs() < 1e-9);
        assert!((p.y - 29_999.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_world_smaller_than_margin() {
        let err = WorldContext::new(
            DVec2::splat(15_000.0),
            DVec2::splat(2_000.0),
            DVec2::splat(100.0),
            0.1,
        );
        assert!(matches!(
            err,
            Err(ConfigError::WorldSmallerThanMargin { axis: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_empty_world() {
        assert!(matches!(
            WorldContext::new(DVec2::ZERO, DVec2::ONE, DVec2::ONE, 0.5),
            Err(ConfigError::EmptyWorld { .. })
        ));
        assert!(matches!(
            WorldContext::new(DVec2::splat(10.0), DVec2::ZERO, DVec2::ONE, 0.5),
            Err(ConfigError::EmptyViewport { .. })
        ));
    }

    #[test]
    fn test_center_view_on() {
        let mut w = world();
        w.center_view_on(DVec2::new(5_000.0, 6_000.0));
        assert_eq!(w.view_position, DVec2::new(4_000.0, 5_000.0));
        assert_eq!(w.view_center(), DVec2::new(5_000.0, 6_000.0));
    }

    proptest! {
        #[test]
        fn prop_wrap_stays_inside_band(
            px in 10_000.0f64..30_000.0,
            py in 10_000.0f64..30_000.0,
            vx in -5_000.0f64..5_000.0,
            vy in -5_000.0f64..5_000.0,
            steps in 1usize..50,
        ) {
            let w = world();
            let mut p = DVec2::new(px, py);
            let v = DVec2::new(vx, vy);
            for _ in 0..steps {
                p = w.wrap(p, v);
                prop_assert!(p.x >= 10_000.0 && p.x < 30_000.0);
                prop_assert!(p.y >= 10_000.0 && p.y < 30_000.0);
            }
        }
    }
}
