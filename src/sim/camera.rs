//! Camera participants
//!
//! The viewport lives in `WorldContext`; these objects move it and turn it
//! into a world-to-screen transform for the renderables drawn under it.

use glam::DVec2;

use super::craft::Craft;
use crate::math::Matrix;
use crate::scheduler::{Frame, Renderable, Shared, Steppable, TickContext};
use crate::world::WorldContext;

/// Centres the viewport on the craft after it has moved
pub struct CameraFollow {
    target: Shared<Craft>,
}

impl CameraFollow {
    pub fn new(target: Shared<Craft>) -> Self {
        Self { target }
    }
}

impl Steppable for CameraFollow {
    fn step(&mut self, ctx: &mut TickContext<'_>) {
        let craft = self.target.borrow();
        ctx.world.center_view_on(craft.position());
        ctx.world.camera_velocity = craft.velocity();
    }
}

/// Drifts the viewport at a constant velocity, wrapping at the seams
///
/// The drift is also published as the camera velocity so stars streak.
pub struct DriftCamera {
    velocity: DVec2,
}

impl DriftCamera {
    /// `velocity_per_second` is converted with the scheduler's step rate
    pub fn new(velocity_per_second: DVec2, steps_per_second: f64) -> Self {
        Self {
            velocity: velocity_per_second / steps_per_second,
        }
    }
}

impl Steppable for DriftCamera {
    fn pre_step(&mut self, ctx: &mut TickContext<'_>) {
        ctx.world.view_position = ctx.world.wrap(ctx.world.view_position, self.velocity);
        ctx.world.camera_velocity = self.velocity;
    }
}

/// Screen scale: fit the viewport to the screen, optionally zooming in at
/// low camera speed
pub fn view_scale(world: &WorldContext, speed_zoom: bool) -> f64 {
    let fit = (world.screen_size / world.view_size).max_element();
    if !speed_zoom {
        return fit;
    }
    // 3 / |v|^0.6 grows without bound as the camera stops; 1 caps it
    let speed = world.camera_velocity.length();
    fit.max((3.0 / speed.powf(0.6)).min(1.0))
}

/// World-to-screen transform for the current viewport
pub fn view_transform(world: &WorldContext, scale: f64) -> Matrix {
    let offset = (world.screen_size - world.view_size * scale) / 2.0;
    Matrix::translate(-world.view_position.x, -world.view_position.y)
        .multiply(&Matrix::scale(scale, scale))
        .multiply(&Matrix::translate(offset.x, offset.y))
}

/// Draws its children in world space under the camera transform
pub struct CameraLayer {
    children: Vec<Box<dyn Renderable>>,
    speed_zoom: bool,
}

impl CameraLayer {
    pub fn new(speed_zoom: bool) -> Self {
        Self {
            children: Vec::new(),
            speed_zoom,
        }
    }

    pub fn add(&mut self, child: impl Renderable + 'static) {
        self.children.push(Box::new(child));
    }

    pub fn with(mut self, child: impl Renderable + 'static) -> Self {
        self.add(child);
        self
    }
}

impl Renderable for CameraLayer {
    fn render(&mut self, world: &WorldContext, frame: &mut Frame<'_>) {
        let transform = view_transform(world, view_scale(world, self.speed_zoom));
        let children = &mut self.children;
        frame.with_transform(&transform, |f| {
            for child in children.iter_mut() {
                child.render(world, f);
            }
        });
    }
}
