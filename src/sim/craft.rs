//! The player's lander and its flight state machine
//!
//! ```text
//! Flying --(gentle contact)--> Landed --(thrust)--> Flying
//!   |                            |
//!   +--(hard contact, depletion)-+--> Dead (terminal)
//! ```

use glam::DVec2;

use super::body::{Body, BodyStyle, Motion, Pose};
use crate::geometry::{Polygon, Shape};
use crate::renderer::{colors, shapes};
use crate::scheduler::{Frame, Renderable, Steppable, TickContext};
use crate::world::WorldContext;
use crate::{constrain_delta_angle, direction};

/// Hull outline in local space, nose along +x
pub const HULL: [[f64; 2]; 17] = [
    [-30.0, 7.0],
    [-35.0, 26.0],
    [-34.0, 32.0],
    [-16.0, 35.0],
    [-10.0, 30.0],
    [0.0, 12.0],
    [-35.0, 26.0],
    [26.0, 8.0],
    [-35.0, 0.0],
    [26.0, -8.0],
    [-35.0, -26.0],
    [0.0, -12.0],
    [-10.0, -30.0],
    [-16.0, -35.0],
    [-34.0, -32.0],
    [-35.0, -26.0],
    [-30.0, -7.0],
];

/// Engine glow anchor and size at full fire, local space
const GLOW_ANCHOR: DVec2 = DVec2::new(-28.0, 0.0);
const GLOW_RADIUS: DVec2 = DVec2::new(25.0, 8.0);
const GLOW_SEGMENTS: u32 = 16;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlightState {
    #[default]
    Flying,
    Landed,
    Dead,
}

/// Craft handling, already converted to per-tick units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraftTuning {
    /// Δv per tick at thrust factor 1
    pub thrust: f64,
    /// Δω per tick while steering
    pub steer_acceleration: f64,
    /// Glow decay per tick
    pub fire_rate: f64,
}

impl CraftTuning {
    /// Convert per-second values at `steps_per_second`
    pub fn per_tick(
        thrust: f64,
        steer_acceleration: f64,
        fire_rate: f64,
        steps_per_second: f64,
    ) -> Self {
        Self {
            thrust: thrust / steps_per_second,
            steer_acceleration: steer_acceleration / steps_per_second,
            fire_rate: fire_rate / steps_per_second,
        }
    }
}

/// Result of touching a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    Landed,
    Crashed { speed: f64, angle_error: f64 },
}

pub struct Craft {
    body: Body,
    hull: Polygon,
    transformed: Polygon,
    pub motion: Motion,
    state: FlightState,
    fire: f64,
    braking: bool,
    tuning: CraftTuning,
}

impl Craft {
    pub fn new(position: DVec2, tuning: CraftTuning) -> Self {
        let points: Vec<DVec2> = HULL.iter().map(|[x, y]| DVec2::new(*x, *y)).collect();
        let hull = Polygon::new(&points);
        let mut craft = Self {
            body: Body::new(
                Shape::Polygon(hull.clone()),
                Pose::new(position, 0.0),
                BodyStyle::outlined(colors::HULL, 2.0),
            ),
            transformed: hull.clone(),
            hull,
            motion: Motion::default(),
            state: FlightState::Flying,
            fire: 0.0,
            braking: false,
            tuning,
        };
        craft.refresh_transform();
        craft
    }

    #[inline]
    pub fn state(&self) -> FlightState {
        self.state
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state == FlightState::Dead
    }

    #[inline]
    pub fn is_landed(&self) -> bool {
        self.state == FlightState::Landed
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        self.body.pose
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.body.pose.position
    }

    pub fn set_position(&mut self, position: DVec2) {
        self.body.pose.position = position;
        self.refresh_transform();
    }

    #[inline]
    pub fn direction(&self) -> f64 {
        self.body.pose.direction
    }

    pub fn set_direction(&mut self, direction: f64) {
        self.body.pose.direction = direction;
        self.refresh_transform();
    }

    #[inline]
    pub fn velocity(&self) -> DVec2 {
        self.motion.velocity
    }

    #[inline]
    pub fn fire(&self) -> f64 {
        self.fire
    }

    #[inline]
    pub fn tuning(&self) -> &CraftTuning {
        &self.tuning
    }

    /// Whether the brake assist ran this tick
    #[inline]
    pub fn is_braking(&self) -> bool {
        self.braking
    }

    pub fn set_braking(&mut self) {
        self.braking = true;
    }

    /// Hull placed at the current pose, as of the last refresh
    #[inline]
    pub fn transformed_hull(&self) -> &Polygon {
        &self.transformed
    }

    /// Recompute the world-space hull from the pose
    pub fn refresh_transform(&mut self) {
        self.hull
            .transform_into(&self.body.pose.transform(), &mut self.transformed);
    }

    /// Fire the engine at `factor` of full thrust
    ///
    /// Lifts off if landed. Returns `false` (and does nothing) when dead.
    pub fn accelerate(&mut self, factor: f64) -> bool {
        if self.is_dead() {
            return false;
        }
        self.fire = factor.min(self.fire + 2.0 * self.tuning.fire_rate);
        if self.state == FlightState::Landed {
            log::debug!("craft lifting off");
            self.state = FlightState::Flying;
        }
        let dir = self.direction();
        let dv = factor * self.tuning.thrust;
        self.motion.velocity.x += dv * dir.cos();
        self.motion.velocity.y -= dv * dir.sin();
        true
    }

    /// Counter-clockwise; ignored while landed or dead
    pub fn steer_left(&mut self) {
        if self.state == FlightState::Flying {
            self.motion.angular_velocity += self.tuning.steer_acceleration;
        }
    }

    /// Clockwise; ignored while landed or dead
    pub fn steer_right(&mut self) {
        if self.state == FlightState::Flying {
            self.motion.angular_velocity -= self.tuning.steer_acceleration;
        }
    }

    /// Classify a contact with a body centred at `center`
    ///
    /// Lands when `|v| < speed_limit` and the heading is within
    /// `angle_limit` of the outward radial, snapping the heading to it;
    /// otherwise the craft dies. Either way it stops moving.
    pub fn touch_down(&mut self, center: DVec2, speed_limit: f64, angle_limit: f64) -> Contact {
        let speed = self.motion.velocity.length();
        let pos = self.position();
        let landing_angle = direction(center.x, center.y, pos.x, pos.y);
        let angle_error = constrain_delta_angle(self.direction() - landing_angle).abs();

        let contact = if speed < speed_limit && angle_error < angle_limit {
            self.state = FlightState::Landed;
            self.body.pose.direction = landing_angle;
            Contact::Landed
        } else {
            self.state = FlightState::Dead;
            Contact::Crashed { speed, angle_error }
        };
        self.braking = false;
        self.motion.halt();
        self.refresh_transform();
        log::debug!("craft contact: {contact:?} (speed {speed:.3}, angle error {angle_error:.3})");
        contact
    }

    /// Terminal; used when a resource runs out mid-flight
    pub fn kill(&mut self) {
        self.state = FlightState::Dead;
        self.braking = false;
        self.motion.halt();
    }
}

impl Steppable for Craft {
    fn pre_step(&mut self, ctx: &mut TickContext<'_>) {
        self.fire = (self.fire - self.tuning.fire_rate).max(0.0);
        if self.is_dead() {
            return;
        }
        self.braking = false;
        self.body.pose.position = ctx.world.wrap(self.position(), self.motion.velocity);
        self.body.pose.direction += self.motion.angular_velocity;
        self.refresh_transform();
    }
}

impl Renderable for Craft {
    fn render(&mut self, _world: &WorldContext, frame: &mut Frame<'_>) {
        let fire = self.fire;
        if fire > 0.0 {
            frame.with_transform(&self.body.pose.transform(), |f| {
                let glow = shapes::ellipse_points(
                    GLOW_ANCHOR,
                    DVec2::new(GLOW_RADIUS.x * fire, GLOW_RADIUS.y),
                    GLOW_SEGMENTS,
                );
                f.fill_polygon(&glow, colors::FIRE);
            });
        }
        self.body.draw(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyState;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn tuning() -> CraftTuning {
        CraftTuning::per_tick(5.0, 0.05, 1.0, 60.0)
    }

    fn world() -> WorldContext {
        WorldContext::new(
            DVec2::splat(40_000.0),
            DVec2::splat(2_000.0),
            DVec2::new(1280.0, 720.0),
            0.1,
        )
        .unwrap()
    }

    fn tick(craft: &mut Craft, world: &mut WorldContext) {
        let input = KeyState::default();
        let mut ctx = TickContext {
            world,
            input: &input,
            tick: 0,
            steps_per_second: 60.0,
        };
        craft.pre_step(&mut ctx);
        craft.step(&mut ctx);
    }

    #[test]
    fn test_thrust_follows_heading() {
        let mut craft = Craft::new(DVec2::splat(20_000.0), tuning());
        craft.set_direction(FRAC_PI_2);
        assert!(craft.accelerate(1.0));
        let v = craft.velocity();
        assert!(v.x.abs() < 1e-12);
        assert!((v.y + 5.0 / 60.0).abs() < 1e-12);
        assert!((craft.fire() - 2.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_fire_capped_by_factor_and_decays() {
        let mut craft = Craft::new(DVec2::splat(20_000.0), tuning());
        for _ in 0..100 {
            craft.accelerate(0.5);
        }
        assert_eq!(craft.fire(), 0.5);
        let mut w = world();
        tick(&mut craft, &mut w);
        assert!((craft.fire() - (0.5 - 1.0 / 60.0)).abs() < 1e-12);
    }

    #[test]
    fn test_pre_step_moves_and_refreshes_hull() {
        let mut craft = Craft::new(DVec2::splat(20_000.0), tuning());
        craft.motion.velocity = DVec2::new(3.0, -4.0);
        craft.motion.angular_velocity = 0.1;
        let mut w = world();
        tick(&mut craft, &mut w);
        assert_eq!(craft.position(), DVec2::new(20_003.0, 19_996.0));
        assert!((craft.direction() - 0.1).abs() < 1e-12);
        let expected = craft.hull.transformed(&craft.pose().transform());
        assert_eq!(craft.transformed_hull(), &expected);
    }

    #[test]
    fn test_steering_ignored_unless_flying() {
        let mut craft = Craft::new(DVec2::splat(20_000.0), tuning());
        craft.steer_left();
        assert!(craft.motion.angular_velocity > 0.0);
        craft.steer_right();
        craft.steer_right();
        assert!(craft.motion.angular_velocity < 0.0);

        craft.motion.halt();
        craft.kill();
        craft.steer_left();
        assert_eq!(craft.motion.angular_velocity, 0.0);
        assert!(!craft.accelerate(1.0));
    }

    #[test]
    fn test_dead_craft_does_not_move() {
        let mut craft = Craft::new(DVec2::splat(20_000.0), tuning());
        craft.accelerate(1.0);
        craft.kill();
        craft.motion.velocity = DVec2::new(10.0, 0.0);
        let mut w = world();
        tick(&mut craft, &mut w);
        assert_eq!(craft.position(), DVec2::splat(20_000.0));
        assert!(craft.fire() > 0.0);
    }

    fn craft_above(center: DVec2, heading: f64, velocity: DVec2) -> Craft {
        let mut craft = Craft::new(center + DVec2::new(0.0, -100.0), tuning());
        craft.set_direction(heading);
        craft.motion.velocity = velocity;
        craft
    }

    #[test]
    fn test_gentle_upright_contact_lands() {
        let center = DVec2::splat(20_000.0);
        // Outward radial from the planet to a craft above it is +π/2
        let mut craft = craft_above(center, FRAC_PI_2 + 0.01, DVec2::new(0.0, 1.0));
        assert_eq!(craft.touch_down(center, 100.0 / 60.0, PI / 20.0), Contact::Landed);
        assert!(craft.is_landed());
        assert_eq!(craft.direction(), FRAC_PI_2);
        assert_eq!(craft.motion, Motion::default());
    }

    #[test]
    fn test_speed_at_limit_crashes() {
        let center = DVec2::splat(20_000.0);
        let mut craft = craft_above(center, FRAC_PI_2, DVec2::new(0.6, 0.8));
        let limit = craft.velocity().length();
        assert!(matches!(
            craft.touch_down(center, limit, PI / 20.0),
            Contact::Crashed { .. }
        ));
        assert!(craft.is_dead());

        let mut craft = craft_above(center, FRAC_PI_2, DVec2::new(0.6, 0.8));
        assert_eq!(craft.touch_down(center, limit * 1.000_001, PI / 20.0), Contact::Landed);
    }

    #[test]
    fn test_angle_at_limit_crashes() {
        let center = DVec2::splat(20_000.0);
        let heading = FRAC_PI_2 + 0.25;
        let mut craft = craft_above(center, heading, DVec2::ZERO);
        let landing = direction(center.x, center.y, craft.position().x, craft.position().y);
        let limit = constrain_delta_angle(heading - landing).abs();
        assert!(matches!(
            craft.touch_down(center, 1.0, limit),
            Contact::Crashed { .. }
        ));

        let mut craft = craft_above(center, heading, DVec2::ZERO);
        assert_eq!(craft.touch_down(center, 1.0, limit * 1.000_001), Contact::Landed);
    }

    #[test]
    fn test_thrust_lifts_off() {
        let center = DVec2::splat(20_000.0);
        let mut craft = craft_above(center, FRAC_PI_2, DVec2::ZERO);
        craft.touch_down(center, 1.0, 0.1);
        assert!(craft.is_landed());
        craft.steer_left();
        assert_eq!(craft.motion.angular_velocity, 0.0);
        craft.accelerate(1.0);
        assert_eq!(craft.state(), FlightState::Flying);
    }
}
