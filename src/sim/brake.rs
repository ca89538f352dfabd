//! Brake assist: turn the nose against the velocity, then burn
//!
//! Rotation is bang-bang. If the craft is already turning towards the
//! target, it keeps accelerating while the time to close the gap is longer
//! than the time needed to stop rotating, and counter-steers once it is
//! shorter.

use glam::DVec2;

use super::craft::Craft;
use crate::geometry::solve_quadratic;
use crate::{constrain_delta_angle, direction};

/// Brake thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrakeTuning {
    /// Only burn when the nose is within this angle of the target
    pub alignment_window: f64,
    /// Only burn above this speed
    pub min_speed: f64,
    /// Thrust factor for the braking burn
    pub thrust: f64,
}

/// Which way the assist steers this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
    Hold,
}

/// Heading that points the nose against `velocity`
#[inline]
pub fn retrograde(velocity: DVec2) -> f64 {
    direction(0.0, 0.0, -velocity.x, -velocity.y)
}

/// Smallest positive time to rotate through `delta` from `angular_velocity`
/// while decelerating at `steer_acceleration`
fn time_to_close(
    delta: f64,
    angular_velocity: f64,
    spin: f64,
    steer_acceleration: f64,
) -> Option<f64> {
    let (t1, t2) = solve_quadratic(-spin * steer_acceleration / 2.0, -angular_velocity, delta)?;
    [t1, t2]
        .into_iter()
        .filter(|t| *t > 0.0)
        .min_by(f64::total_cmp)
}

/// Steering decision for closing `delta` radians
pub fn choose_turn(delta: f64, angular_velocity: f64, steer_acceleration: f64) -> Turn {
    if delta == 0.0 {
        return Turn::Hold;
    }
    let spin = if angular_velocity > 0.0 { 1.0 } else { -1.0 };

    let turn = if (delta > 0.0) != (angular_velocity > 0.0) {
        -spin
    } else {
        let time_to_stop = spin * angular_velocity / steer_acceleration;
        match time_to_close(delta, angular_velocity, spin, steer_acceleration) {
            Some(t) if t > time_to_stop => spin,
            Some(t) if t < time_to_stop => -spin,
            _ => 0.0,
        }
    };

    if turn > 0.0 {
        Turn::Left
    } else if turn < 0.0 {
        Turn::Right
    } else {
        Turn::Hold
    }
}

/// Run the assist for one tick
///
/// Returns the thrust factor burned (0 when only steering). Does nothing
/// while landed or dead.
pub fn apply(craft: &mut Craft, tuning: &BrakeTuning) -> f64 {
    if craft.is_landed() || craft.is_dead() {
        return 0.0;
    }
    craft.set_braking();

    let velocity = craft.velocity();
    let delta = constrain_delta_angle(retrograde(velocity) - craft.direction());
    let steer = craft.tuning().steer_acceleration;
    match choose_turn(delta, craft.motion.angular_velocity, steer) {
        Turn::Left => craft.steer_left(),
        Turn::Right => craft.steer_right(),
        Turn::Hold => {}
    }

    let moving = velocity.length_squared() > tuning.min_speed * tuning.min_speed;
    if moving && delta.abs() < tuning.alignment_window && craft.accelerate(tuning.thrust) {
        tuning.thrust
    } else {
        0.0
    }
}
