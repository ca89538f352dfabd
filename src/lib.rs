//! Lost Orbit - a lander in a toroidal star field
//!
//! Core modules:
//! - `math`: homogeneous 3x3 transforms and vertex matrices
//! - `geometry`: segment, polygon and circle intersection tests
//! - `stars`: multi-resolution star index with parallax projection
//! - `scheduler`: fixed-step simulation clock decoupled from display refresh
//! - `sim`: craft, planets, resources and the flight rules
//! - `renderer`: CPU tessellation into vertex batches
//! - `session`: wiring a playable game (or the attract screen) from config

pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod math;
pub mod renderer;
pub mod scheduler;
pub mod session;
pub mod sim;
pub mod stars;
pub mod world;

pub use config::GameConfig;
pub use error::ConfigError;
pub use session::GameSession;
pub use world::WorldContext;

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Default simulation rate (steps per second)
    pub const STEPS_PER_SECOND: f64 = 60.0;
    /// Maximum catch-up steps per pump before the backlog is dropped
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World dimensions
    pub const WORLD_SIZE: f64 = 40_000.0;
    pub const VIEW_SIZE: f64 = 2_000.0;

    /// Star field defaults
    pub const STAR_COUNT: usize = 1_000;
    pub const MIN_DEPTH: f64 = 0.1;
    pub const MAX_DEPTH: f64 = 0.9;
    pub const DEPTH_LAYERS: usize = 3;
    /// Streak width per unit of depth
    pub const STAR_WIDTH: f64 = 10.0;

    /// Resource regeneration multiplier (relative to consumption rate)
    pub const RESOURCE_REGEN: f64 = 20.0;
}

/// Heading from (x1, y1) towards (x2, y2), y axis pointing down
#[inline]
pub fn direction(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (y1 - y2).atan2(x2 - x1)
}

/// Squared distance between two points
#[inline]
pub fn squared_distance(p1: DVec2, p2: DVec2) -> f64 {
    (p1 - p2).length_squared()
}

/// Wrap `x` into `[min, max)`
#[inline]
pub fn constrain(x: f64, min: f64, max: f64) -> f64 {
    let wrapped = (x - min).rem_euclid(max - min) + min;
    // rem_euclid can round up to the modulus for tiny negative inputs
    if wrapped >= max { min } else { wrapped }
}

/// Normalized angle difference to [-π, π)
#[inline]
pub fn constrain_delta_angle(angle: f64) -> f64 {
    use std::f64::consts::PI;
    constrain(angle, -PI, PI)
}
