//! Game configuration
//!
//! Every section defaults to the stock game, so a JSON file only needs the
//! fields it changes. Flight values are per second and are converted to
//! per-tick units once the step rate is known.

use std::f64::consts::{FRAC_PI_4, PI};
use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::consts::{
    DEPTH_LAYERS, MAX_DEPTH, MIN_DEPTH, STAR_COUNT, STEPS_PER_SECOND, VIEW_SIZE, WORLD_SIZE,
};
use crate::world::WorldContext;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub steps_per_second: f64,
    /// Star scattering seed
    pub seed: u64,
    pub world: WorldConfig,
    pub stars: StarConfig,
    pub flight: FlightConfig,
    pub resources: ResourceConfig,
    pub planets: Vec<PlanetConfig>,
    /// Initial craft position; `None` starts at the world centre
    pub craft_start: Option<DVec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub world_size: DVec2,
    pub view_size: DVec2,
    pub screen_size: DVec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub min_depth: f64,
    pub max_depth: f64,
    pub depth_layers: usize,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub thrust: f64,
    pub steer_acceleration: f64,
    pub fire_rate: f64,
    pub gravity: f64,
    /// In planet radii
    pub gravity_range: f64,
    pub landing_speed: f64,
    pub landing_angle: f64,
    pub brake_alignment_window: f64,
    pub brake_min_speed: f64,
    pub brake_thrust: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Level used per unit of thrust per tick
    pub fuel_rate: f64,
    /// Level used per tick in flight
    pub food_rate: f64,
    pub initial_fuel: f64,
    pub initial_food: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetConfig {
    /// Offset from the world centre
    pub center: DVec2,
    pub radius: f64,
    /// Landing here wins
    #[serde(default)]
    pub goal: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            steps_per_second: STEPS_PER_SECOND,
            seed: 0x5eed_0f_1057,
            world: WorldConfig::default(),
            stars: StarConfig::default(),
            flight: FlightConfig::default(),
            resources: ResourceConfig::default(),
            planets: vec![
                PlanetConfig {
                    center: DVec2::new(1_400.0, 1_300.0),
                    radius: 500.0,
                    goal: false,
                },
                PlanetConfig {
                    center: DVec2::new(-6_000.0, 4_000.0),
                    radius: 800.0,
                    goal: true,
                },
            ],
            craft_start: None,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_size: DVec2::splat(WORLD_SIZE),
            view_size: DVec2::splat(VIEW_SIZE),
            screen_size: DVec2::new(1280.0, 720.0),
        }
    }
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            min_depth: MIN_DEPTH,
            max_depth: MAX_DEPTH,
            depth_layers: DEPTH_LAYERS,
            count: STAR_COUNT,
        }
    }
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            thrust: 5.0,
            steer_acceleration: 0.05,
            fire_rate: 1.0,
            gravity: 0.04,
            gravity_range: 2.0,
            landing_speed: 100.0,
            landing_angle: PI / 20.0,
            brake_alignment_window: FRAC_PI_4,
            brake_min_speed: 0.1,
            brake_thrust: 0.5,
        }
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            // One minute of full thrust at 60 steps/s
            fuel_rate: 1.0 / 3_600.0,
            // Three minutes of flight
            food_rate: 1.0 / 10_800.0,
            initial_fuel: 1.0,
            initial_food: 1.0,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.steps_per_second > 0.0 && self.steps_per_second.is_finite()) {
            return Err(ConfigError::InvalidStepRate(self.steps_per_second));
        }
        let stars = &self.stars;
        if !(stars.min_depth > 0.0
            && stars.max_depth > stars.min_depth
            && stars.max_depth.is_finite())
        {
            return Err(ConfigError::InvalidDepthRange {
                min: stars.min_depth,
                max: stars.max_depth,
            });
        }
        if stars.depth_layers == 0 {
            return Err(ConfigError::NoDepthLayers);
        }
        self.world_context()?;
        for (index, planet) in self.planets.iter().enumerate() {
            if !(planet.radius > 0.0 && planet.radius.is_finite()) {
                return Err(ConfigError::InvalidPlanet {
                    index,
                    radius: planet.radius,
                });
            }
        }
        Ok(())
    }

    /// Fresh world for this configuration, viewport centred on the craft start
    pub fn world_context(&self) -> Result<WorldContext, ConfigError> {
        let mut world = WorldContext::new(
            self.world.world_size,
            self.world.view_size,
            self.world.screen_size,
            self.stars.min_depth,
        )?;
        world.center_view_on(self.craft_position(&world));
        Ok(world)
    }

    pub fn craft_position(&self, world: &WorldContext) -> DVec2 {
        self.craft_start.unwrap_or_else(|| world.center())
    }
}
