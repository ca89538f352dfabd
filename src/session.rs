//! Session assembly
//!
//! Wires a configured world into a scheduler. Steppable order matters: the
//! craft moves first, then the flight rules judge the new pose, then the
//! key bindings act and the camera catches up with the result.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use glam::DVec2;

use crate::ConfigError;
use crate::config::GameConfig;
use crate::input::{KeyBindings, KeyState};
use crate::renderer::colors;
use crate::scheduler::{RenderSurface, Scheduler, Shared, shared};
use crate::sim::{
    CameraFollow, CameraLayer, Craft, DriftCamera, FlightRules, FlightTuning, GameOutcome, Pilot,
    Planet, ResourceMeter,
};
use crate::stars::{StarField, StarIndex};
use crate::world::WorldContext;

/// Opening screen drift, world units per second
const ATTRACT_DRIFT: DVec2 = DVec2::new(30.0, 30.0);

const FUEL_HUD: DVec2 = DVec2::new(10.0, 10.0);
const FOOD_HUD: DVec2 = DVec2::new(10.0, 40.0);

/// Handles to the player-facing objects of a game session
struct Flight {
    craft: Shared<Craft>,
    fuel: Shared<ResourceMeter>,
    food: Shared<ResourceMeter>,
}

/// A scheduler with everything needed to play (or to idle on the opening
/// screen) already registered
pub struct GameSession {
    scheduler: Scheduler,
    steps_per_second: f64,
    flight: Option<Flight>,
    outcome: Rc<Cell<Option<GameOutcome>>>,
}

impl GameSession {
    /// Playable session: craft, planets, resources and controls
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let world = config.world_context()?;
        let sps = config.steps_per_second;
        let stars = build_stars(config, &world)?;
        let tuning = FlightTuning::new(&config.flight, sps);

        let craft = shared(Craft::new(config.craft_position(&world), tuning.craft));
        let planets: Vec<Shared<Planet>> = config
            .planets
            .iter()
            .map(|p| shared(Planet::new(world.center() + p.center, p.radius, p.goal)))
            .collect();
        let resources = &config.resources;
        let fuel = shared(
            ResourceMeter::new("fuel", resources.fuel_rate, resources.initial_fuel)
                .with_hud(FUEL_HUD, colors::FUEL),
        );
        let food = shared(
            ResourceMeter::new("food", resources.food_rate, resources.initial_food)
                .with_hud(FOOD_HUD, colors::FOOD),
        );

        let outcome = Rc::new(Cell::new(None));
        let mut rules = FlightRules::new(
            craft.clone(),
            planets.clone(),
            fuel.clone(),
            food.clone(),
            tuning,
        );
        {
            let outcome = outcome.clone();
            rules.on_game_over(move |o| outcome.set(Some(o)));
        }

        let mut bindings = KeyBindings::new();
        Pilot::new(craft.clone(), fuel.clone(), tuning.brake).bind(&mut bindings);

        let mut scheduler = Scheduler::new(world, KeyState::default());
        scheduler.set_clear_color(colors::BACKGROUND);
        scheduler.add_steppable(craft.clone());
        scheduler.add_steppable(rules);
        scheduler.add_steppable(bindings);
        scheduler.add_steppable(CameraFollow::new(craft.clone()));

        let mut layer = CameraLayer::new(true).with(StarField::new(stars));
        for planet in &planets {
            layer.add(planet.clone());
        }
        layer.add(craft.clone());
        scheduler.add_renderable(layer);
        scheduler.add_renderable(fuel.clone());
        scheduler.add_renderable(food.clone());

        log::info!(
            "game session ready: {} planet(s), craft at {:?}",
            planets.len(),
            craft.borrow().position()
        );
        Ok(Self {
            scheduler,
            steps_per_second: sps,
            flight: Some(Flight { craft, fuel, food }),
            outcome,
        })
    }

    /// Opening screen: the star field drifting on its own
    pub fn attract(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let world = config.world_context()?;
        let sps = config.steps_per_second;
        let stars = build_stars(config, &world)?;

        let mut scheduler = Scheduler::new(world, KeyState::default());
        scheduler.set_clear_color(colors::BACKGROUND);
        scheduler.add_steppable(DriftCamera::new(ATTRACT_DRIFT, sps));
        scheduler.add_renderable(CameraLayer::new(false).with(StarField::new(stars)));

        log::info!("attract session ready");
        Ok(Self {
            scheduler,
            steps_per_second: sps,
            flight: None,
            outcome: Rc::new(Cell::new(None)),
        })
    }

    /// Start the clocks at the configured step rate
    pub fn start(&mut self, now: Instant) -> Result<(), ConfigError> {
        self.scheduler.start(self.steps_per_second, now)
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Run the steps due at `now`
    pub fn advance(&mut self, now: Instant) -> u32 {
        self.scheduler.advance(now)
    }

    /// Draw a frame if running
    pub fn render(&mut self, surface: &mut dyn RenderSurface) -> bool {
        self.scheduler.on_display_refresh(surface)
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn keys(&mut self) -> &mut KeyState {
        self.scheduler.input_mut()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome.get()
    }

    /// The player's craft; `None` on the opening screen
    pub fn craft(&self) -> Option<&Shared<Craft>> {
        self.flight.as_ref().map(|f| &f.craft)
    }

    pub fn fuel_level(&self) -> Option<f64> {
        self.flight.as_ref().map(|f| f.fuel.borrow().level())
    }

    pub fn food_level(&self) -> Option<f64> {
        self.flight.as_ref().map(|f| f.food.borrow().level())
    }
}

fn build_stars(config: &GameConfig, world: &WorldContext) -> Result<StarIndex, ConfigError> {
    let stars = &config.stars;
    StarIndex::new(
        stars.min_depth,
        stars.max_depth,
        stars.depth_layers,
        stars.count,
        world,
        config.seed,
    )
}
