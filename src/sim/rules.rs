//! Per-tick flight rules: gravity, contact classification and resources
//!
//! Runs in the pre-step phase after the craft has moved, so collisions are
//! tested against the hull placed at this tick's pose.

use std::fmt;

use glam::DVec2;

use super::body::Planet;
use super::brake::BrakeTuning;
use super::craft::{Contact, Craft, CraftTuning, FlightState};
use super::resource::ResourceMeter;
use crate::config::FlightConfig;
use crate::scheduler::{Shared, Steppable, TickContext};
use crate::{direction, squared_distance};

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Win,
    Crashed,
    OutOfFuel,
    OutOfFood,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameOutcome::Win => "win",
            GameOutcome::Crashed => "crashed",
            GameOutcome::OutOfFuel => "out_of_fuel",
            GameOutcome::OutOfFood => "out_of_food",
        })
    }
}

/// Flight constants converted to per-tick units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightTuning {
    pub craft: CraftTuning,
    pub brake: BrakeTuning,
    /// Δv per tick at distance 1 from a body of radius 1
    pub gravity: f64,
    /// Gravity reaches this many radii from a body's centre
    pub gravity_range: f64,
    /// Landing requires `|v|` strictly below this (per tick)
    pub landing_speed: f64,
    /// Landing requires the heading strictly within this of the radial
    pub landing_angle: f64,
}

impl FlightTuning {
    pub fn new(config: &FlightConfig, steps_per_second: f64) -> Self {
        Self {
            craft: CraftTuning::per_tick(
                config.thrust,
                config.steer_acceleration,
                config.fire_rate,
                steps_per_second,
            ),
            brake: BrakeTuning {
                alignment_window: config.brake_alignment_window,
                min_speed: config.brake_min_speed,
                thrust: config.brake_thrust,
            },
            gravity: config.gravity * steps_per_second,
            gravity_range: config.gravity_range,
            landing_speed: config.landing_speed / steps_per_second,
            landing_angle: config.landing_angle,
        }
    }
}

type Notifier = Box<dyn FnOnce(GameOutcome)>;

pub struct FlightRules {
    craft: Shared<Craft>,
    planets: Vec<Shared<Planet>>,
    fuel: Shared<ResourceMeter>,
    food: Shared<ResourceMeter>,
    tuning: FlightTuning,
    outcome: Option<GameOutcome>,
    notifier: Option<Notifier>,
}

impl FlightRules {
    pub fn new(
        craft: Shared<Craft>,
        planets: Vec<Shared<Planet>>,
        fuel: Shared<ResourceMeter>,
        food: Shared<ResourceMeter>,
        tuning: FlightTuning,
    ) -> Self {
        Self {
            craft,
            planets,
            fuel,
            food,
            tuning,
            outcome: None,
            notifier: None,
        }
    }

    /// Called once, with the first outcome reached
    pub fn on_game_over(&mut self, notify: impl FnOnce(GameOutcome) + 'static) {
        self.notifier = Some(Box::new(notify));
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn tuning(&self) -> &FlightTuning {
        &self.tuning
    }

    fn finish(&mut self, outcome: GameOutcome) {
        if self.outcome.is_some() {
            return;
        }
        log::info!("game over: {outcome}");
        self.outcome = Some(outcome);
        if let Some(notify) = self.notifier.take() {
            notify(outcome);
        }
    }

    /// Pull towards every body within range
    fn apply_gravity(&self, craft: &mut Craft) {
        let pos = craft.position();
        for planet in &self.planets {
            let planet = planet.borrow();
            let reach = self.tuning.gravity_range * planet.radius();
            let d2 = squared_distance(pos, planet.center());
            if d2 >= reach * reach || d2 == 0.0 {
                continue;
            }
            let c = planet.center();
            let dir = direction(pos.x, pos.y, c.x, c.y);
            let dv = self.tuning.gravity * planet.radius() / d2;
            craft.motion.velocity += DVec2::new(dv * dir.cos(), -dv * dir.sin());
        }
    }

    /// First body the hull touches
    ///
    /// Any overlap is a contact, whichever way the craft is moving. Lifting
    /// off works because each thrust tick moves the craft out before the
    /// re-landing stops it.
    fn detect_contact(&self, craft: &mut Craft) -> Option<(Contact, bool)> {
        for planet in &self.planets {
            let planet = planet.borrow();
            if !craft.transformed_hull().intersects_circle(planet.bounds()) {
                continue;
            }
            let contact = craft.touch_down(
                planet.center(),
                self.tuning.landing_speed,
                self.tuning.landing_angle,
            );
            return Some((contact, planet.is_goal()));
        }
        None
    }
}

impl Steppable for FlightRules {
    fn pre_step(&mut self, _ctx: &mut TickContext<'_>) {
        let craft = self.craft.clone();
        let mut craft = craft.borrow_mut();

        if craft.state() == FlightState::Flying {
            self.apply_gravity(&mut craft);
            match self.detect_contact(&mut craft) {
                Some((Contact::Landed, true)) => self.finish(GameOutcome::Win),
                Some((Contact::Crashed { .. }, _)) => self.finish(GameOutcome::Crashed),
                _ => {}
            }
        }

        let mut fuel = self.fuel.borrow_mut();
        let mut food = self.food.borrow_mut();
        match craft.state() {
            FlightState::Flying => food.consume(1.0),
            FlightState::Landed => {
                fuel.generate();
                food.generate();
            }
            FlightState::Dead => {}
        }

        if craft.state() == FlightState::Flying {
            let starved = if fuel.is_depleted() {
                Some(GameOutcome::OutOfFuel)
            } else if food.is_depleted() {
                Some(GameOutcome::OutOfFood)
            } else {
                None
            };
            drop(fuel);
            drop(food);
            if let Some(outcome) = starved {
                craft.kill();
                self.finish(outcome);
            }
        }
    }
}
