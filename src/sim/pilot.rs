//! Keyboard flight controls
//!
//! Space runs the brake assist and is bound first, so thrust and steering
//! keys see the braking flag it sets and stand down for that tick.

use super::brake::{self, BrakeTuning};
use super::craft::Craft;
use super::resource::ResourceMeter;
use crate::input::{Key, KeyBindings};
use crate::scheduler::Shared;

/// Binds the craft controls, charging thrust to the fuel meter
pub struct Pilot {
    craft: Shared<Craft>,
    fuel: Shared<ResourceMeter>,
    brake: BrakeTuning,
}

impl Pilot {
    pub fn new(craft: Shared<Craft>, fuel: Shared<ResourceMeter>, brake: BrakeTuning) -> Self {
        Self { craft, fuel, brake }
    }

    pub fn bind(self, bindings: &mut KeyBindings) {
        let Pilot { craft, fuel, brake } = self;

        {
            let (craft, fuel) = (craft.clone(), fuel.clone());
            bindings.bind(Key::Space, move |_| {
                let burned = brake::apply(&mut craft.borrow_mut(), &brake);
                if burned > 0.0 {
                    fuel.borrow_mut().consume(burned);
                }
            });
        }

        {
            let craft = craft.clone();
            bindings.bind(Key::Up, move |_| {
                let mut craft = craft.borrow_mut();
                if !craft.is_braking() && craft.accelerate(1.0) {
                    fuel.borrow_mut().consume(1.0);
                }
            });
        }

        {
            let craft = craft.clone();
            bindings.bind(Key::Left, move |_| {
                let mut craft = craft.borrow_mut();
                if !craft.is_braking() {
                    craft.steer_left();
                }
            });
        }

        bindings.bind(Key::Right, move |_| {
            let mut craft = craft.borrow_mut();
            if !craft.is_braking() {
                craft.steer_right();
            }
        });
    }
}
