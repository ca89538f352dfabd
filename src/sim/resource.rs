//! Fuel and food meters

use glam::DVec2;

use crate::consts::RESOURCE_REGEN;
use crate::renderer::colors;
use crate::scheduler::{Color, Frame, Renderable};
use crate::world::WorldContext;

const BAR_SIZE: DVec2 = DVec2::new(100.0, 20.0);
const BAR_INSET: f64 = 2.0;

/// Level in `[0, 1]` drained at a fixed rate per unit of use
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceMeter {
    name: String,
    level: f64,
    rate: f64,
    hud_origin: DVec2,
    color: Color,
}

impl ResourceMeter {
    pub fn new(name: impl Into<String>, rate: f64, initial: f64) -> Self {
        Self {
            name: name.into(),
            level: initial.clamp(0.0, 1.0),
            rate,
            hud_origin: DVec2::ZERO,
            color: colors::FUEL,
        }
    }

    /// Screen position and colour of the HUD bar
    pub fn with_hud(mut self, origin: DVec2, color: Color) -> Self {
        self.hud_origin = origin;
        self.color = color;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn level(&self) -> f64 {
        self.level
    }

    /// How much has been used, `1 - level`
    #[inline]
    pub fn depletion(&self) -> f64 {
        1.0 - self.level
    }

    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.level <= 0.0
    }

    pub fn consume(&mut self, factor: f64) {
        self.level = (self.level - factor * self.rate).max(0.0);
    }

    /// Refill at `RESOURCE_REGEN` times the consumption rate
    pub fn generate(&mut self) {
        self.level = (self.level + RESOURCE_REGEN * self.rate).min(1.0);
    }
}

impl Renderable for ResourceMeter {
    fn render(&mut self, _world: &WorldContext, frame: &mut Frame<'_>) {
        let origin = self.hud_origin;
        let inner = BAR_SIZE - DVec2::splat(2.0 * BAR_INSET);
        let fill = DVec2::new(inner.x * self.level, inner.y);
        let color = self.color;
        frame.screen_space(|f| {
            f.stroke_rect(origin, BAR_SIZE, 1.0, colors::HUD_FRAME);
            if fill.x > 0.0 {
                f.fill_rect(origin + DVec2::splat(BAR_INSET), fill, color);
            }
        });
    }
}
