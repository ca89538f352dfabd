//! Star field renderable

use super::index::StarIndex;
use super::projector::Projector;
use crate::consts::STAR_WIDTH;
use crate::renderer::colors;
use crate::scheduler::{Color, Frame, Renderable};
use crate::world::WorldContext;

/// Draws the visible part of a `StarIndex` as motion streaks
///
/// Each star is a line from its projected position back along the camera
/// velocity scaled by depth, `STAR_WIDTH * depth` wide.
pub struct StarField {
    index: StarIndex,
    color: Color,
    drawn: usize,
}

impl StarField {
    pub fn new(index: StarIndex) -> Self {
        Self {
            index,
            color: colors::STAR,
            drawn: 0,
        }
    }

    pub fn index(&self) -> &StarIndex {
        &self.index
    }

    /// Stars drawn in the last frame
    pub fn drawn(&self) -> usize {
        self.drawn
    }
}

impl Renderable for StarField {
    fn render(&mut self, world: &WorldContext, frame: &mut Frame<'_>) {
        let projector = Projector::new(world);
        let velocity = world.camera_velocity;
        let color = self.color;
        let mut drawn = 0;
        self.index.for_each_visible(world, |star| {
            let z = star.depth;
            let head = projector.project(star.position, z);
            frame.stroke_line(head, head - velocity * z, STAR_WIDTH * z, color);
            drawn += 1;
        });
        self.drawn = drawn;
    }
}
