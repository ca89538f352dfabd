//! Three-level star index: depth layer, then x band, then y band
//!
//! Bins shrink with depth so that one bin is roughly one viewport wide at the
//! shallowest depth of its layer. A render query touches only the bins the
//! viewport overlaps, never the whole star population.
//!
//! Stars are scattered over `[0, world - margin)` on each axis. Any star
//! within one margin of the low edge is copied to `world - margin + x` (and
//! the same for y, corners included), so a viewport straddling a seam finds
//! both sides without wrapping at query time.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::grid::BinMapper;
use super::projector::Projector;
use crate::ConfigError;
use crate::world::WorldContext;

/// One background point; immutable once placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: DVec2,
    pub depth: f64,
}

type Column = BinMapper<Vec<Star>>;
type Layer = BinMapper<Column>;

#[derive(Debug, Clone)]
pub struct StarIndex {
    layers: BinMapper<Layer>,
    margin: DVec2,
    world_size: DVec2,
    star_count: usize,
    stored: usize,
}

impl StarIndex {
    /// Build the index and scatter `star_count` stars with a seeded RNG
    pub fn new(
        min_depth: f64,
        max_depth: f64,
        depth_layers: usize,
        star_count: usize,
        world: &WorldContext,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let mut index = Self::empty(min_depth, max_depth, depth_layers, world)?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let period = index.world_size - index.margin;
        for _ in 0..star_count {
            let depth = min_depth + rng.random::<f64>() * (max_depth - min_depth);
            let x = rng.random::<f64>() * period.x;
            let y = rng.random::<f64>() * period.y;
            index.insert(Star {
                position: DVec2::new(x, y),
                depth,
            });
        }

        log::info!(
            "star index built: {} stars ({} stored with seam copies), bins per layer {:?}",
            index.star_count,
            index.stored,
            index.bin_counts()
        );
        Ok(index)
    }

    /// Allocate every bin with no stars in it
    pub fn empty(
        min_depth: f64,
        max_depth: f64,
        depth_layers: usize,
        world: &WorldContext,
    ) -> Result<Self, ConfigError> {
        if !(min_depth > 0.0 && max_depth > min_depth && max_depth.is_finite()) {
            return Err(ConfigError::InvalidDepthRange {
                min: min_depth,
                max: max_depth,
            });
        }
        if depth_layers == 0 {
            return Err(ConfigError::NoDepthLayers);
        }

        let world_size = world.world_size;
        let view_size = world.view_size;
        let margin = view_size / min_depth;
        for axis in 0..2 {
            if !(world_size[axis] > margin[axis]) {
                return Err(ConfigError::WorldSmallerThanMargin {
                    axis,
                    world: world_size[axis],
                    margin: margin[axis],
                });
            }
        }

        // Bin counts depend on the layer's lower depth, so check them all first
        let step = (max_depth - min_depth) / depth_layers as f64;
        let mut counts = Vec::with_capacity(depth_layers);
        for layer in 0..depth_layers {
            let layer_min = min_depth + layer as f64 * step;
            let bins = (world_size / (view_size / layer_min)).round();
            for axis in 0..2 {
                if !(bins[axis] >= 1.0) {
                    return Err(ConfigError::EmptyBins { layer, axis });
                }
            }
            counts.push((bins.x as usize, bins.y as usize));
        }

        let layers = BinMapper::new(min_depth, max_depth, depth_layers, |layer, _| {
            let (nx, ny) = counts[layer];
            BinMapper::new(0.0, world_size.x, nx, |_, _| {
                BinMapper::new(0.0, world_size.y, ny, |_, _| Vec::new())
            })
        });

        Ok(Self {
            layers,
            margin,
            world_size,
            star_count: 0,
            stored: 0,
        })
    }

    /// Add one star plus its seam copies
    pub fn insert(&mut self, star: Star) {
        self.star_count += 1;
        self.insert_with_mirrors(star);
    }

    fn insert_with_mirrors(&mut self, star: Star) {
        let period = self.world_size - self.margin;
        let Star { position, depth } = star;

        if position.x < self.margin.x {
            self.push(Star {
                position: DVec2::new(period.x + position.x, position.y),
                depth,
            });
        }
        if position.y < self.margin.y {
            // Recursing also produces the corner copy
            self.insert_with_mirrors(Star {
                position: DVec2::new(position.x, period.y + position.y),
                depth,
            });
        }
        self.push(star);
    }

    fn push(&mut self, star: Star) {
        self.layers
            .bin_mut(star.depth)
            .bin_mut(star.position.x)
            .bin_mut(star.position.y)
            .push(star);
        self.stored += 1;
    }

    /// Stars inserted, not counting seam copies
    #[inline]
    pub fn star_count(&self) -> usize {
        self.star_count
    }

    /// Points held in the leaves, seam copies included
    #[inline]
    pub fn stored_len(&self) -> usize {
        self.stored
    }

    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Seam band width on each axis
    #[inline]
    pub fn margin(&self) -> DVec2 {
        self.margin
    }

    /// (x bins, y bins) for each layer, shallowest first
    pub fn bin_counts(&self) -> Vec<(usize, usize)> {
        self.layers
            .iter()
            .map(|(_, layer)| {
                let ny = layer.get(0).map_or(0, BinMapper::len);
                (layer.len(), ny)
            })
            .collect()
    }

    /// Visit every star in bins overlapping the world rectangle `[low, high]`
    /// on the given layer
    ///
    /// Results are per bin, so stars just outside the rectangle may be
    /// visited too.
    pub fn for_each_in_rect(
        &self,
        layer: usize,
        low: DVec2,
        high: DVec2,
        mut visit: impl FnMut(&Star),
    ) {
        let Some(layer) = self.layers.get(layer) else {
            return;
        };
        for i in layer.span(low.x, high.x) {
            let Some(column) = layer.get(i) else { continue };
            for j in column.span(low.y, high.y) {
                if let Some(stars) = column.get(j) {
                    stars.iter().for_each(&mut visit);
                }
            }
        }
    }

    /// Visit every star whose bin can appear in the current viewport
    ///
    /// Each layer is queried with the viewport unprojected at the layer's
    /// lower depth, the widest footprint any of its stars can have.
    pub fn for_each_visible(&self, world: &WorldContext, mut visit: impl FnMut(&Star)) {
        let projector = Projector::new(world);
        for (layer, (layer_min, _)) in self.layers.iter().enumerate() {
            let (low, high) = projector.visible_bounds(layer_min);
            self.for_each_in_rect(layer, low, high, &mut visit);
        }
    }

    /// Every stored point, seam copies included
    pub fn iter(&self) -> impl Iterator<Item = &Star> + '_ {
        self.layers.iter().flat_map(|(_, layer)| {
            layer
                .iter()
                .flat_map(|(_, column)| column.iter().flat_map(|(_, stars)| stars.iter()))
        })
    }
}
