//! Configuration errors
//!
//! Everything here is fatal at construction time: a world, index or
//! scheduler built from a bad configuration would render nothing or wrap
//! into NaN, so it is rejected up front.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid step rate {0} (must be positive)")]
    InvalidStepRate(f64),

    #[error("world size {width}x{height} must be positive")]
    EmptyWorld { width: f64, height: f64 },

    #[error("viewport size {width}x{height} must be positive")]
    EmptyViewport { width: f64, height: f64 },

    #[error("world size {world} on axis {axis} must exceed the seam margin {margin}")]
    WorldSmallerThanMargin { axis: usize, world: f64, margin: f64 },

    #[error("invalid depth range [{min}, {max}] (need 0 < min < max)")]
    InvalidDepthRange { min: f64, max: f64 },

    #[error("star index needs at least one depth layer")]
    NoDepthLayers,

    #[error("depth layer {layer} has no bins on axis {axis}")]
    EmptyBins { layer: usize, axis: usize },

    #[error("planet {index} has non-positive radius {radius}")]
    InvalidPlanet { index: usize, radius: f64 },
}
