//! Parallax star field
//!
//! - `grid`: one bucket level over a value range
//! - `index`: depth / x / y nested buckets with seam copies
//! - `projector`: depth-scaled projection around the viewport centre
//! - `field`: renderable that streaks the visible stars

pub mod field;
pub mod grid;
pub mod index;
pub mod projector;

pub use field::StarField;
pub use grid::BinMapper;
pub use index::{Star, StarIndex};
pub use projector::Projector;
