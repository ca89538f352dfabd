//! 2D collision geometry
//!
//! All predicates are pure and allocation-free so they can run every
//! simulation step. Degenerate input (parallel or zero-length segments)
//! resolves to "no intersection" through explicit guards.

pub mod segment;
pub mod shape;

pub use segment::{Segment, solve_quadratic};
pub use shape::{Circle, Polygon, Shape};
