//! CPU tessellation of draw calls into GPU-ready vertex batches

pub mod batch;
pub mod shapes;
pub mod vertex;

pub use batch::VertexBatch;
pub use vertex::{Vertex, colors};
