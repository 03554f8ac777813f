//! WebGPU rendering module
//!
//! CPU-tessellates the engine's draw list into colored triangles. A paint
//! pipeline alpha-blends glyphs and the fade fill over the retained frame;
//! an erase pipeline subtracts alpha for the radial clear zone.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::{FrameVertices, tessellate};
pub use vertex::Vertex;
