//! Rendering module
//!
//! `scene` builds a frame as plain vertices from the game state; `pipeline`
//! uploads and draws it with WebGPU.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, arena_to_ndc};
pub use scene::{TouchOverlay, build_frame};
pub use vertex::Vertex;
