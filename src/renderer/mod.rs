//! Aim line vertex data
//!
//! The host renderer owns the GPU pipeline; this module only turns render
//! segments into plain vertex buffers it can upload as-is.

pub mod shapes;
pub mod vertex;

pub use shapes::{aim_line, ball_marker};
pub use vertex::LineVertex;
