//! Vertex types for the aim line

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl LineVertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Byte stride of one vertex in a buffer
    pub const STRIDE: usize = std::mem::size_of::<LineVertex>();
    /// Byte offset of `color` within a vertex
    pub const COLOR_OFFSET: usize = std::mem::size_of::<[f32; 2]>();

    /// Raw bytes for buffer upload
    pub fn as_bytes(vertices: &[LineVertex]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }
}

/// Colors for aim elements
pub mod colors {
    pub const AIM_LINE: [f32; 4] = [1.0, 1.0, 1.0, 0.85];
    pub const AIM_BOUNCE: [f32; 4] = [1.0, 0.8, 0.3, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        assert_eq!(LineVertex::STRIDE, 24);
        assert_eq!(LineVertex::COLOR_OFFSET, 8);
        let verts = [LineVertex::new(1.0, 2.0, colors::AIM_LINE); 3];
        assert_eq!(LineVertex::as_bytes(&verts).len(), 72);
    }
}
