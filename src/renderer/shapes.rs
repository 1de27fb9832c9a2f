//! Triangle lists for the aim line

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::LineVertex;
use crate::sim::RenderSegment;

fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Quads for each segment; the last segment fades out toward its end
pub fn aim_line(segments: &[RenderSegment], width: f32, color: [f32; 4]) -> Vec<LineVertex> {
    let mut vertices = Vec::with_capacity(segments.len() * 6);
    let half = width * 0.5;

    for seg in segments {
        let dir = seg.direction();
        if dir == Vec2::ZERO {
            continue; // Fully trimmed away
        }
        // Perpendicular for width
        let perp = Vec2::new(-dir.y, dir.x) * half;

        let color_start = color;
        let color_end = if seg.is_last {
            with_alpha(color, 0.0)
        } else {
            color
        };

        // Quad corners
        let v1a = seg.start + perp;
        let v1b = seg.start - perp;
        let v2a = seg.end + perp;
        let v2b = seg.end - perp;

        // Two triangles
        vertices.push(LineVertex::new(v1a.x, v1a.y, color_start));
        vertices.push(LineVertex::new(v1b.x, v1b.y, color_start));
        vertices.push(LineVertex::new(v2a.x, v2a.y, color_end));

        vertices.push(LineVertex::new(v2a.x, v2a.y, color_end));
        vertices.push(LineVertex::new(v1b.x, v1b.y, color_start));
        vertices.push(LineVertex::new(v2b.x, v2b.y, color_end));
    }

    vertices
}

/// Filled circle, used to mark the bounce point
pub fn ball_marker(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<LineVertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        // Triangle from center to edge
        vertices.push(LineVertex::new(center.x, center.y, color));
        vertices.push(LineVertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(LineVertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}
