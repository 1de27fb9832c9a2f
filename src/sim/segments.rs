//! Path to drawable line segments
//!
//! Two strokes of width `w` meeting at a joint overlap past the corner. Each
//! side of an interior joint is pulled back by the miter inset
//! `0.5 * w / tan(θ / 2)` (θ = turn angle) so the strokes meet cleanly.

use glam::Vec2;

use super::planner::ReflectionPath;
use crate::angle_between;
use crate::consts::MIN_JOINT_ANGLE;

/// One drawable leg of the aim line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSegment {
    pub start: Vec2,
    pub end: Vec2,
    /// Final leg (drawn with the fade-out style)
    pub is_last: bool,
}

impl RenderSegment {
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }

    pub fn direction(&self) -> Vec2 {
        (self.end - self.start).normalize_or_zero()
    }
}

/// Inset at a joint between `incoming` and `outgoing` legs
///
/// Nearly straight joints get no inset.
pub fn joint_backoff(incoming: Vec2, outgoing: Vec2, line_width: f32) -> f32 {
    let theta = angle_between(incoming, outgoing);
    if theta < MIN_JOINT_ANGLE {
        return 0.0;
    }
    let backoff = 0.5 * line_width / (theta * 0.5).tan();
    if backoff.is_finite() { backoff.max(0.0) } else { 0.0 }
}

/// Build render segments for a path
pub fn to_segments(path: &ReflectionPath, line_width: f32) -> Vec<RenderSegment> {
    points_to_segments(path.points(), line_width)
}

/// Build render segments for raw points
pub fn points_to_segments(points: &[Vec2], line_width: f32) -> Vec<RenderSegment> {
    if points.len() <= 1 {
        return Vec::new();
    }
    let count = points.len() - 1;

    // backoffs[i] is the inset at points[i]; endpoints have none
    let mut backoffs = vec![0.0; points.len()];
    for i in 1..count {
        let incoming = points[i] - points[i - 1];
        let outgoing = points[i + 1] - points[i];
        backoffs[i] = joint_backoff(incoming, outgoing, line_width);
    }

    (0..count)
        .map(|i| {
            let (a, b) = (points[i], points[i + 1]);
            let len = (b - a).length();
            let dir = (b - a).normalize_or_zero();

            let mut trim_start = backoffs[i];
            let mut trim_end = backoffs[i + 1];
            // Never trim past the other end
            let total = trim_start + trim_end;
            if total > len && total > 0.0 {
                let scale = len / total;
                trim_start *= scale;
                trim_end *= scale;
            }

            RenderSegment {
                start: a + dir * trim_start,
                end: b - dir * trim_end,
                is_last: i == count - 1,
            }
        })
        .collect()
}
