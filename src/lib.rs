//! Ricochet Core - predictive aiming and adaptive ball physics
//!
//! Core modules:
//! - `sim`: Deterministic simulation kernel (path prediction, segment geometry,
//!   dynamic physics tuning, boost impulses, driver loop)
//! - `renderer`: Vertex data for the aim line (consumed by the host renderer)
//! - `config`: Authored configuration loaded from JSON

pub mod config;
pub mod renderer;
pub mod sim;

pub use config::{AimConfig, ConfigError, GameConfig};

use glam::Vec2;

/// Kernel configuration constants
pub mod consts {
    /// Fixed simulation timestep for the headless driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Below this length an aim direction is treated as "no aim"
    pub const DIRECTION_EPSILON: f32 = 0.01;
    /// Step past a self-hit before re-casting
    pub const SELF_EXCLUSION_OFFSET: f32 = 0.1;
    /// Hard cap on self-exclusion re-casts before treating the ray as open field
    pub const MAX_SELF_EXCLUSION_RETRIES: u32 = 12;

    /// Prediction defaults (world units)
    pub const MAX_DISTANCE: f32 = 20.0;
    pub const REFLECTION_LENGTH: f32 = 10.0;
    pub const REFLECTION_OFFSET: f32 = 0.01;
    pub const BALL_RADIUS: f32 = 0.5;

    /// Joints flatter than this (radians) get no backoff
    pub const MIN_JOINT_ANGLE: f32 = 0.01;

    /// Speeds above this but under the stop threshold are snapped to zero
    pub const HARD_STOP_FLOOR: f32 = 0.01;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Angle between two vectors in radians, in [0, π]
///
/// Returns 0 when either vector has zero length.
#[inline]
pub fn angle_between(a: Vec2, b: Vec2) -> f32 {
    let denom = (a.length_squared() * b.length_squared()).sqrt();
    if denom <= f32::EPSILON {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

/// Reflect a direction off a surface with unit normal `normal`
///
/// Standard reflection: d' = d - 2(d·n)n
#[inline]
pub fn reflect(dir: Vec2, normal: Vec2) -> Vec2 {
    dir - 2.0 * dir.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
    }

    #[test]
    fn test_angle_between() {
        assert!((angle_between(Vec2::X, Vec2::Y) - FRAC_PI_2).abs() < 1e-5);
        assert!((angle_between(Vec2::X, -Vec2::X) - PI).abs() < 1e-5);
        assert!(angle_between(Vec2::X, Vec2::new(3.0, 0.0)).abs() < 1e-5);
        assert_eq!(angle_between(Vec2::ZERO, Vec2::X), 0.0);
    }

    #[test]
    fn test_reflect() {
        // Moving right, hits vertical wall (normal pointing left)
        let r = reflect(Vec2::new(100.0, 0.0), Vec2::new(-1.0, 0.0));
        assert!((r.x + 100.0).abs() < 0.001);
        assert!(r.y.abs() < 0.001);
    }
}
