//! Authored physics profile for a ball type
//!
//! Immutable data shared by every ball of a type. Loaded from JSON alongside
//! the aim configuration (see `crate::config`).

use serde::{Deserialize, Serialize};

use super::curve::SampledCurve;
use crate::config::ConfigError;

/// Baseline material, speed response curves and tuning limits for a ball type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallPhysicsProfile {
    // === Body ===
    pub mass: f32,
    pub radius: f32,

    // === Baseline material ===
    /// Baseline bounciness in [0, 1]
    pub bounce_damping: f32,
    pub friction: f32,
    pub linear_damping: f32,

    // === Motion limits ===
    /// Speed at or below which the ball counts as stopped
    pub stop_threshold: f32,
    pub max_speed: f32,

    // === Boost ===
    pub boost_force: f32,
    pub boost_multiplier: f32,
    pub boost_speed_threshold: f32,

    // === Dynamic physics ===
    pub enable_dynamic_physics: bool,
    /// Normalized speed -> bounciness blend
    pub bounciness_curve: SampledCurve,
    /// Normalized speed -> damping blend
    pub damping_curve: SampledCurve,
    pub min_bounciness: f32,
    pub max_bounciness: f32,
    pub min_damping: f32,
    pub max_damping: f32,

    // === Time damping ===
    pub enable_time_damping: bool,
    /// Extra damping per second once the grace period is over
    pub time_damping_rate: f32,
    pub max_time_damping: f32,
    /// Grace period (seconds of movement) before time damping kicks in
    pub time_damping_start_time: f32,

    // === Write rate limiting ===
    pub update_threshold: f32,
    /// Minimum seconds between material pushes
    pub update_interval: f32,
}

impl Default for BallPhysicsProfile {
    fn default() -> Self {
        Self {
            mass: 1.0,
            radius: crate::consts::BALL_RADIUS,

            bounce_damping: 0.8,
            friction: 0.0,
            linear_damping: 0.5,

            stop_threshold: 0.1,
            max_speed: 20.0,

            boost_force: 5.0,
            boost_multiplier: 1.5,
            boost_speed_threshold: 8.0,

            enable_dynamic_physics: true,
            // Faster balls keep more energy and bleed less of it
            bounciness_curve: SampledCurve::linear(),
            damping_curve: SampledCurve::from_points(&[(0.0, 1.0), (1.0, 0.0)]),
            min_bounciness: 0.6,
            max_bounciness: 0.95,
            min_damping: 0.1,
            max_damping: 1.0,

            enable_time_damping: true,
            time_damping_rate: 0.05,
            max_time_damping: 0.5,
            time_damping_start_time: 2.0,

            update_threshold: 0.05,
            update_interval: 0.1,
        }
    }
}

impl BallPhysicsProfile {
    /// Reject authored values the tuning model cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !(self.mass > 0.0) {
            return invalid(format!("mass must be positive, got {}", self.mass));
        }
        if !(self.radius > 0.0) {
            return invalid(format!("radius must be positive, got {}", self.radius));
        }
        if !(0.0..=1.0).contains(&self.bounce_damping) {
            return invalid(format!(
                "bounce_damping must be in [0, 1], got {}",
                self.bounce_damping
            ));
        }
        if !(self.max_speed > 0.0) {
            return invalid(format!("max_speed must be positive, got {}", self.max_speed));
        }
        if self.stop_threshold < 0.0 {
            return invalid(format!(
                "stop_threshold must not be negative, got {}",
                self.stop_threshold
            ));
        }
        if self.min_bounciness > self.max_bounciness {
            return invalid(format!(
                "min_bounciness {} exceeds max_bounciness {}",
                self.min_bounciness, self.max_bounciness
            ));
        }
        if self.min_damping > self.max_damping {
            return invalid(format!(
                "min_damping {} exceeds max_damping {}",
                self.min_damping, self.max_damping
            ));
        }
        if self.update_interval < 0.0 || self.update_threshold < 0.0 {
            return invalid("update_interval and update_threshold must not be negative".into());
        }
        if self.time_damping_rate < 0.0 || self.max_time_damping < 0.0 {
            return invalid("time damping rate and cap must not be negative".into());
        }
        if !self.bounciness_curve.is_monotonic() {
            return invalid("bounciness_curve must be monotonic".into());
        }
        if !self.damping_curve.is_monotonic() {
            return invalid("damping_curve must be monotonic".into());
        }
        Ok(())
    }

    /// Impulse magnitude granted by a boost
    #[inline]
    pub fn boost_impulse(&self) -> f32 {
        self.boost_force * self.boost_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        assert!(BallPhysicsProfile::default().validate().is_ok());
    }

    #[test]
    fn test_curves_must_be_monotonic() {
        let profile = BallPhysicsProfile::default();
        assert!(profile.bounciness_curve.is_monotonic());
        assert!(profile.damping_curve.is_monotonic());

        let zig_zag = SampledCurve::from_points(&[(0.0, 0.0), (0.5, 1.0), (1.0, 0.3)]);
        let profile = BallPhysicsProfile {
            damping_curve: zig_zag.clone(),
            ..Default::default()
        };
        assert!(matches!(profile.validate(), Err(ConfigError::Invalid(_))));

        let profile = BallPhysicsProfile {
            bounciness_curve: zig_zag,
            ..Default::default()
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let profile = BallPhysicsProfile {
            min_bounciness: 0.9,
            max_bounciness: 0.5,
            ..Default::default()
        };
        assert!(matches!(profile.validate(), Err(ConfigError::Invalid(_))));

        let profile = BallPhysicsProfile {
            min_damping: 2.0,
            ..Default::default()
        };
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_bad_scalars_rejected() {
        let cases = [
            BallPhysicsProfile {
                max_speed: 0.0,
                ..Default::default()
            },
            BallPhysicsProfile {
                bounce_damping: 1.5,
                ..Default::default()
            },
            BallPhysicsProfile {
                mass: f32::NAN,
                ..Default::default()
            },
            BallPhysicsProfile {
                update_interval: -0.1,
                ..Default::default()
            },
        ];
        for profile in cases {
            assert!(profile.validate().is_err(), "{profile:?}");
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let profile: BallPhysicsProfile =
            serde_json::from_str(r#"{ "max_speed": 30.0, "boost_force": 2.0 }"#).unwrap();
        assert_eq!(profile.max_speed, 30.0);
        assert_eq!(profile.boost_impulse(), 2.0 * 1.5);
        assert_eq!(profile.min_bounciness, 0.6);
    }
}
