//! Ball entities and their per-ball runtime state
//!
//! `BallRuntimeState` is the mutable half of the dynamic physics model. It
//! carries the state a coroutine would otherwise hold across frames
//! (movement start time, last pushed material values).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::profile::BallPhysicsProfile;
use crate::consts::HARD_STOP_FLOOR;

/// Stable ball identifier (also the physics body handle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// Mutable per-ball physics tuning state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallRuntimeState {
    /// Velocity observed on the last tick
    pub velocity: Vec2,
    /// Bounciness last pushed to the material sink
    pub last_bounciness: f32,
    /// Linear damping last pushed to the material sink
    pub last_damping: f32,
    /// Sim time of the last material push
    pub last_push_time: f32,
    /// Sim time the current movement session started (None when at rest)
    pub movement_start_time: Option<f32>,
    pub is_moving: bool,
}

impl BallRuntimeState {
    /// Fresh state at baseline material values
    pub fn new(profile: &BallPhysicsProfile, now: f32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            last_bounciness: profile.bounce_damping,
            last_damping: profile.linear_damping,
            last_push_time: now,
            movement_start_time: None,
            is_moving: false,
        }
    }

    /// Seconds spent in the current movement session
    pub fn elapsed_moving(&self, now: f32) -> f32 {
        match self.movement_start_time {
            Some(start) if self.is_moving => (now - start).max(0.0),
            _ => 0.0,
        }
    }
}

/// A ball entity as the driver sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    pub pos: Vec2,
    pub radius: f32,
    pub runtime: BallRuntimeState,
}

impl Ball {
    pub fn new(id: BallId, pos: Vec2, profile: &BallPhysicsProfile, now: f32) -> Self {
        Self {
            id,
            pos,
            radius: profile.radius,
            runtime: BallRuntimeState::new(profile, now),
        }
    }

    pub fn speed(&self) -> f32 {
        self.runtime.velocity.length()
    }

    /// Whether the ball is resting and can be aimed
    pub fn is_at_rest(&self) -> bool {
        !self.runtime.is_moving && self.speed() <= HARD_STOP_FLOOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_baseline() {
        let profile = BallPhysicsProfile::default();
        let state = BallRuntimeState::new(&profile, 3.0);
        assert_eq!(state.last_bounciness, profile.bounce_damping);
        assert_eq!(state.last_damping, profile.linear_damping);
        assert_eq!(state.last_push_time, 3.0);
        assert!(!state.is_moving);
        assert_eq!(state.movement_start_time, None);
    }

    #[test]
    fn test_elapsed_moving() {
        let profile = BallPhysicsProfile::default();
        let mut state = BallRuntimeState::new(&profile, 0.0);
        assert_eq!(state.elapsed_moving(5.0), 0.0);

        state.is_moving = true;
        state.movement_start_time = Some(1.5);
        assert!((state.elapsed_moving(4.0) - 2.5).abs() < 1e-6);

        state.is_moving = false;
        assert_eq!(state.elapsed_moving(4.0), 0.0);
    }

    #[test]
    fn test_new_ball_at_rest() {
        let profile = BallPhysicsProfile::default();
        let ball = Ball::new(BallId(1), Vec2::new(2.0, 3.0), &profile, 0.0);
        assert!(ball.is_at_rest());
        assert_eq!(ball.radius, profile.radius);
        assert_eq!(ball.speed(), 0.0);
    }
}
