//! Speed-driven material tuning
//!
//! Every tick a moving ball's bounciness and linear damping are retargeted
//! from its speed (through the profile's response curves) and from how long
//! it has been moving. Writes to the physics engine are rate limited: a new
//! value is pushed only once `update_interval` has passed since the last push
//! AND the target moved more than `update_threshold` from what was pushed.
//!
//! A launch resets the ball to its baseline material so every shot starts
//! from the same physics.

use glam::Vec2;

use super::material::PhysicsMaterialSink;
use super::profile::BallPhysicsProfile;
use super::state::{BallId, BallRuntimeState};
use crate::consts::HARD_STOP_FLOOR;
use crate::lerp;

/// Notified when a slow ball is snapped to rest
pub trait StopObserver {
    fn on_ball_stopped(&mut self, ball: BallId);
}

impl<F: FnMut(BallId)> StopObserver for F {
    fn on_ball_stopped(&mut self, ball: BallId) {
        self(ball)
    }
}

/// What one tuning tick decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuneOutcome {
    pub bounciness: f32,
    pub damping: f32,
    pub pushed_bounciness: bool,
    pub pushed_damping: bool,
    /// The ball was snapped to rest this tick
    pub stopped: bool,
}

impl TuneOutcome {
    pub fn pushed(&self) -> bool {
        self.pushed_bounciness || self.pushed_damping
    }
}

/// Target (bounciness, damping) for a normalized speed, before time damping
///
/// Curve output is clamped to [0, 1] so targets never leave the profile bounds.
pub fn speed_targets(profile: &BallPhysicsProfile, norm_speed: f32) -> (f32, f32) {
    let t = norm_speed.clamp(0.0, 1.0);
    let bounce_t = profile.bounciness_curve.sample(t).clamp(0.0, 1.0);
    let damping_t = profile.damping_curve.sample(t).clamp(0.0, 1.0);
    (
        lerp(profile.min_bounciness, profile.max_bounciness, bounce_t),
        lerp(profile.min_damping, profile.max_damping, damping_t),
    )
}

/// Extra damping after `elapsed` seconds of movement
pub fn time_damping(profile: &BallPhysicsProfile, elapsed: f32) -> f32 {
    if !profile.enable_time_damping || elapsed <= profile.time_damping_start_time {
        return 0.0;
    }
    (profile.time_damping_rate * (elapsed - profile.time_damping_start_time))
        .min(profile.max_time_damping)
}

/// Adaptive material model, one instance shared by all balls
#[derive(Default)]
pub struct DynamicPhysicsProfile {
    stop_observers: Vec<Box<dyn StopObserver>>,
}

impl std::fmt::Debug for DynamicPhysicsProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicPhysicsProfile")
            .field("stop_observers", &self.stop_observers.len())
            .finish()
    }
}

impl DynamicPhysicsProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stop_observer(&mut self, observer: Box<dyn StopObserver>) {
        self.stop_observers.push(observer);
    }

    /// Retune one ball for this tick
    pub fn tick<S: PhysicsMaterialSink + ?Sized>(
        &mut self,
        ball: BallId,
        state: &mut BallRuntimeState,
        profile: &BallPhysicsProfile,
        sink: &mut S,
        now: f32,
    ) -> TuneOutcome {
        let mut velocity = sink.velocity(ball);
        if !velocity.is_finite() {
            log::warn!("{:?} reported non-finite velocity; treating as at rest", ball);
            velocity = Vec2::ZERO;
        }
        let mut speed = velocity.length();

        if speed > profile.max_speed {
            velocity *= profile.max_speed / speed;
            speed = profile.max_speed;
            sink.set_velocity(ball, velocity);
        }

        let norm_speed = if profile.max_speed > 0.0 {
            (speed / profile.max_speed).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let (target_bounciness, mut target_damping) = speed_targets(profile, norm_speed);

        // Movement session tracking
        let mut stopped = false;
        if speed > profile.stop_threshold {
            if !state.is_moving {
                state.is_moving = true;
                state.movement_start_time = Some(now);
            }
        } else {
            state.is_moving = false;
            state.movement_start_time = None;
            if speed > HARD_STOP_FLOOR {
                velocity = Vec2::ZERO;
                sink.set_velocity(ball, velocity);
                stopped = true;
                log::debug!("{:?} stopped at t={:.3}", ball, now);
                for observer in &mut self.stop_observers {
                    observer.on_ball_stopped(ball);
                }
            }
        }
        state.velocity = velocity;

        if !profile.enable_dynamic_physics {
            return TuneOutcome {
                bounciness: state.last_bounciness,
                damping: state.last_damping,
                pushed_bounciness: false,
                pushed_damping: false,
                stopped,
            };
        }

        target_damping += time_damping(profile, state.elapsed_moving(now));

        // Rate limited push
        let mut pushed_bounciness = false;
        let mut pushed_damping = false;
        if now - state.last_push_time >= profile.update_interval {
            if (target_bounciness - state.last_bounciness).abs() > profile.update_threshold {
                sink.set_bounciness(ball, target_bounciness);
                state.last_bounciness = target_bounciness;
                pushed_bounciness = true;
            }
            if (target_damping - state.last_damping).abs() > profile.update_threshold {
                sink.set_linear_damping(ball, target_damping);
                state.last_damping = target_damping;
                pushed_damping = true;
            }
            if pushed_bounciness || pushed_damping {
                state.last_push_time = now;
                log::debug!(
                    "{:?} material -> bounciness {:.3}, damping {:.3}",
                    ball,
                    state.last_bounciness,
                    state.last_damping
                );
            }
        }

        TuneOutcome {
            bounciness: target_bounciness,
            damping: target_damping,
            pushed_bounciness,
            pushed_damping,
            stopped,
        }
    }

    /// Push baseline material and forget all adaptive state
    pub fn reset_to_baseline<S: PhysicsMaterialSink + ?Sized>(
        &self,
        ball: BallId,
        state: &mut BallRuntimeState,
        profile: &BallPhysicsProfile,
        sink: &mut S,
        now: f32,
    ) {
        sink.set_bounciness(ball, profile.bounce_damping);
        sink.set_linear_damping(ball, profile.linear_damping);
        sink.set_friction(ball, profile.friction);

        state.last_bounciness = profile.bounce_damping;
        state.last_damping = profile.linear_damping;
        state.last_push_time = now;
        state.is_moving = false;
        state.movement_start_time = None;
    }

    /// Assign a launch velocity (capped at max speed) and reset to baseline
    pub fn launch<S: PhysicsMaterialSink + ?Sized>(
        &self,
        ball: BallId,
        state: &mut BallRuntimeState,
        profile: &BallPhysicsProfile,
        sink: &mut S,
        velocity: Vec2,
        now: f32,
    ) {
        let velocity = if velocity.is_finite() {
            velocity.clamp_length_max(profile.max_speed)
        } else {
            Vec2::ZERO
        };
        sink.set_velocity(ball, velocity);
        state.velocity = velocity;
        self.reset_to_baseline(ball, state, profile, sink, now);
        log::info!("{:?} launched at speed {:.2}", ball, velocity.length());
    }
}
