//! Collision boost impulses
//!
//! A ball moving faster than `boost_speed_threshold` when it collides gets
//! kicked away from whatever it hit. Against another ball the kick is shared:
//! this ball is pushed away, the other ball is pushed the opposite way. The
//! gate is re-checked on every collision, so a ball that has slowed down stops
//! earning boosts.

use glam::Vec2;

use super::material::PhysicsMaterialSink;
use super::profile::BallPhysicsProfile;
use super::state::BallId;

/// What a ball collided with
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    Ball { other: BallId, other_pos: Vec2 },
    Wall { point: Vec2 },
}

/// Impulse granted to a ball by one collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boost {
    pub ball: BallId,
    pub impulse: Vec2,
}

/// Collision-triggered impulse rule
#[derive(Debug, Clone, Copy, Default)]
pub struct BoostForceRule;

impl BoostForceRule {
    /// Whether `speed` earns a boost under `profile`
    #[inline]
    pub fn is_eligible(speed: f32, profile: &BallPhysicsProfile) -> bool {
        speed > profile.boost_speed_threshold
    }

    /// Impulse on `ball` at `ball_pos` for a contact, if it earns one
    pub fn impulse_for(
        ball_pos: Vec2,
        ball_vel: Vec2,
        contact: &Contact,
        profile: &BallPhysicsProfile,
    ) -> Option<Vec2> {
        if !Self::is_eligible(ball_vel.length(), profile) {
            return None;
        }
        let away = match *contact {
            Contact::Ball { other_pos, .. } => ball_pos - other_pos,
            Contact::Wall { point } => ball_pos - point,
        };
        // Coincident positions give no direction
        let dir = away.try_normalize()?;
        Some(dir * profile.boost_impulse())
    }

    /// Apply the boost for one collision of `ball`
    ///
    /// Returns every impulse applied (this ball first).
    pub fn on_collision<S: PhysicsMaterialSink + ?Sized>(
        ball: BallId,
        ball_pos: Vec2,
        contact: &Contact,
        profile: &BallPhysicsProfile,
        sink: &mut S,
    ) -> Vec<Boost> {
        let Some(impulse) = Self::impulse_for(ball_pos, sink.velocity(ball), contact, profile)
        else {
            return Vec::new();
        };

        let mut applied = Vec::with_capacity(2);
        sink.apply_impulse(ball, impulse, profile.mass);
        applied.push(Boost { ball, impulse });

        if let Contact::Ball { other, .. } = *contact {
            sink.apply_impulse(other, -impulse, profile.mass);
            applied.push(Boost {
                ball: other,
                impulse: -impulse,
            });
        }
        log::debug!("{:?} boosted by {:?}", ball, impulse);
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::material::RecordingSink;

    const A: BallId = BallId(1);
    const B: BallId = BallId(2);

    #[test]
    fn test_slow_ball_gets_nothing() {
        let profile = BallPhysicsProfile::default();
        let mut sink = RecordingSink::new();
        sink.set_velocity(A, Vec2::new(profile.boost_speed_threshold, 0.0));

        let contact = Contact::Wall {
            point: Vec2::new(1.0, 0.0),
        };
        let applied = BoostForceRule::on_collision(A, Vec2::ZERO, &contact, &profile, &mut sink);
        assert!(applied.is_empty());
        assert_eq!(sink.velocity(A), Vec2::new(profile.boost_speed_threshold, 0.0));
    }

    #[test]
    fn test_ball_vs_ball_is_equal_and_opposite() {
        let profile = BallPhysicsProfile::default();
        let mut sink = RecordingSink::new();
        sink.set_velocity(A, Vec2::new(10.0, 0.0));

        let contact = Contact::Ball {
            other: B,
            other_pos: Vec2::new(1.0, 0.0),
        };
        let applied = BoostForceRule::on_collision(A, Vec2::ZERO, &contact, &profile, &mut sink);
        assert_eq!(applied.len(), 2);

        let expected = Vec2::new(-profile.boost_impulse(), 0.0);
        assert!((applied[0].impulse - expected).length() < 1e-5);
        assert_eq!(applied[1].ball, B);
        assert!((applied[1].impulse + expected).length() < 1e-5);

        // Δv = J / m on both bodies
        assert!((sink.velocity(A) - Vec2::new(10.0 - 7.5, 0.0)).length() < 1e-5);
        assert!((sink.velocity(B) - Vec2::new(7.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_wall_pushes_ball_only() {
        let profile = BallPhysicsProfile::default();
        let mut sink = RecordingSink::new();
        sink.set_velocity(A, Vec2::new(0.0, -12.0));

        let contact = Contact::Wall {
            point: Vec2::new(0.0, -0.5),
        };
        let applied = BoostForceRule::on_collision(A, Vec2::ZERO, &contact, &profile, &mut sink);
        assert_eq!(applied.len(), 1);
        assert!((applied[0].impulse - Vec2::new(0.0, 7.5)).length() < 1e-5);
        assert!((sink.velocity(A) - Vec2::new(0.0, -4.5)).length() < 1e-5);
    }

    #[test]
    fn test_gate_rechecked_each_collision() {
        let profile = BallPhysicsProfile::default();
        let contact = Contact::Wall { point: Vec2::X };
        assert!(
            BoostForceRule::impulse_for(Vec2::ZERO, Vec2::new(9.0, 0.0), &contact, &profile)
                .is_some()
        );
        assert!(
            BoostForceRule::impulse_for(Vec2::ZERO, Vec2::new(2.0, 0.0), &contact, &profile)
                .is_none()
        );
    }

    #[test]
    fn test_coincident_positions_no_impulse() {
        let profile = BallPhysicsProfile::default();
        let contact = Contact::Ball {
            other: B,
            other_pos: Vec2::ZERO,
        };
        assert!(
            BoostForceRule::impulse_for(Vec2::ZERO, Vec2::new(20.0, 0.0), &contact, &profile)
                .is_none()
        );
    }
}
