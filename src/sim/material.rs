//! Per-body material writes into the physics engine

use std::collections::BTreeMap;

use glam::Vec2;

use super::state::BallId;

/// The physics engine's per-body material and velocity
pub trait PhysicsMaterialSink {
    fn set_bounciness(&mut self, ball: BallId, value: f32);
    fn set_friction(&mut self, ball: BallId, value: f32);
    fn set_linear_damping(&mut self, ball: BallId, value: f32);
    fn set_velocity(&mut self, ball: BallId, vel: Vec2);
    fn velocity(&self, ball: BallId) -> Vec2;

    /// Instantaneous impulse: Δv = impulse / mass
    fn apply_impulse(&mut self, ball: BallId, impulse: Vec2, mass: f32) {
        if mass <= 0.0 {
            return;
        }
        let vel = self.velocity(ball);
        self.set_velocity(ball, vel + impulse / mass);
    }
}

/// Material values as last written
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyMaterial {
    pub bounciness: f32,
    pub friction: f32,
    pub linear_damping: f32,
    pub velocity: Vec2,
}

/// In-memory sink that remembers values and counts writes
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub bodies: BTreeMap<BallId, BodyMaterial>,
    pub bounciness_writes: usize,
    pub friction_writes: usize,
    pub damping_writes: usize,
    pub velocity_writes: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(&self, ball: BallId) -> BodyMaterial {
        self.bodies.get(&ball).copied().unwrap_or_default()
    }

    /// Material writes only (velocity excluded)
    pub fn material_writes(&self) -> usize {
        self.bounciness_writes + self.friction_writes + self.damping_writes
    }
}

impl PhysicsMaterialSink for RecordingSink {
    fn set_bounciness(&mut self, ball: BallId, value: f32) {
        self.bodies.entry(ball).or_default().bounciness = value;
        self.bounciness_writes += 1;
    }

    fn set_friction(&mut self, ball: BallId, value: f32) {
        self.bodies.entry(ball).or_default().friction = value;
        self.friction_writes += 1;
    }

    fn set_linear_damping(&mut self, ball: BallId, value: f32) {
        self.bodies.entry(ball).or_default().linear_damping = value;
        self.damping_writes += 1;
    }

    fn set_velocity(&mut self, ball: BallId, vel: Vec2) {
        self.bodies.entry(ball).or_default().velocity = vel;
        self.velocity_writes += 1;
    }

    fn velocity(&self, ball: BallId) -> Vec2 {
        self.body(ball).velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_counts_writes() {
        let mut sink = RecordingSink::new();
        let id = BallId(1);
        sink.set_bounciness(id, 0.7);
        sink.set_linear_damping(id, 0.3);
        sink.set_linear_damping(id, 0.4);

        assert_eq!(sink.bounciness_writes, 1);
        assert_eq!(sink.damping_writes, 2);
        assert_eq!(sink.material_writes(), 3);
        assert_eq!(sink.body(id).linear_damping, 0.4);
    }

    #[test]
    fn test_apply_impulse_divides_by_mass() {
        let mut sink = RecordingSink::new();
        let id = BallId(2);
        sink.set_velocity(id, Vec2::new(1.0, 0.0));
        sink.apply_impulse(id, Vec2::new(4.0, 2.0), 2.0);
        assert_eq!(sink.velocity(id), Vec2::new(3.0, 1.0));

        // Massless bodies ignore impulses
        sink.apply_impulse(id, Vec2::new(4.0, 2.0), 0.0);
        assert_eq!(sink.velocity(id), Vec2::new(3.0, 1.0));
    }
}
