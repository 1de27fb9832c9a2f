//! Minimal headless physics engine
//!
//! Stands in for the game's 2D physics engine when running without it
//! (headless driver, integration tests). Integrates velocity with linear
//! damping, bounces balls off `StaticWorld` walls with their bounciness,
//! resolves ball-ball contacts between equal masses and reports every contact
//! as a `CollisionEvent`. Nothing more.

use std::collections::BTreeMap;

use glam::Vec2;

use super::boost::Contact;
use super::material::PhysicsMaterialSink;
use super::query::StaticWorld;
use super::state::BallId;

/// One body's contact this step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub ball: BallId,
    pub contact: Contact,
}

/// A simulated ball body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub bounciness: f32,
    pub friction: f32,
    pub linear_damping: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: crate::consts::BALL_RADIUS,
            bounciness: 1.0,
            friction: 0.0,
            linear_damping: 0.0,
        }
    }
}

/// Circle bodies in a static world of walls
#[derive(Debug, Clone, Default)]
pub struct ReferenceEngine {
    bodies: BTreeMap<BallId, Body>,
}

impl ReferenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a body at `pos` with the given radius (creating it if needed)
    pub fn place(&mut self, id: BallId, pos: Vec2, radius: f32) {
        let body = self.bodies.entry(id).or_default();
        body.pos = pos;
        body.radius = radius;
    }

    pub fn remove(&mut self, id: BallId) {
        self.bodies.remove(&id);
    }

    pub fn body(&self, id: BallId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub fn position(&self, id: BallId) -> Option<Vec2> {
        self.bodies.get(&id).map(|b| b.pos)
    }

    /// Advance all bodies by `dt`, returning contacts (ordered by ball id)
    pub fn step(&mut self, world: &StaticWorld, dt: f32) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        let ids: Vec<BallId> = self.bodies.keys().copied().collect();

        // Integrate and collide with walls
        for &id in &ids {
            let Some(body) = self.bodies.get_mut(&id) else {
                continue;
            };
            body.vel *= 1.0 / (1.0 + body.linear_damping * dt);
            body.pos += body.vel * dt;

            for wall in &world.walls {
                let closest = wall.closest_point(body.pos);
                let offset = body.pos - closest;
                if offset.length() >= body.radius {
                    continue;
                }
                let normal = offset.try_normalize().unwrap_or_else(|| wall.normal());
                body.pos = closest + normal * body.radius;

                let vn = body.vel.dot(normal);
                if vn < 0.0 {
                    body.vel -= (1.0 + body.bounciness) * vn * normal;
                    events.push(CollisionEvent {
                        ball: id,
                        contact: Contact::Wall { point: closest },
                    });
                }
            }
        }

        // Ball-ball contacts (equal masses)
        for (i, &a_id) in ids.iter().enumerate() {
            for &b_id in &ids[i + 1..] {
                let (Some(&a), Some(&b)) = (self.bodies.get(&a_id), self.bodies.get(&b_id)) else {
                    continue;
                };
                let delta = b.pos - a.pos;
                let dist = delta.length();
                let min_dist = a.radius + b.radius;
                if dist >= min_dist {
                    continue;
                }
                let normal = delta.try_normalize().unwrap_or(Vec2::X);
                let push = normal * (min_dist - dist) * 0.5;
                let (mut a, mut b) = (a, b);
                a.pos -= push;
                b.pos += push;

                let rel = (b.vel - a.vel).dot(normal);
                if rel < 0.0 {
                    let e = a.bounciness.min(b.bounciness);
                    let j = -(1.0 + e) * rel * 0.5;
                    a.vel -= normal * j;
                    b.vel += normal * j;
                    events.push(CollisionEvent {
                        ball: a_id,
                        contact: Contact::Ball {
                            other: b_id,
                            other_pos: b.pos,
                        },
                    });
                    events.push(CollisionEvent {
                        ball: b_id,
                        contact: Contact::Ball {
                            other: a_id,
                            other_pos: a.pos,
                        },
                    });
                }
                self.bodies.insert(a_id, a);
                self.bodies.insert(b_id, b);
            }
        }

        events
    }
}

impl PhysicsMaterialSink for ReferenceEngine {
    fn set_bounciness(&mut self, ball: BallId, value: f32) {
        self.bodies.entry(ball).or_default().bounciness = value;
    }

    fn set_friction(&mut self, ball: BallId, value: f32) {
        self.bodies.entry(ball).or_default().friction = value;
    }

    fn set_linear_damping(&mut self, ball: BallId, value: f32) {
        self.bodies.entry(ball).or_default().linear_damping = value;
    }

    fn set_velocity(&mut self, ball: BallId, vel: Vec2) {
        self.bodies.entry(ball).or_default().vel = vel;
    }

    fn velocity(&self, ball: BallId) -> Vec2 {
        self.bodies.get(&ball).map(|b| b.vel).unwrap_or(Vec2::ZERO)
    }
}
