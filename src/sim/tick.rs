//! Per-tick driver
//!
//! `Simulation` is the explicit context the kernel runs in: the balls, one
//! aim planner per ball, the adaptive material model and the sim clock. The
//! host calls `tick` once per simulation step after its physics engine has
//! stepped, passing the collision events from that step.
//!
//! `HeadlessGame` bundles a `Simulation` with `ReferenceEngine` and a
//! `StaticWorld` so the whole loop can run without a game engine.

use std::collections::BTreeMap;

use glam::Vec2;

use super::boost::{Boost, BoostForceRule};
use super::dynamics::DynamicPhysicsProfile;
use super::engine::{CollisionEvent, ReferenceEngine};
use super::material::PhysicsMaterialSink;
use super::planner::{ReflectionPath, ReflectionPathPlanner};
use super::query::{OwnerTag, SpatialQuery, StaticWorld};
use super::segments::{RenderSegment, to_segments};
use super::state::{Ball, BallId};
use crate::config::{ConfigError, GameConfig};

/// Player aim for one ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimInput {
    pub ball: BallId,
    pub direction: Vec2,
}

/// Explicit velocity assignment for one ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchInput {
    pub ball: BallId,
    pub velocity: Vec2,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Current aim (None = aim UI hidden)
    pub aim: Option<AimInput>,
    /// Launch this tick
    pub launch: Option<LaunchInput>,
}

/// What the host needs to draw and react to after a tick
#[derive(Debug, Clone, Default)]
pub struct TickOutput {
    /// Predicted path for the aimed ball
    pub aim_path: Option<ReflectionPath>,
    /// Drawable aim line
    pub aim_segments: Vec<RenderSegment>,
    /// Balls snapped to rest this tick
    pub stopped: Vec<BallId>,
    pub boosts: Vec<Boost>,
}

/// Kernel state for one play session
#[derive(Debug)]
pub struct Simulation {
    pub config: GameConfig,
    /// Balls sorted by id
    pub balls: Vec<Ball>,
    planners: BTreeMap<BallId, ReflectionPathPlanner>,
    pub dynamics: DynamicPhysicsProfile,
    /// Sim clock (seconds)
    pub now: f32,
    pub time_ticks: u64,
    /// Full-precision clock; `now` is derived from it
    clock: f64,
    next_id: u32,
}

impl Simulation {
    /// Start a session; rejects configs the kernel cannot run with
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            balls: Vec::new(),
            planners: BTreeMap::new(),
            dynamics: DynamicPhysicsProfile::new(),
            now: 0.0,
            time_ticks: 0,
            clock: 0.0,
            next_id: 1,
        })
    }

    /// Spawn a resting ball at `pos` and push its baseline material
    pub fn spawn_ball<S: PhysicsMaterialSink + ?Sized>(&mut self, pos: Vec2, sink: &mut S) -> BallId {
        let id = BallId(self.next_id);
        self.next_id += 1;

        let mut ball = Ball::new(id, pos, &self.config.profile, self.now);
        sink.set_velocity(id, Vec2::ZERO);
        self.dynamics
            .reset_to_baseline(id, &mut ball.runtime, &self.config.profile, sink, self.now);
        self.balls.push(ball);
        self.planners.insert(
            id,
            ReflectionPathPlanner::new(self.config.aim.clone(), OwnerTag::Ball(id)),
        );
        id
    }

    pub fn despawn_ball(&mut self, id: BallId) {
        self.balls.retain(|b| b.id != id);
        self.planners.remove(&id);
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn planner(&self, id: BallId) -> Option<&ReflectionPathPlanner> {
        self.planners.get(&id)
    }

    pub fn planner_mut(&mut self, id: BallId) -> Option<&mut ReflectionPathPlanner> {
        self.planners.get_mut(&id)
    }

    /// Update a ball's position from the physics engine
    pub fn set_position(&mut self, id: BallId, pos: Vec2) {
        if let Some(ball) = self.balls.iter_mut().find(|b| b.id == id) {
            ball.pos = pos;
        }
    }

    /// Hide every aim line (aim UI closed)
    pub fn clear_aim(&mut self) {
        for planner in self.planners.values_mut() {
            planner.clear_path();
        }
    }

    /// Advance the kernel by one step
    pub fn tick<Q, S>(
        &mut self,
        world: &Q,
        sink: &mut S,
        input: &TickInput,
        events: &[CollisionEvent],
        dt: f32,
    ) -> TickOutput
    where
        Q: SpatialQuery + ?Sized,
        S: PhysicsMaterialSink + ?Sized,
    {
        self.time_ticks += 1;
        self.clock += f64::from(dt);
        self.now = self.clock as f32;
        let now = self.now;
        let profile = &self.config.profile;
        let mut output = TickOutput::default();

        if let Some(launch) = input.launch {
            if let Some(ball) = self.balls.iter_mut().find(|b| b.id == launch.ball) {
                self.dynamics
                    .launch(ball.id, &mut ball.runtime, profile, sink, launch.velocity, now);
                if let Some(planner) = self.planners.get_mut(&ball.id) {
                    planner.clear_path();
                }
            }
        }

        // Boosts before tuning so the speed cap sees the boosted velocity
        for event in events {
            let Some(ball) = self.balls.iter().find(|b| b.id == event.ball) else {
                continue;
            };
            let boosts = BoostForceRule::on_collision(ball.id, ball.pos, &event.contact, profile, sink);
            output.boosts.extend(boosts);
        }

        for ball in &mut self.balls {
            let was_moving = ball.runtime.is_moving;
            let outcome = self
                .dynamics
                .tick(ball.id, &mut ball.runtime, profile, sink, now);
            if outcome.stopped {
                output.stopped.push(ball.id);
            }
            if ball.runtime.is_moving && !was_moving {
                if let Some(planner) = self.planners.get_mut(&ball.id) {
                    planner.clear_path();
                }
            }
        }

        match input.aim {
            Some(aim) => {
                let target = self.balls.iter().find(|b| b.id == aim.ball);
                let planner = self.planners.get_mut(&aim.ball);
                if let (Some(ball), Some(planner)) = (target, planner) {
                    if ball.is_at_rest() {
                        let path = planner.compute_path(world, ball.pos, aim.direction, ball.radius);
                        output.aim_segments = to_segments(&path, planner.config().line_width);
                        output.aim_path = Some(path);
                    } else {
                        planner.clear_path();
                    }
                }
            }
            None => self.clear_aim(),
        }

        output
    }
}

/// A `Simulation` driven by the reference engine
#[derive(Debug)]
pub struct HeadlessGame {
    pub sim: Simulation,
    pub world: StaticWorld,
    pub engine: ReferenceEngine,
}

impl HeadlessGame {
    pub fn new(config: GameConfig, world: StaticWorld) -> Result<Self, ConfigError> {
        Ok(Self {
            sim: Simulation::new(config)?,
            world,
            engine: ReferenceEngine::new(),
        })
    }

    pub fn spawn_ball(&mut self, pos: Vec2) -> BallId {
        let id = self.sim.spawn_ball(pos, &mut self.engine);
        let radius = self.sim.config.profile.radius;
        self.engine.place(id, pos, radius);
        self.world.set_ball(id, pos, radius);
        id
    }

    /// Remove a ball from the kernel, the engine and the query world
    pub fn despawn_ball(&mut self, id: BallId) {
        self.sim.despawn_ball(id);
        self.engine.remove(id);
        self.world.remove_ball(id);
    }

    /// Step physics, sync positions, then run the kernel
    pub fn step(&mut self, input: &TickInput, dt: f32) -> TickOutput {
        let events = self.engine.step(&self.world, dt);
        let moved: Vec<_> = self
            .sim
            .balls
            .iter()
            .filter_map(|b| self.engine.position(b.id).map(|pos| (b.id, pos, b.radius)))
            .collect();
        for (id, pos, radius) in moved {
            self.sim.set_position(id, pos);
            self.world.set_ball(id, pos, radius);
        }
        self.sim
            .tick(&self.world, &mut self.engine, input, &events, dt)
    }

    /// Whether every ball is at rest
    pub fn all_at_rest(&self) -> bool {
        self.sim.balls.iter().all(Ball::is_at_rest)
    }
}
