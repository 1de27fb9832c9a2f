//! Deterministic simulation kernel
//!
//! All prediction and tuning logic lives here. This module must stay pure:
//! - No rendering or platform dependencies
//! - World access only through `SpatialQuery` and `PhysicsMaterialSink`
//! - Stable iteration order (by ball id)

pub mod boost;
pub mod curve;
pub mod dynamics;
pub mod engine;
pub mod material;
pub mod planner;
pub mod profile;
pub mod query;
pub mod segments;
pub mod state;
pub mod tick;

pub use boost::{Boost, BoostForceRule, Contact};
pub use curve::{CurveKey, SampledCurve};
pub use dynamics::{DynamicPhysicsProfile, StopObserver, TuneOutcome};
pub use engine::{CollisionEvent, ReferenceEngine};
pub use material::{PhysicsMaterialSink, RecordingSink};
pub use planner::{PathObserver, ReflectionPath, ReflectionPathPlanner, TrajectoryQuery};
pub use profile::BallPhysicsProfile;
pub use query::{LayerMask, OwnerTag, RayHit, SpatialQuery, StaticWorld};
pub use segments::{RenderSegment, joint_backoff, to_segments};
pub use state::{Ball, BallId, BallRuntimeState};
pub use tick::{AimInput, HeadlessGame, LaunchInput, Simulation, TickInput, TickOutput};
