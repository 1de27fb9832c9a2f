//! Reflection path prediction for the aim line
//!
//! Given where a ball sits, where the player is aiming and the ball radius,
//! predict the path the ball will take: one straight leg, and if that leg
//! hits a surface, a reflected leg after the bounce.
//!
//! Path shapes:
//! - `[start]`: no usable aim direction (nothing to draw)
//! - `[start, end]`: open field, no bounce
//! - `[start, bounce, end]`: one bounce, `end` is either the next hit or the
//!   full reflection length
//!
//! Rays start one ball radius ahead of the ball so its own collider is not the
//! first thing found. Hits on the ball's own colliders are stepped over, up to
//! a fixed number of re-casts; past that the ray is treated as hitting nothing.

use glam::{Vec2, Vec3};

use super::query::{OwnerTag, RayHit, SpatialQuery};
use crate::config::AimConfig;
use crate::consts::DIRECTION_EPSILON;
use crate::reflect;

/// Ordered predicted path points (never empty)
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectionPath(Vec<Vec2>);

impl ReflectionPath {
    /// Single-point path for an unusable aim
    pub fn degenerate(start: Vec2) -> Self {
        Self(vec![start])
    }

    pub fn points(&self) -> &[Vec2] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path has no points
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether there is anything to draw
    pub fn is_drawable(&self) -> bool {
        self.0.len() >= 2
    }

    pub fn has_reflection(&self) -> bool {
        self.0.len() >= 3
    }

    pub fn start(&self) -> Vec2 {
        self.0[0]
    }

    pub fn end(&self) -> Vec2 {
        self.0[self.0.len() - 1]
    }

    /// The bounce point, if the path bounces
    pub fn reflection_point(&self) -> Option<Vec2> {
        if self.has_reflection() {
            Some(self.0[1])
        } else {
            None
        }
    }

    pub fn into_points(self) -> Vec<Vec2> {
        self.0
    }
}

/// Inputs of one prediction (also the cache key)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryQuery {
    pub start: Vec2,
    /// Aim direction, any length
    pub direction: Vec2,
    pub ball_radius: f32,
}

impl TrajectoryQuery {
    pub fn new(start: Vec2, direction: Vec2, ball_radius: f32) -> Self {
        Self {
            start,
            direction,
            ball_radius,
        }
    }

    /// From a 3D aim on the ground plane (drops z)
    pub fn from_vec3(start: Vec3, direction: Vec3, ball_radius: f32) -> Self {
        Self::new(start.truncate(), direction.truncate(), ball_radius)
    }

    /// Whether `other` is close enough to reuse this query's result
    fn matches(&self, other: &TrajectoryQuery, epsilon: f32) -> bool {
        (self.start - other.start).length() < epsilon
            && (self.direction - other.direction).length() < epsilon
    }
}

/// Receives every freshly computed (non-cached) path
pub trait PathObserver {
    fn on_path_computed(&mut self, points: &[Vec2]);
}

impl<F: FnMut(&[Vec2])> PathObserver for F {
    fn on_path_computed(&mut self, points: &[Vec2]) {
        self(points)
    }
}

/// Reflected direction off a surface, or None if it collapses to zero
pub fn reflected_direction(dir: Vec2, normal: Vec2) -> Option<Vec2> {
    let r = reflect(dir, normal);
    if !r.is_finite() || r.length() < DIRECTION_EPSILON {
        None
    } else {
        Some(r)
    }
}

/// Predicts and caches the aim path for one ball
pub struct ReflectionPathPlanner {
    config: AimConfig,
    /// Colliders with this tag are stepped over
    owner: OwnerTag,
    current: Option<ReflectionPath>,
    cached_query: Option<TrajectoryQuery>,
    observers: Vec<Box<dyn PathObserver>>,
    raycasts: u64,
}

impl std::fmt::Debug for ReflectionPathPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReflectionPathPlanner")
            .field("owner", &self.owner)
            .field("current", &self.current)
            .field("cached_query", &self.cached_query)
            .field("observers", &self.observers.len())
            .field("raycasts", &self.raycasts)
            .finish()
    }
}

impl ReflectionPathPlanner {
    pub fn new(config: AimConfig, owner: OwnerTag) -> Self {
        Self {
            config,
            owner,
            current: None,
            cached_query: None,
            observers: Vec::new(),
            raycasts: 0,
        }
    }

    pub fn config(&self) -> &AimConfig {
        &self.config
    }

    pub fn owner(&self) -> OwnerTag {
        self.owner
    }

    /// Register an observer for freshly computed paths
    pub fn add_observer(&mut self, observer: Box<dyn PathObserver>) {
        self.observers.push(observer);
    }

    /// Most recently computed path, if any
    pub fn current_path(&self) -> Option<&ReflectionPath> {
        self.current.as_ref()
    }

    /// Whether the current path has something to draw
    pub fn is_path_valid(&self) -> bool {
        self.current.as_ref().is_some_and(ReflectionPath::is_drawable)
    }

    /// Drop the current path and the cache (ball launched or aim hidden)
    pub fn clear_path(&mut self) {
        self.current = None;
        self.cached_query = None;
    }

    /// Total rays cast by this planner
    pub fn raycast_count(&self) -> u64 {
        self.raycasts
    }

    /// Predict with the configured default ball radius
    pub fn compute_default<Q: SpatialQuery + ?Sized>(
        &mut self,
        world: &Q,
        start: Vec2,
        aim_dir: Vec2,
    ) -> ReflectionPath {
        let radius = self.config.ball_radius;
        self.compute_path(world, start, aim_dir, radius)
    }

    /// Predict for a prepared query
    pub fn compute<Q: SpatialQuery + ?Sized>(
        &mut self,
        world: &Q,
        query: &TrajectoryQuery,
    ) -> ReflectionPath {
        self.compute_path(world, query.start, query.direction, query.ball_radius)
    }

    /// Predict the path for an aim, reusing the last result when the aim is
    /// unchanged
    pub fn compute_path<Q: SpatialQuery + ?Sized>(
        &mut self,
        world: &Q,
        start: Vec2,
        aim_dir: Vec2,
        ball_radius: f32,
    ) -> ReflectionPath {
        if !aim_dir.is_finite() || aim_dir.length() < DIRECTION_EPSILON {
            return ReflectionPath::degenerate(start);
        }

        let query = TrajectoryQuery::new(start, aim_dir, ball_radius);
        if let (Some(cached), Some(path)) = (&self.cached_query, &self.current) {
            if cached.matches(&query, self.config.cache_epsilon) {
                return path.clone();
            }
        }

        let path = self.trace(world, &query);
        log::debug!(
            "Aim path recomputed for {:?}: {} points",
            self.owner,
            path.len()
        );

        self.cached_query = Some(query);
        self.current = Some(path.clone());
        for observer in &mut self.observers {
            observer.on_path_computed(path.points());
        }
        path
    }

    /// Cast both legs without touching the cache
    fn trace<Q: SpatialQuery + ?Sized>(
        &mut self,
        world: &Q,
        query: &TrajectoryQuery,
    ) -> ReflectionPath {
        let dir = query.direction.normalize();
        let origin = query.start + dir * query.ball_radius;
        let mut points = vec![query.start];

        let Some(hit) = self.cast_past_self(world, origin, dir, self.config.max_distance) else {
            points.push(origin + dir * self.config.max_distance);
            return ReflectionPath(points);
        };
        points.push(hit.point);

        let Some(reflected) = reflected_direction(dir, hit.normal) else {
            return ReflectionPath(points);
        };

        let bounce_origin = hit.point + reflected * self.config.reflection_offset;
        let reach = self.config.reflection_length;
        let end = match self.cast_past_self(world, bounce_origin, reflected, reach) {
            Some(second) => second.point,
            None => hit.point + reflected * self.config.reflection_length,
        };
        points.push(end);
        ReflectionPath(points)
    }

    /// Nearest hit along the ray that isn't one of our own colliders
    fn cast_past_self<Q: SpatialQuery + ?Sized>(
        &mut self,
        world: &Q,
        mut origin: Vec2,
        dir: Vec2,
        max_dist: f32,
    ) -> Option<RayHit> {
        let layers = self.config.reflective_layers;
        let step = self.config.self_exclusion_offset;
        let mut remaining = max_dist;

        self.raycasts += 1;
        let mut hit = world.raycast(origin, dir, remaining, layers)?;

        for _ in 0..self.config.max_self_exclusion_retries {
            if hit.owner != self.owner {
                return Some(hit);
            }
            let next_origin = hit.point + dir * step;
            remaining -= (next_origin - origin).length();
            if remaining <= 0.0 {
                return None;
            }
            origin = next_origin;
            self.raycasts += 1;
            hit = world.raycast(origin, dir, remaining, layers)?;
        }

        if hit.owner != self.owner {
            return Some(hit);
        }
        log::warn!(
            "Self-exclusion gave up after {} re-casts for {:?}; treating ray as open",
            self.config.max_self_exclusion_retries,
            self.owner
        );
        None
    }
}
