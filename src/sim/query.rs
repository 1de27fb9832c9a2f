//! Ray queries against the world
//!
//! The prediction code only needs "what is the first surface along this ray".
//! `SpatialQuery` is that seam; the host physics engine implements it in the
//! game, `StaticWorld` implements it for tests and the headless driver.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::BallId;

/// Collision layer bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    /// Walls and other surfaces the aim line bounces off
    pub const REFLECTIVE: LayerMask = LayerMask(1 << 0);
    /// Ball colliders
    pub const BALL: LayerMask = LayerMask(1 << 1);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    #[inline]
    pub fn contains(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn union(self, other: LayerMask) -> LayerMask {
        LayerMask(self.0 | other.0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::REFLECTIVE.union(LayerMask::BALL)
    }
}

/// Who owns a collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerTag {
    Ball(BallId),
    Wall(u32),
    Untagged,
}

/// Nearest surface along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec2,
    /// Unit surface normal, facing against the ray
    pub normal: Vec2,
    /// Distance from the ray origin
    pub distance: f32,
    pub owner: OwnerTag,
}

/// Ray-cast service over the world
pub trait SpatialQuery {
    /// Cast from `origin` along `dir` (any length, normalized internally) up to
    /// `max_dist`, considering only colliders on `layers`.
    fn raycast(&self, origin: Vec2, dir: Vec2, max_dist: f32, layers: LayerMask)
    -> Option<RayHit>;
}

impl<T: SpatialQuery + ?Sized> SpatialQuery for &T {
    fn raycast(
        &self,
        origin: Vec2,
        dir: Vec2,
        max_dist: f32,
        layers: LayerMask,
    ) -> Option<RayHit> {
        (**self).raycast(origin, dir, max_dist, layers)
    }
}

/// A straight wall between two points
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallCollider {
    pub a: Vec2,
    pub b: Vec2,
    pub layer: LayerMask,
    pub owner: OwnerTag,
}

impl WallCollider {
    /// Unit normal of the wall (left-hand perpendicular of a→b)
    pub fn normal(&self) -> Vec2 {
        let e = self.b - self.a;
        Vec2::new(-e.y, e.x).normalize_or_zero()
    }

    /// Closest point on the wall to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let e = self.b - self.a;
        let len_sq = e.length_squared();
        if len_sq < 0.0001 {
            return self.a; // Degenerate segment
        }
        let t = ((p - self.a).dot(e) / len_sq).clamp(0.0, 1.0);
        self.a + e * t
    }
}

/// A circular collider (balls, round bumpers)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleCollider {
    pub center: Vec2,
    pub radius: f32,
    pub layer: LayerMask,
    pub owner: OwnerTag,
}

/// Simple analytic world of walls and circles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticWorld {
    pub walls: Vec<WallCollider>,
    pub circles: Vec<CircleCollider>,
    #[serde(default)]
    next_wall_id: u32,
}

impl StaticWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closed box arena with reflective walls whose normals face inward
    pub fn rectangle(min: Vec2, max: Vec2) -> Self {
        let mut world = Self::new();
        let (bl, br) = (min, Vec2::new(max.x, min.y));
        let (tr, tl) = (max, Vec2::new(min.x, max.y));
        // Counter-clockwise winding puts the left-hand normal inside the box
        world.add_wall(bl, br);
        world.add_wall(br, tr);
        world.add_wall(tr, tl);
        world.add_wall(tl, bl);
        world
    }

    /// Add a reflective wall, returning its tag
    pub fn add_wall(&mut self, a: Vec2, b: Vec2) -> OwnerTag {
        let owner = OwnerTag::Wall(self.next_wall_id);
        self.next_wall_id += 1;
        self.walls.push(WallCollider {
            a,
            b,
            layer: LayerMask::REFLECTIVE,
            owner,
        });
        owner
    }

    /// Add or move the collider for a ball
    pub fn set_ball(&mut self, id: BallId, center: Vec2, radius: f32) {
        let owner = OwnerTag::Ball(id);
        if let Some(c) = self.circles.iter_mut().find(|c| c.owner == owner) {
            c.center = center;
            c.radius = radius;
        } else {
            self.circles.push(CircleCollider {
                center,
                radius,
                layer: LayerMask::BALL,
                owner,
            });
        }
    }

    pub fn remove_ball(&mut self, id: BallId) {
        self.circles.retain(|c| c.owner != OwnerTag::Ball(id));
    }
}

#[inline]
fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Ray vs segment. `dir` must be unit length.
fn ray_segment(origin: Vec2, dir: Vec2, max_dist: f32, wall: &WallCollider) -> Option<RayHit> {
    let e = wall.b - wall.a;
    let denom = cross(dir, e);
    if denom.abs() < 1e-6 {
        return None; // Parallel
    }
    let ao = wall.a - origin;
    let t = cross(ao, e) / denom;
    let u = cross(ao, dir) / denom;
    if !(0.0..=max_dist).contains(&t) || !(0.0..=1.0).contains(&u) {
        return None;
    }
    let mut normal = wall.normal();
    if normal.dot(dir) > 0.0 {
        normal = -normal;
    }
    Some(RayHit {
        point: origin + dir * t,
        normal,
        distance: t,
        owner: wall.owner,
    })
}

/// Ray vs circle. `dir` must be unit length.
///
/// A ray starting inside the circle hits the far side (normal pointing back in).
fn ray_circle(origin: Vec2, dir: Vec2, max_dist: f32, circle: &CircleCollider) -> Option<RayHit> {
    let m = origin - circle.center;
    let b = m.dot(dir);
    let c = m.length_squared() - circle.radius * circle.radius;
    if c > 0.0 && b > 0.0 {
        return None; // Outside and pointing away
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let inside = c <= 0.0;
    let t = if inside { -b + root } else { -b - root };
    if !(0.0..=max_dist).contains(&t) {
        return None;
    }
    let point = origin + dir * t;
    let outward = (point - circle.center).normalize_or_zero();
    Some(RayHit {
        point,
        normal: if inside { -outward } else { outward },
        distance: t,
        owner: circle.owner,
    })
}

impl SpatialQuery for StaticWorld {
    fn raycast(
        &self,
        origin: Vec2,
        dir: Vec2,
        max_dist: f32,
        layers: LayerMask,
    ) -> Option<RayHit> {
        let dir = dir.normalize_or_zero();
        if dir == Vec2::ZERO || max_dist <= 0.0 {
            return None;
        }

        let walls = self
            .walls
            .iter()
            .filter(|w| layers.contains(w.layer))
            .filter_map(|w| ray_segment(origin, dir, max_dist, w));
        let circles = self
            .circles
            .iter()
            .filter(|c| layers.contains(c.layer))
            .filter_map(|c| ray_circle(origin, dir, max_dist, c));

        walls.chain(circles).min_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_mask() {
        let mask = LayerMask::REFLECTIVE.union(LayerMask::BALL);
        assert!(mask.contains(LayerMask::REFLECTIVE));
        assert!(mask.contains(LayerMask::BALL));
        assert!(!LayerMask::REFLECTIVE.contains(LayerMask::BALL));
        assert!(!LayerMask::NONE.contains(LayerMask::ALL));
    }

    #[test]
    fn test_ray_hits_wall_with_facing_normal() {
        let mut world = StaticWorld::new();
        let tag = world.add_wall(Vec2::new(5.0, -5.0), Vec2::new(5.0, 5.0));

        let hit = world
            .raycast(Vec2::ZERO, Vec2::new(2.0, 0.0), 20.0, LayerMask::ALL)
            .unwrap();
        assert!((hit.point - Vec2::new(5.0, 0.0)).length() < 1e-4);
        assert!((hit.normal - Vec2::new(-1.0, 0.0)).length() < 1e-4);
        assert!((hit.distance - 5.0).abs() < 1e-4);
        assert_eq!(hit.owner, tag);
    }

    #[test]
    fn test_ray_respects_max_distance_and_layers() {
        let mut world = StaticWorld::new();
        world.add_wall(Vec2::new(5.0, -5.0), Vec2::new(5.0, 5.0));

        assert!(world.raycast(Vec2::ZERO, Vec2::X, 4.0, LayerMask::ALL).is_none());
        assert!(world.raycast(Vec2::ZERO, Vec2::X, 20.0, LayerMask::BALL).is_none());
        assert!(world.raycast(Vec2::ZERO, -Vec2::X, 20.0, LayerMask::ALL).is_none());
    }

    #[test]
    fn test_ray_circle_outside_and_inside() {
        let mut world = StaticWorld::new();
        world.set_ball(BallId(7), Vec2::new(10.0, 0.0), 1.0);

        let hit = world
            .raycast(Vec2::ZERO, Vec2::X, 20.0, LayerMask::BALL)
            .unwrap();
        assert!((hit.point.x - 9.0).abs() < 1e-4);
        assert!((hit.normal - Vec2::new(-1.0, 0.0)).length() < 1e-4);
        assert_eq!(hit.owner, OwnerTag::Ball(BallId(7)));

        // Starting inside reports the far side
        let hit = world
            .raycast(Vec2::new(10.0, 0.0), Vec2::X, 20.0, LayerMask::BALL)
            .unwrap();
        assert!((hit.point.x - 11.0).abs() < 1e-4);
        assert!((hit.normal - Vec2::new(-1.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_nearest_hit_wins() {
        let mut world = StaticWorld::new();
        world.add_wall(Vec2::new(8.0, -5.0), Vec2::new(8.0, 5.0));
        let near = world.add_wall(Vec2::new(3.0, -5.0), Vec2::new(3.0, 5.0));

        let hit = world.raycast(Vec2::ZERO, Vec2::X, 20.0, LayerMask::ALL).unwrap();
        assert_eq!(hit.owner, near);
    }

    #[test]
    fn test_rectangle_normals_face_inward() {
        let world = StaticWorld::rectangle(Vec2::new(-10.0, -5.0), Vec2::new(10.0, 5.0));
        assert_eq!(world.walls.len(), 4);
        for wall in &world.walls {
            let mid = (wall.a + wall.b) * 0.5;
            assert!(wall.normal().dot(-mid) > 0.0);
        }
    }

    #[test]
    fn test_set_ball_moves_existing_collider() {
        let mut world = StaticWorld::new();
        world.set_ball(BallId(1), Vec2::ZERO, 0.5);
        world.set_ball(BallId(1), Vec2::new(3.0, 0.0), 0.5);
        assert_eq!(world.circles.len(), 1);
        assert_eq!(world.circles[0].center, Vec2::new(3.0, 0.0));

        world.remove_ball(BallId(1));
        assert!(world.circles.is_empty());
    }
}
