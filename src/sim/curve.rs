//! Sampled response curves
//!
//! Keyframed `[0,1] -> [0,1]` mappings used to shape how speed drives
//! bounciness and damping. Keys are kept sorted by `x`; sampling clamps
//! outside the keyed range and interpolates linearly between keys.

use serde::{Deserialize, Serialize};

/// One keyframe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub x: f32,
    pub y: f32,
}

/// Piecewise-linear curve over sorted keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct SampledCurve {
    keys: Vec<CurveKey>,
}

impl From<Vec<CurveKey>> for SampledCurve {
    fn from(keys: Vec<CurveKey>) -> Self {
        Self::from_keys(keys)
    }
}

impl From<SampledCurve> for Vec<CurveKey> {
    fn from(curve: SampledCurve) -> Self {
        curve.keys
    }
}

impl Default for SampledCurve {
    fn default() -> Self {
        Self::linear()
    }
}

impl SampledCurve {
    /// Build from keys in any order; non-finite keys are dropped
    pub fn from_keys(mut keys: Vec<CurveKey>) -> Self {
        keys.retain(|k| k.x.is_finite() && k.y.is_finite());
        keys.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        Self { keys }
    }

    pub fn from_points(points: &[(f32, f32)]) -> Self {
        Self::from_keys(points.iter().map(|&(x, y)| CurveKey { x, y }).collect())
    }

    /// Identity: 0 -> 0, 1 -> 1
    pub fn linear() -> Self {
        Self::from_points(&[(0.0, 0.0), (1.0, 1.0)])
    }

    /// Slow start, fast finish
    pub fn ease_in() -> Self {
        Self::from_points(&[(0.0, 0.0), (0.25, 0.0625), (0.5, 0.25), (0.75, 0.5625), (1.0, 1.0)])
    }

    pub fn constant(value: f32) -> Self {
        Self::from_points(&[(0.0, value)])
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Evaluate the curve at `x`
    ///
    /// An empty curve is the identity.
    pub fn sample(&self, x: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return x,
        };
        if x <= first.x {
            return first.y;
        }
        if x >= last.x {
            return last.y;
        }

        // First key strictly right of x; x is inside the keyed range so idx ∈ [1, len)
        let idx = self.keys.partition_point(|k| k.x <= x);
        let a = self.keys[idx - 1];
        let b = self.keys[idx];
        let span = b.x - a.x;
        if span <= f32::EPSILON {
            return b.y;
        }
        crate::lerp(a.y, b.y, (x - a.x) / span)
    }

    /// Whether `y` only rises or only falls as `x` grows (flat runs allowed)
    pub fn is_monotonic(&self) -> bool {
        let rising = self.keys.windows(2).all(|w| w[1].y >= w[0].y);
        let falling = self.keys.windows(2).all(|w| w[1].y <= w[0].y);
        rising || falling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_curve() {
        let curve = SampledCurve::linear();
        assert_eq!(curve.sample(0.0), 0.0);
        assert!((curve.sample(0.3) - 0.3).abs() < 1e-6);
        assert_eq!(curve.sample(1.0), 1.0);
    }

    #[test]
    fn test_clamps_outside_range() {
        let curve = SampledCurve::from_points(&[(0.2, 0.1), (0.8, 0.9)]);
        assert_eq!(curve.sample(-1.0), 0.1);
        assert_eq!(curve.sample(0.0), 0.1);
        assert_eq!(curve.sample(1.0), 0.9);
        assert!((curve.sample(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_unsorted_keys_are_sorted() {
        let curve = SampledCurve::from_points(&[(1.0, 1.0), (0.0, 0.0), (0.5, 0.8)]);
        assert_eq!(curve.keys()[1].x, 0.5);
        assert!((curve.sample(0.25) - 0.4).abs() < 1e-6);
        assert!(curve.is_monotonic());
    }

    #[test]
    fn test_monotonic_either_direction() {
        assert!(SampledCurve::linear().is_monotonic());
        assert!(SampledCurve::ease_in().is_monotonic());
        assert!(SampledCurve::from_points(&[(0.0, 1.0), (0.5, 0.5), (1.0, 0.0)]).is_monotonic());
        assert!(SampledCurve::constant(0.3).is_monotonic());
        assert!(!SampledCurve::from_points(&[(0.0, 0.0), (0.5, 0.8), (1.0, 0.2)]).is_monotonic());
    }

    #[test]
    fn test_ease_in_starts_slow() {
        let curve = SampledCurve::ease_in();
        assert_eq!(curve.sample(0.0), 0.0);
        assert!(curve.sample(0.5) < 0.5);
        assert_eq!(curve.sample(1.0), 1.0);
    }

    #[test]
    fn test_constant_and_empty() {
        assert_eq!(SampledCurve::constant(0.4).sample(0.9), 0.4);
        let empty = SampledCurve::from_keys(Vec::new());
        assert_eq!(empty.sample(0.7), 0.7);
    }

    #[test]
    fn test_non_finite_keys_dropped() {
        let curve = SampledCurve::from_points(&[(0.0, 0.0), (f32::NAN, 0.5), (1.0, 1.0)]);
        assert_eq!(curve.keys().len(), 2);
    }

    #[test]
    fn test_serde_as_key_list() {
        let curve = SampledCurve::from_points(&[(0.0, 0.2), (1.0, 0.6)]);
        let json = serde_json::to_string(&curve).unwrap();
        assert!(json.starts_with('['));
        let back: SampledCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(back, curve);
    }
}
