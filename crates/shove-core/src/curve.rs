//! Float curves used to scale push strength

use serde::{Deserialize, Serialize};

/// A scalar mapping sampled by the strength resolver
pub trait Curve {
    /// Evaluate the curve at `x`
    fn sample(&self, x: f32) -> f32;
}

impl<F> Curve for F
where
    F: Fn(f32) -> f32,
{
    fn sample(&self, x: f32) -> f32 {
        self(x)
    }
}

/// A single curve key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Piecewise-linear curve with constant extrapolation past either end
///
/// Keys are kept sorted by time. An empty curve samples to 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct FloatCurve {
    keys: Vec<CurveKey>,
}

impl FloatCurve {
    /// Create an empty curve
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a curve from `(time, value)` pairs in any order
    pub fn from_points(points: &[(f32, f32)]) -> Self {
        points
            .iter()
            .map(|&(time, value)| CurveKey::new(time, value))
            .collect::<Vec<_>>()
            .into()
    }

    /// Insert a key, keeping keys ordered by time
    pub fn add_key(&mut self, time: f32, value: f32) {
        let index = self.keys.partition_point(|k| k.time <= time);
        self.keys.insert(index, CurveKey::new(time, value));
    }

    /// Curve keys ordered by time
    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Curve for FloatCurve {
    fn sample(&self, x: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        // NaN fails every comparison below
        if x.is_nan() || x <= first.time || self.keys.len() == 1 {
            return first.value;
        }
        if x >= last.time {
            return last.value;
        }

        let upper = self.keys.partition_point(|k| k.time <= x).clamp(1, self.keys.len() - 1);
        let a = &self.keys[upper - 1];
        let b = &self.keys[upper];
        let span = b.time - a.time;
        if span <= 0.0 {
            return b.value;
        }
        let alpha = (x - a.time) / span;
        a.value + (b.value - a.value) * alpha
    }
}

impl From<Vec<CurveKey>> for FloatCurve {
    fn from(mut keys: Vec<CurveKey>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }
}

impl From<FloatCurve> for Vec<CurveKey> {
    fn from(curve: FloatCurve) -> Self {
        curve.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_sampling() {
        let curve = FloatCurve::from_points(&[(0.0, 0.0), (600.0, 1.0)]);
        assert_eq!(curve.sample(-10.0), 0.0);
        assert_eq!(curve.sample(300.0), 0.5);
        assert_eq!(curve.sample(600.0), 1.0);
        assert_eq!(curve.sample(900.0), 1.0);
    }

    #[test]
    fn test_unsorted_points() {
        let curve = FloatCurve::from_points(&[(2.0, 0.0), (0.0, 1.0), (1.0, 2.0)]);
        let times: Vec<_> = curve.keys().iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0]);
        assert_eq!(curve.sample(0.5), 1.5);
        assert_eq!(curve.sample(1.5), 1.0);
    }

    #[test]
    fn test_empty_curve() {
        assert_eq!(FloatCurve::new().sample(3.0), 0.0);
    }

    #[test]
    fn test_nan_sample() {
        let curve = FloatCurve::from_points(&[(0.0, 0.25), (1.0, 0.5), (2.0, 1.0)]);
        assert_eq!(curve.sample(f32::NAN), 0.25);
        assert_eq!(curve.sample(f32::INFINITY), 1.0);
        assert_eq!(curve.sample(f32::NEG_INFINITY), 0.25);

        let single = FloatCurve::from_points(&[(f32::NAN, 3.0)]);
        assert_eq!(single.sample(1.0), 3.0);
        assert_eq!(single.sample(f32::NAN), 3.0);
    }

    #[test]
    fn test_closure_curve() {
        let curve = |x: f32| (x / 600.0).min(1.0);
        assert_eq!(curve.sample(1200.0), 1.0);
    }

    #[test]
    fn test_ron_keys() {
        let curve: FloatCurve =
            ron::from_str("[(time: 1.0, value: 2.0), (time: 0.0, value: 0.0)]").unwrap();
        assert_eq!(curve.sample(0.5), 1.0);
    }
}
