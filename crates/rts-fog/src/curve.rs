#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A (distance, probability) pair the decay curve must pass through.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlPoint {
    pub distance: f64,
    pub probability: f64,
}

impl ControlPoint {
    pub const fn new(distance: f64, probability: f64) -> Self {
        Self {
            distance,
            probability,
        }
    }
}

/// `P(d) = y0 · e^(k·d) + c`, clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayCurve {
    pub y0: f64,
    pub k: f64,
    pub c: f64,
}

impl DecayCurve {
    /// Fit `y0` and `k` so the curve passes through both control points.
    ///
    /// Degenerate inputs (equal distances, or a probability at or below the floor `c`) fall
    /// back to a flat curve at the near probability.
    pub fn from_control_points(near: ControlPoint, far: ControlPoint, c: f64) -> Self {
        let a = near.probability - c;
        let b = far.probability - c;
        let dd = near.distance - far.distance;
        if a <= 0.0 || b <= 0.0 || dd.abs() < f64::EPSILON {
            return Self {
                y0: 0.0,
                k: 0.0,
                c: near.probability,
            };
        }

        let k = (a / b).ln() / dd;
        let y0 = a / (k * near.distance).exp();
        Self { y0, k, c }
    }

    pub fn probability(&self, distance: f64) -> f64 {
        (self.y0 * (self.k * distance).exp() + self.c).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_passes_through_both_control_points() {
        let near = ControlPoint::new(1.0, 0.4);
        let far = ControlPoint::new(8.0, 0.05);
        let curve = DecayCurve::from_control_points(near, far, 0.01);

        assert!((curve.probability(1.0) - 0.4).abs() < 1e-9);
        assert!((curve.probability(8.0) - 0.05).abs() < 1e-9);
        assert!(curve.k < 0.0);
        assert!(curve.probability(20.0) < curve.probability(2.0));
    }

    #[test]
    fn degenerate_points_give_a_flat_curve() {
        let p = ControlPoint::new(3.0, 0.2);
        let curve = DecayCurve::from_control_points(p, p, 0.0);
        assert_eq!(curve.probability(0.0), 0.2);
        assert_eq!(curve.probability(100.0), 0.2);
    }
}
