use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Piecewise response curve (lift curve, engine power curve)
// ---------------------------------------------------------------------------

/// One control point of a [`ResponseCurve`].
///
/// Tangents are slopes (dy/dx). `in_tangent` shapes the segment arriving at
/// this key, `out_tangent` the segment leaving it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f64,
    pub value: f64,
    #[serde(default)]
    pub in_tangent: f64,
    #[serde(default)]
    pub out_tangent: f64,
}

impl Keyframe {
    pub fn new(time: f64, value: f64, in_tangent: f64, out_tangent: f64) -> Self {
        Self { time, value, in_tangent, out_tangent }
    }
}

/// Control-point table evaluated with cubic Hermite segments.
///
/// Outside the key range the curve holds the first/last value (no
/// extrapolation). Inside, each segment `[k0, k1]` is a Hermite spline with
/// endpoint slopes `k0.out_tangent` and `k1.in_tangent`, so a key with equal
/// in/out tangents is C1-smooth and zero tangents give an ease-in/ease-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct ResponseCurve {
    keys: Vec<Keyframe>,
}

impl ResponseCurve {
    pub fn new(mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Straight line from (0, 0) to (1, 1).
    pub fn linear() -> Self {
        Self::new(vec![Keyframe::new(0.0, 0.0, 1.0, 1.0), Keyframe::new(1.0, 1.0, 1.0, 1.0)])
    }

    /// Lift against normalized speed: almost nothing below ~60% of max speed,
    /// then a steep ramp to full lift at max speed.
    pub fn lift() -> Self {
        Self::new(vec![
            Keyframe::new(0.0, 0.0, 0.0, 0.0),
            Keyframe::new(0.6, 0.1, 1.0, 1.0),
            Keyframe::new(1.0, 1.0, 2.0, 0.0),
        ])
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if x.is_nan() || x <= first.time {
            return first.value;
        }
        if x >= last.time {
            return last.value;
        }

        let idx = self.keys.partition_point(|k| k.time <= x);
        let k0 = &self.keys[idx - 1];
        let k1 = &self.keys[idx];
        let width = k1.time - k0.time;
        if width <= 0.0 {
            return k0.value;
        }

        let s = (x - k0.time) / width;
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        h00 * k0.value + h10 * width * k0.out_tangent + h01 * k1.value + h11 * width * k1.in_tangent
    }

    /// True when key times are finite and strictly increasing.
    pub fn is_well_formed(&self) -> bool {
        self.keys.iter().all(|k| k.time.is_finite() && k.value.is_finite())
            && self.keys.windows(2).all(|w| w[0].time < w[1].time)
    }
}

impl From<Vec<Keyframe>> for ResponseCurve {
    fn from(keys: Vec<Keyframe>) -> Self {
        Self::new(keys)
    }
}

impl From<ResponseCurve> for Vec<Keyframe> {
    fn from(curve: ResponseCurve) -> Self {
        curve.keys
    }
}

/// Position of `value` between `a` and `b`, clamped to [0, 1].
pub fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn linear_curve_is_identity_on_unit_interval() {
        let c = ResponseCurve::linear();
        for x in [0.0, 0.25, 0.5, 0.9, 1.0] {
            assert_abs_diff_eq!(c.evaluate(x), x, epsilon = 1e-12);
        }
    }

    #[test]
    fn holds_end_values_outside_range() {
        let c = ResponseCurve::lift();
        assert_abs_diff_eq!(c.evaluate(-1.0), 0.0);
        assert_abs_diff_eq!(c.evaluate(1.5), 1.0);
    }

    #[test]
    fn lift_curve_dips_slightly_negative_below_knee() {
        let c = ResponseCurve::lift();
        assert_abs_diff_eq!(c.evaluate(0.6), 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(c.evaluate(1.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.evaluate(0.3), -0.025, epsilon = 1e-12);
        for i in 1..60 {
            let x = i as f64 / 100.0;
            let v = c.evaluate(x);
            assert!(v >= -0.025 - 1e-12, "lift at {x} is {v}");
            if x < 0.45 {
                assert!(v < 0.0, "lift at {x} is {v}");
            }
        }
    }

    #[test]
    fn lift_curve_rises_above_knee() {
        let c = ResponseCurve::lift();
        let mut prev = c.evaluate(0.6);
        for i in 61..=100 {
            let y = c.evaluate(i as f64 / 100.0);
            assert!(y >= prev, "lift curve should rise between 0.6 and 1.0");
            prev = y;
        }
    }

    #[test]
    fn keys_are_sorted_on_construction() {
        let c = ResponseCurve::new(vec![Keyframe::new(1.0, 2.0, 0.0, 0.0), Keyframe::new(0.0, 1.0, 0.0, 0.0)]);
        assert!(c.is_well_formed());
        assert_abs_diff_eq!(c.evaluate(0.0), 1.0);
    }

    #[test]
    fn duplicate_key_times_are_not_well_formed() {
        let c = ResponseCurve::new(vec![Keyframe::new(0.5, 0.0, 0.0, 0.0), Keyframe::new(0.5, 1.0, 0.0, 0.0)]);
        assert!(!c.is_well_formed());
    }

    #[test]
    fn nan_input_gives_first_value() {
        assert_eq!(ResponseCurve::lift().evaluate(f64::NAN), 0.0);
        assert_eq!(ResponseCurve::new(vec![Keyframe::new(0.0, 0.4, 0.0, 0.0)]).evaluate(f64::NAN), 0.4);
    }

    #[test]
    fn empty_curve_evaluates_to_zero() {
        assert_eq!(ResponseCurve::new(vec![]).evaluate(0.5), 0.0);
    }

    #[test]
    fn inverse_lerp_clamps() {
        assert_abs_diff_eq!(inverse_lerp(0.0, 110.0, 55.0), 0.5);
        assert_abs_diff_eq!(inverse_lerp(0.0, 110.0, 200.0), 1.0);
        assert_abs_diff_eq!(inverse_lerp(1.0, 1.0, 5.0), 0.0);
    }
}
