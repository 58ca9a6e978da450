use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::curve::ResponseCurve;

/// Propeller engine: throttle → thrust along a fixed body axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Engine {
    pub name: String,
    pub max_force: f64,                // N
    pub max_rpm: f64,
    pub power_curve: ResponseCurve,    // throttle [0,1] → power fraction
    pub thrust_axis: Vector3<f64>,     // body frame
}

impl Engine {
    pub fn new(name: impl Into<String>, max_force: f64, max_rpm: f64) -> Self {
        Self { name: name.into(), max_force, max_rpm, ..Default::default() }
    }

    /// World-frame thrust force and propeller rpm for a throttle setting.
    pub fn thrust(&self, throttle: f64, orientation: &UnitQuaternion<f64>) -> (Vector3<f64>, f64) {
        let power = self.power_curve.evaluate(throttle.clamp(0.0, 1.0));
        let rpm = power * self.max_rpm;
        let axis = self.thrust_axis.try_normalize(1e-12).unwrap_or_else(Vector3::x);
        (orientation * axis * (power * self.max_force), rpm)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            name: "engine".into(),
            max_force: 200.0,
            max_rpm: 2550.0,
            power_curve: ResponseCurve::linear(),
            thrust_axis: Vector3::x(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn full_throttle_gives_max_force_along_nose() {
        let engine = Engine::default();
        let (force, rpm) = engine.thrust(1.0, &UnitQuaternion::identity());
        assert_abs_diff_eq!(force, Vector3::new(200.0, 0.0, 0.0), epsilon = 1e-9);
        assert_abs_diff_eq!(rpm, 2550.0, epsilon = 1e-9);
    }

    #[test]
    fn throttle_is_clamped() {
        let engine = Engine::default();
        let (reverse, rpm) = engine.thrust(-0.5, &UnitQuaternion::identity());
        assert_eq!(reverse, Vector3::zeros());
        assert_eq!(rpm, 0.0);
        let (over, _) = engine.thrust(3.0, &UnitQuaternion::identity());
        assert_abs_diff_eq!(over.norm(), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn nan_throttle_gives_no_thrust() {
        let (force, rpm) = Engine::default().thrust(f64::NAN, &UnitQuaternion::identity());
        assert_eq!(force, Vector3::zeros());
        assert_eq!(rpm, 0.0);
    }

    #[test]
    fn thrust_follows_orientation() {
        let engine = Engine::default();
        let yawed = UnitQuaternion::from_euler_angles(0.0, 0.0, std::f64::consts::FRAC_PI_2);
        let (force, _) = engine.thrust(0.5, &yawed);
        assert_abs_diff_eq!(force, Vector3::new(0.0, 100.0, 0.0), epsilon = 1e-9);
    }
}
