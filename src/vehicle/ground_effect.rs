use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Extra lift close to the ground during takeoff and landing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundEffect {
    pub max_ground_distance: f64, // m
    pub lift_force: f64,
    pub max_speed: f64, // m/s
}

impl Default for GroundEffect {
    fn default() -> Self {
        Self { max_ground_distance: 3.0, lift_force: 100.0, max_speed: 15.0 }
    }
}

impl GroundEffect {
    /// World-frame (NED) force for a given height and velocity; zero out of range.
    pub fn force(&self, height: Option<f64>, velocity: &Vector3<f64>) -> Vector3<f64> {
        let Some(height) = height else {
            return Vector3::zeros();
        };
        if height < 0.0 || height >= self.max_ground_distance || self.max_speed <= 0.0 {
            return Vector3::zeros();
        }
        let normalized_speed = velocity.norm() / self.max_speed;
        let magnitude = self.lift_force * (self.max_ground_distance - height) * normalized_speed;
        Vector3::new(0.0, 0.0, -magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn pushes_up_near_the_ground() {
        let ge = GroundEffect::default();
        let f = ge.force(Some(1.0), &Vector3::new(15.0, 0.0, 0.0));
        assert_abs_diff_eq!(f, Vector3::new(0.0, 0.0, -200.0), epsilon = 1e-9);
    }

    #[test]
    fn nothing_out_of_range_or_without_ground() {
        let ge = GroundEffect::default();
        let v = Vector3::new(15.0, 0.0, 0.0);
        assert_eq!(ge.force(Some(3.0), &v), Vector3::zeros());
        assert_eq!(ge.force(Some(10.0), &v), Vector3::zeros());
        assert_eq!(ge.force(None, &v), Vector3::zeros());
        assert_eq!(ge.force(Some(1.0), &Vector3::zeros()), Vector3::zeros());
    }
}
