use nalgebra::{UnitQuaternion, Vector3};

use super::state::VehicleState;

/// The rigid-body engine the flight model drives.
///
/// The backend owns the body and integrates it; the flight model only reads
/// a snapshot and pushes forces, torques, drag coefficients and the
/// occasional direct velocity/orientation correction. Forces and torques are
/// world-frame and accumulate until the backend's next integration step.
pub trait PhysicsBackend {
    /// Current body snapshot, `None` until the body exists.
    fn state(&self) -> Option<VehicleState>;

    fn apply_force(&mut self, force: Vector3<f64>);
    fn apply_torque(&mut self, torque: Vector3<f64>);
    fn set_drag(&mut self, linear: f64, angular: f64);
    fn set_mass(&mut self, mass: f64);
    fn set_center_of_mass(&mut self, offset: Vector3<f64>);
    fn set_linear_velocity(&mut self, velocity: Vector3<f64>);
    fn set_orientation(&mut self, orientation: UnitQuaternion<f64>);

    fn linear_velocity(&self) -> Option<Vector3<f64>> {
        self.state().map(|s| s.linear_velocity)
    }

    fn orientation(&self) -> Option<UnitQuaternion<f64>> {
        self.state().map(|s| s.orientation)
    }

    /// Distance to the ground below the body, if the backend can tell.
    fn height_above_ground(&self) -> Option<f64> {
        None
    }

    fn is_grounded(&self) -> bool {
        false
    }

    /// Combined wheel brake torque while on the ground. Ignored by backends
    /// without wheel contact.
    fn set_wheel_brake(&mut self, _torque: f64) {}
}
