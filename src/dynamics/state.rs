use nalgebra::{UnitQuaternion, Vector3};
use serde::Serialize;

use crate::control::normalize_degrees;

// ---------------------------------------------------------------------------
// Physical constants
// ---------------------------------------------------------------------------

pub const G0: f64 = 9.80665;
pub const POUNDS_TO_KILOS: f64 = 0.453592;
pub const MPS_TO_MPH: f64 = 2.23694;

// ---------------------------------------------------------------------------
// Rigid-body snapshot (owned by the physics backend)
// ---------------------------------------------------------------------------

/// What the backend reports about the body at the start of a tick.
/// Frames: world NED, body FRD.
#[derive(Debug, Clone)]
pub struct VehicleState {
    pub position: Vector3<f64>,           // m, world
    pub orientation: UnitQuaternion<f64>, // body→world rotation
    pub linear_velocity: Vector3<f64>,    // m/s, world
    pub linear_drag: f64,
    pub angular_drag: f64,
}

impl VehicleState {
    pub fn at_rest() -> Self {
        Self {
            position: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
            linear_velocity: Vector3::zeros(),
            linear_drag: 0.0,
            angular_drag: 0.05,
        }
    }

    /// Body +X (nose) in world frame.
    pub fn forward(&self) -> Vector3<f64> {
        body_forward(&self.orientation)
    }

    /// Body +Y (right wing) in world frame.
    pub fn right(&self) -> Vector3<f64> {
        self.orientation * Vector3::y()
    }

    /// Body -Z (canopy) in world frame.
    pub fn up(&self) -> Vector3<f64> {
        body_up(&self.orientation)
    }

    /// Velocity expressed in body axes.
    pub fn body_velocity(&self) -> Vector3<f64> {
        self.orientation.inverse() * self.linear_velocity
    }

    pub fn altitude(&self) -> f64 {
        -self.position.z
    }

    pub fn attitude(&self) -> Attitude {
        Attitude::from_orientation(&self.orientation)
    }
}

pub fn body_forward(q: &UnitQuaternion<f64>) -> Vector3<f64> {
    q * Vector3::x()
}

pub fn body_up(q: &UnitQuaternion<f64>) -> Vector3<f64> {
    q * -Vector3::z()
}

// ---------------------------------------------------------------------------
// Euler attitude, degrees
// ---------------------------------------------------------------------------

/// Roll/pitch/yaw in degrees, each in (-180, 180].
/// Positive pitch is nose up, positive roll right wing down, positive yaw nose right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Attitude {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Attitude {
    pub fn from_orientation(q: &UnitQuaternion<f64>) -> Self {
        let (roll, pitch, yaw) = q.euler_angles();
        Self {
            roll: normalize_degrees(roll.to_degrees()),
            pitch: normalize_degrees(pitch.to_degrees()),
            yaw: normalize_degrees(yaw.to_degrees()),
        }
    }

    pub fn to_orientation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_euler_angles(self.roll.to_radians(), self.pitch.to_radians(), self.yaw.to_radians())
    }
}

// ---------------------------------------------------------------------------
// Per-tick derived flight values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FlightDerived {
    pub forward_speed: f64,   // m/s, clamped to [0, max]
    pub mph: f64,
    pub normalized_speed: f64, // [0, 1]
    pub angle_of_attack: f64,  // squared alignment proxy, [0, 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identity_axes_are_frd() {
        let s = VehicleState::at_rest();
        assert_eq!(s.forward(), Vector3::x());
        assert_eq!(s.right(), Vector3::y());
        assert_eq!(s.up(), -Vector3::z());
    }

    #[test]
    fn attitude_round_trips_through_quaternion() {
        let att = Attitude { roll: -35.0, pitch: 12.0, yaw: 170.0 };
        let back = Attitude::from_orientation(&att.to_orientation());
        assert_abs_diff_eq!(back.roll, att.roll, epsilon = 1e-9);
        assert_abs_diff_eq!(back.pitch, att.pitch, epsilon = 1e-9);
        assert_abs_diff_eq!(back.yaw, att.yaw, epsilon = 1e-9);
    }

    #[test]
    fn positive_pitch_raises_the_nose() {
        let q = Attitude { roll: 0.0, pitch: 10.0, yaw: 0.0 }.to_orientation();
        assert!(body_forward(&q).z < 0.0, "nose should point up (negative down-axis)");
    }

    #[test]
    fn positive_roll_drops_right_wing() {
        let s = VehicleState {
            orientation: Attitude { roll: 30.0, pitch: 0.0, yaw: 0.0 }.to_orientation(),
            ..VehicleState::at_rest()
        };
        assert!(s.right().z > 0.0);
    }
}
