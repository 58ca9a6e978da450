use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::backend::PhysicsBackend;
use super::roll::{steer_roll, BankLimits, RollMode};
use super::state::{body_forward, body_up, FlightDerived, VehicleState, MPS_TO_MPH};
use crate::curve::{inverse_lerp, ResponseCurve};
use crate::input::{ControlInput, InputMode};

// ---------------------------------------------------------------------------
// Tunables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightParams {
    pub max_speed_mph: f64,
    pub max_lift_power: f64,
    pub lift_curve: ResponseCurve,
    pub drag_factor: f64,
    pub flap_drag_factor: f64,
    pub pitch_gain: f64,
    pub yaw_gain: f64,
    /// Bank steering rate in trajectory mode, deg/s.
    pub roll_rate: f64,
    /// Bank steering rate in manual mode, deg/s.
    pub manual_roll_rate: f64,
    pub manual_max_bank: f64,
    pub trajectory_bank: f64,
    pub relax_gain: f64,
    pub relax_min_speed: f64,
    pub relax_velocity: bool,
    pub align_orientation: bool,
}

impl Default for FlightParams {
    fn default() -> Self {
        Self {
            max_speed_mph: 110.0,
            max_lift_power: 800.0,
            lift_curve: ResponseCurve::lift(),
            drag_factor: 0.01,
            flap_drag_factor: 0.005,
            pitch_gain: 1000.0,
            yaw_gain: 1000.0,
            roll_rate: 3000.0,
            manual_roll_rate: 3000.0,
            manual_max_bank: 45.0,
            trajectory_bank: 35.0,
            relax_gain: 0.01,
            relax_min_speed: 1.0,
            relax_velocity: true,
            align_orientation: false,
        }
    }
}

impl FlightParams {
    pub fn max_speed_mps(&self) -> f64 {
        self.max_speed_mph / MPS_TO_MPH
    }

    pub fn bank_limits(&self) -> BankLimits {
        BankLimits { manual_max_bank: self.manual_max_bank, trajectory_bank: self.trajectory_bank }
    }
}

// ---------------------------------------------------------------------------
// Flight dynamics
// ---------------------------------------------------------------------------

/// Per-tick aerodynamic model: lift, drag, pitch/yaw torque, bank steering
/// and velocity relaxation, pushed into a [`PhysicsBackend`].
#[derive(Debug, Clone)]
pub struct FlightDynamics {
    pub params: FlightParams,
    base_drag: f64,
    base_angular_drag: f64,
    initialized: bool,
    derived: FlightDerived,
}

impl FlightDynamics {
    pub fn new(params: FlightParams) -> Self {
        Self { params, base_drag: 0.0, base_angular_drag: 0.0, initialized: false, derived: FlightDerived::default() }
    }

    /// Capture the body's starting drag coefficients; every later drag write
    /// is computed from these.
    pub fn init(&mut self, state: &VehicleState) {
        self.base_drag = state.linear_drag;
        self.base_angular_drag = state.angular_drag;
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn base_drag(&self) -> (f64, f64) {
        (self.base_drag, self.base_angular_drag)
    }

    /// Values derived on the last completed tick.
    pub fn derived(&self) -> FlightDerived {
        self.derived
    }

    /// Forward speed and angle-of-attack proxy for a body snapshot.
    pub fn derive(&self, state: &VehicleState) -> FlightDerived {
        let max_mps = self.params.max_speed_mps().max(0.0);
        let forward_speed = state.body_velocity().x.clamp(0.0, max_mps);
        let mph = (forward_speed * MPS_TO_MPH).min(self.params.max_speed_mph);
        let normalized_speed = inverse_lerp(0.0, self.params.max_speed_mph, mph);

        let angle_of_attack = match state.linear_velocity.try_normalize(1e-12) {
            Some(dir) => dir.dot(&state.forward()).powi(2),
            None => 0.0,
        };

        FlightDerived { forward_speed, mph, normalized_speed, angle_of_attack }
    }

    /// World-frame lift force along the body up axis.
    pub fn lift(&self, state: &VehicleState, derived: &FlightDerived) -> Vector3<f64> {
        // the curve dips below zero under the knee; lift never pushes down
        let power = self.params.lift_curve.evaluate(derived.normalized_speed).max(0.0) * self.params.max_lift_power;
        state.up() * power * derived.angle_of_attack
    }

    /// (linear, angular) drag. Full recompute from the captured base values.
    pub fn drag(&self, derived: &FlightDerived, flaps: u32) -> (f64, f64) {
        let linear = self.base_drag
            + derived.forward_speed * self.params.drag_factor
            + f64::from(flaps) * self.params.flap_drag_factor;
        let angular = self.base_angular_drag * derived.forward_speed;
        (linear, angular)
    }

    /// Run one tick. Returns `None`, touching nothing, if the backend has no body yet.
    pub fn tick(
        &mut self,
        backend: &mut dyn PhysicsBackend,
        input: &ControlInput,
        mode: InputMode,
        dt: f64,
    ) -> Option<FlightDerived> {
        let state = backend.state()?;
        if !self.initialized {
            self.init(&state);
        }

        // 1. forward speed
        let derived = self.derive(&state);

        // 2. lift
        backend.apply_force(self.lift(&state, &derived));

        // 3. drag
        let (linear, angular) = self.drag(&derived, input.flaps);
        backend.set_drag(linear, angular);

        // 4. pitch / yaw torque
        backend.apply_torque(state.right() * input.pitch * self.params.pitch_gain);
        backend.apply_torque(state.up() * input.yaw * self.params.yaw_gain);

        // 5. roll
        let roll_mode = RollMode::select(mode, input);
        let rate = match roll_mode {
            RollMode::Manual { .. } => self.params.manual_roll_rate,
            RollMode::TrajectoryDriven { .. } => self.params.roll_rate,
        };
        let orientation = steer_roll(&state.orientation, roll_mode, &self.params.bank_limits(), rate, dt);
        backend.set_orientation(orientation);

        // 6. relaxation toward the nose at forward speed
        if state.linear_velocity.norm() > self.params.relax_min_speed {
            let mut velocity = state.linear_velocity;
            if self.params.relax_velocity {
                let forward_speed = derived.forward_speed;
                let t = (forward_speed * derived.angle_of_attack * dt * self.params.relax_gain).clamp(0.0, 1.0);
                velocity = velocity.lerp(&(body_forward(&orientation) * forward_speed), t);
                backend.set_linear_velocity(velocity);
            }
            if self.params.align_orientation {
                if let Some(aligned) = look_along(&velocity, &body_up(&orientation)) {
                    let t = (dt * self.params.relax_gain).clamp(0.0, 1.0);
                    let blended = orientation.try_slerp(&aligned, t, 1e-9).unwrap_or(aligned);
                    backend.set_orientation(blended);
                }
            }
        }

        self.derived = derived;
        Some(derived)
    }
}

impl Default for FlightDynamics {
    fn default() -> Self {
        Self::new(FlightParams::default())
    }
}

/// FRD orientation whose nose points along `direction`, keeping `up` as close
/// to the canopy axis as possible. `None` when the two are parallel.
fn look_along(direction: &Vector3<f64>, up: &Vector3<f64>) -> Option<UnitQuaternion<f64>> {
    let x = direction.try_normalize(1e-9)?;
    let y = (-up).cross(&x).try_normalize(1e-9)?;
    let z = x.cross(&y);
    let rot = Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[x, y, z]));
    Some(UnitQuaternion::from_rotation_matrix(&rot))
}
