use nalgebra::{UnitQuaternion, Vector3};

use crate::dynamics::state::{VehicleState, G0};
use crate::dynamics::PhysicsBackend;

/// Horizontal speed lost per second while rolling on the ground, as a fraction.
const ROLLING_RESISTANCE: f64 = 0.02;
/// Fraction of horizontal speed removed per second per unit of brake torque.
const BRAKE_GAIN: f64 = 0.1;

// ---------------------------------------------------------------------------
// Reference rigid body
// ---------------------------------------------------------------------------

/// Minimal rigid-body integrator implementing [`PhysicsBackend`].
///
/// Semi-implicit Euler in world NED with gravity, accumulated forces and
/// torques, diagonal body inertia and drag applied as a per-step velocity
/// damping `v *= clamp01(1 - drag * dt)`. A flat ground plane at altitude 0
/// stops descent and reports wheel contact.
#[derive(Debug, Clone)]
pub struct RigidBody {
    present: bool,
    pub mass: f64,
    pub inertia: Vector3<f64>,
    pub center_of_mass: Vector3<f64>,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub omega: Vector3<f64>, // body frame, rad/s
    pub linear_drag: f64,
    pub angular_drag: f64,
    force: Vector3<f64>,
    torque: Vector3<f64>,
    wheel_brake: f64,
    grounded: bool,
}

impl RigidBody {
    pub fn new(mass: f64, inertia: Vector3<f64>) -> Self {
        Self {
            present: true,
            mass,
            inertia,
            center_of_mass: Vector3::zeros(),
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
            omega: Vector3::zeros(),
            linear_drag: 0.0,
            angular_drag: 0.05,
            force: Vector3::zeros(),
            torque: Vector3::zeros(),
            wheel_brake: 0.0,
            grounded: false,
        }
    }

    /// Body in level flight at `altitude` metres, heading north at `speed` m/s.
    pub fn airborne(mass: f64, inertia: Vector3<f64>, altitude: f64, speed: f64) -> Self {
        let mut body = Self::new(mass, inertia);
        body.position = Vector3::new(0.0, 0.0, -altitude);
        body.velocity = Vector3::new(speed, 0.0, 0.0);
        body.grounded = altitude <= 0.0;
        body
    }

    /// A body that has not been spawned yet; `state()` reports `None`.
    pub fn unspawned(mass: f64, inertia: Vector3<f64>) -> Self {
        Self { present: false, ..Self::new(mass, inertia) }
    }

    pub fn spawn(&mut self) {
        self.present = true;
    }

    pub fn altitude(&self) -> f64 {
        -self.position.z
    }

    /// Integrate one step and clear the force/torque accumulators.
    pub fn step(&mut self, dt: f64) {
        if !self.present {
            return;
        }

        // --- Translation ---
        let accel = self.force / self.mass + Vector3::new(0.0, 0.0, G0);
        self.velocity += accel * dt;
        self.velocity *= (1.0 - self.linear_drag * dt).clamp(0.0, 1.0);

        // --- Rotation: Euler's equation with diagonal inertia ---
        let tau = self.orientation.inverse() * self.torque;
        let w = self.omega;
        let i = self.inertia;
        let i_w = Vector3::new(i.x * w.x, i.y * w.y, i.z * w.z);
        let gyro = w.cross(&i_w);
        let domega = Vector3::new(
            (tau.x - gyro.x) / i.x,
            (tau.y - gyro.y) / i.y,
            (tau.z - gyro.z) / i.z,
        );
        self.omega += domega * dt;
        self.omega *= (1.0 - self.angular_drag * dt).clamp(0.0, 1.0);
        self.orientation *= UnitQuaternion::from_scaled_axis(self.omega * dt);

        // --- Ground plane ---
        let next = self.position + self.velocity * dt;
        if next.z >= 0.0 && self.velocity.z >= 0.0 {
            self.position = Vector3::new(next.x, next.y, 0.0);
            self.velocity.z = 0.0;
            let friction = (ROLLING_RESISTANCE + self.wheel_brake * BRAKE_GAIN) * dt;
            let keep = (1.0 - friction).clamp(0.0, 1.0);
            self.velocity.x *= keep;
            self.velocity.y *= keep;
            self.grounded = true;
        } else {
            self.position = next;
            self.grounded = false;
        }

        self.force = Vector3::zeros();
        self.torque = Vector3::zeros();
    }
}

impl PhysicsBackend for RigidBody {
    fn state(&self) -> Option<VehicleState> {
        self.present.then(|| VehicleState {
            position: self.position,
            orientation: self.orientation,
            linear_velocity: self.velocity,
            linear_drag: self.linear_drag,
            angular_drag: self.angular_drag,
        })
    }

    fn apply_force(&mut self, force: Vector3<f64>) {
        self.force += force;
    }

    fn apply_torque(&mut self, torque: Vector3<f64>) {
        self.torque += torque;
    }

    fn set_drag(&mut self, linear: f64, angular: f64) {
        self.linear_drag = linear;
        self.angular_drag = angular;
    }

    fn set_mass(&mut self, mass: f64) {
        if mass > 0.0 {
            self.mass = mass;
        }
    }

    fn set_center_of_mass(&mut self, offset: Vector3<f64>) {
        self.center_of_mass = offset;
    }

    fn set_linear_velocity(&mut self, velocity: Vector3<f64>) {
        self.velocity = velocity;
    }

    fn set_orientation(&mut self, orientation: UnitQuaternion<f64>) {
        self.orientation = orientation;
    }

    fn height_above_ground(&self) -> Option<f64> {
        (self.altitude() >= 0.0).then(|| self.altitude())
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn set_wheel_brake(&mut self, torque: f64) {
        self.wheel_brake = torque.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn body() -> RigidBody {
        RigidBody::airborne(100.0, Vector3::new(10.0, 10.0, 10.0), 100.0, 0.0)
    }

    #[test]
    fn falls_under_gravity() {
        let mut b = body();
        b.step(0.1);
        assert_abs_diff_eq!(b.velocity.z, G0 * 0.1, epsilon = 1e-12);
        assert!(b.altitude() < 100.0);
        assert!(!b.is_grounded());
    }

    #[test]
    fn force_balances_gravity() {
        let mut b = body();
        b.apply_force(Vector3::new(0.0, 0.0, -G0 * 100.0));
        b.step(0.1);
        assert_abs_diff_eq!(b.velocity.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn accumulators_clear_each_step() {
        let mut b = body();
        b.apply_force(Vector3::new(1000.0, 0.0, 0.0));
        b.step(0.1);
        let vx = b.velocity.x;
        b.step(0.1);
        assert_abs_diff_eq!(b.velocity.x, vx, epsilon = 1e-12);
    }

    #[test]
    fn drag_damps_velocity() {
        let mut b = RigidBody::airborne(100.0, Vector3::new(10.0, 10.0, 10.0), 100.0, 50.0);
        b.set_drag(1.0, 0.0);
        b.apply_force(Vector3::new(0.0, 0.0, -G0 * 100.0));
        b.step(0.1);
        assert_abs_diff_eq!(b.velocity.x, 45.0, epsilon = 1e-9);
    }

    #[test]
    fn torque_spins_about_body_axis() {
        let mut b = body();
        b.set_drag(0.0, 0.0);
        b.apply_torque(Vector3::new(0.0, 10.0, 0.0));
        b.step(0.1);
        assert_abs_diff_eq!(b.omega, Vector3::new(0.0, 0.1, 0.0), epsilon = 1e-12);
        assert!(b.orientation.angle() > 0.0);
    }

    #[test]
    fn ground_plane_stops_descent() {
        let mut b = RigidBody::airborne(100.0, Vector3::new(10.0, 10.0, 10.0), 0.05, 10.0);
        b.velocity.z = 5.0;
        b.step(0.1);
        assert_eq!(b.altitude(), 0.0);
        assert_eq!(b.velocity.z, 0.0);
        assert!(b.is_grounded());
        assert_eq!(b.height_above_ground(), Some(0.0));
    }

    #[test]
    fn brakes_slow_the_roll() {
        let mut free = RigidBody::airborne(100.0, Vector3::new(10.0, 10.0, 10.0), 0.0, 20.0);
        let mut braked = free.clone();
        braked.set_wheel_brake(10.0);
        free.step(0.1);
        braked.step(0.1);
        assert!(braked.velocity.x < free.velocity.x);
    }

    #[test]
    fn unspawned_body_has_no_state() {
        let mut b = RigidBody::unspawned(100.0, Vector3::new(1.0, 1.0, 1.0));
        assert!(b.state().is_none());
        b.step(0.1);
        b.spawn();
        assert_eq!(b.state().map(|s| s.position), Some(Vector3::zeros()));
    }
}
