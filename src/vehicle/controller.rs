use nalgebra::Vector3;
use serde::Serialize;

use super::airframe::Airframe;
use crate::config::{RawRollSampling, SimConfig};
use crate::control::{AttitudeCommand, AttitudeController, AttitudeSetpoint, Controller, PidLaw};
use crate::dynamics::{Attitude, FlightDerived, FlightDynamics, PhysicsBackend};
use crate::input::{ControlInput, InputMode, InputProvider, ManualInput};
use crate::trajectory::{ControlCommand, TargetSample, TargetTrajectory};

// ---------------------------------------------------------------------------
// Per-tick report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickReport {
    pub time: f64,
    /// Time on the trajectory clock (restarted by a reset command).
    pub trajectory_time: f64,
    pub mode: InputMode,
    pub target: TargetSample,
    pub setpoint: AttitudeSetpoint,
    pub attitude: Attitude,
    pub command: AttitudeCommand,
    pub input: ControlInput,
    pub derived: FlightDerived,
    pub thrust: Vector3<f64>,
    pub engine_rpm: f64,
    pub grounded: bool,
}

// ---------------------------------------------------------------------------
// Vehicle controller
// ---------------------------------------------------------------------------

/// Owns the control pipeline and drives one airframe through a physics
/// backend: trajectory → attitude law → input merge → engines → flight
/// dynamics → ground effect → control surfaces → wheels.
pub struct VehicleController {
    airframe: Airframe,
    trajectory: Option<TargetTrajectory>,
    attitude: AttitudeController,
    input: InputProvider,
    flight: FlightDynamics,
    raw_roll_sampling: RawRollSampling,
    epoch: f64,
    initialized: bool,
}

impl VehicleController {
    pub fn new(config: &SimConfig, trajectory: Option<TargetTrajectory>) -> Self {
        let law = PidLaw::new(config.pid.pitch, config.pid.roll);
        Self {
            airframe: config.airframe.clone(),
            trajectory,
            attitude: AttitudeController::new(Box::new(law), config.trajectory.angle_multiplier)
                .with_log_interval(config.sim.telemetry_log_interval),
            input: InputProvider::new(config.input.axes()),
            flight: FlightDynamics::new(config.flight.clone()),
            raw_roll_sampling: config.trajectory.raw_roll_sampling,
            epoch: 0.0,
            initialized: false,
        }
    }

    /// Swap the attitude law, keeping scaling and logging settings.
    pub fn with_law(mut self, law: Box<dyn Controller>) -> Self {
        let enabled = self.attitude.is_enabled();
        self.attitude = AttitudeController::new(law, self.attitude.angle_multiplier)
            .with_log_interval(self.attitude.log_interval());
        self.attitude.set_enabled(enabled);
        self
    }

    /// Push mass properties and capture base drag. Returns false (and does
    /// nothing) while the backend has no body.
    pub fn initialize(&mut self, backend: &mut dyn PhysicsBackend) -> bool {
        let Some(state) = backend.state() else {
            return false;
        };
        backend.set_mass(self.airframe.mass_kg());
        backend.set_center_of_mass(self.airframe.center_of_mass);
        self.flight.init(&state);
        self.initialized = true;
        log::info!(
            "initialized '{}': mass {:.1} kg, {} engine(s), law {}",
            self.airframe.name,
            self.airframe.mass_kg(),
            self.airframe.engines.len(),
            self.attitude.law_name(),
        );
        true
    }

    /// Run one fixed step at simulation time `t`. Skipped entirely (returns
    /// `None`) while the backend has no body.
    pub fn tick(
        &mut self,
        backend: &mut dyn PhysicsBackend,
        manual: &ManualInput,
        t: f64,
        dt: f64,
    ) -> Option<TickReport> {
        let state = backend.state()?;
        if !self.initialized {
            self.initialize(backend);
        }

        let trajectory_time = t - self.epoch;
        let attitude = state.attitude();
        let command = self.attitude.update(self.trajectory.as_ref(), trajectory_time, &attitude, dt);
        let raw_roll = self.raw_target_roll(trajectory_time);
        let input = self.input.update(command, raw_roll, manual, dt);
        let mode = self.input.mode();

        let mut thrust = Vector3::zeros();
        let mut engine_rpm: f64 = 0.0;
        for engine in &self.airframe.engines {
            let (force, rpm) = engine.thrust(input.sticky_throttle, &state.orientation);
            backend.apply_force(force);
            thrust += force;
            engine_rpm = engine_rpm.max(rpm);
        }

        let derived = self.flight.tick(backend, &input, mode, dt)?;

        if let Some(ground_effect) = &self.airframe.ground_effect {
            let force = ground_effect.force(backend.height_above_ground(), &state.linear_velocity);
            if force != Vector3::zeros() {
                backend.apply_force(force);
            }
        }

        for surface in &mut self.airframe.control_surfaces {
            surface.handle(&input);
            surface.update(dt);
        }

        let grounded = backend.is_grounded();
        if grounded {
            let mut brake = 0.0;
            for wheel in &mut self.airframe.wheels {
                wheel.handle(&input, dt);
                brake += wheel.brake_torque();
            }
            backend.set_wheel_brake(brake);
        }

        let target = match &self.trajectory {
            Some(trajectory) => trajectory.sample(trajectory_time),
            None => TargetSample::sentinel(trajectory_time),
        };

        Some(TickReport {
            time: t,
            trajectory_time,
            mode,
            target,
            setpoint: self.attitude.setpoint(),
            attitude,
            command,
            input,
            derived,
            thrust,
            engine_rpm,
            grounded,
        })
    }

    fn raw_target_roll(&self, t: f64) -> Option<f64> {
        let trajectory = self.trajectory.as_ref()?;
        let sample = match self.raw_roll_sampling {
            RawRollSampling::Hold => trajectory.query_raw(t),
            RawRollSampling::Interpolated => trajectory.query(t),
        };
        sample.map(|s| s.roll)
    }

    /// Act on a control-file command received at simulation time `t`.
    pub fn apply_command(&mut self, command: ControlCommand, t: f64) {
        match command {
            ControlCommand::Reload => match self.trajectory.as_mut() {
                Some(trajectory) => match trajectory.reload() {
                    Ok(count) => {
                        // a fresh path starts from its beginning
                        self.epoch = t;
                        self.attitude.reset();
                        log::info!("reloaded trajectory ({count} samples), clock restarted at t={t:.2}");
                    }
                    Err(err) => log::warn!("trajectory reload failed, keeping previous data: {err}"),
                },
                None => log::warn!("reload requested but no trajectory is attached"),
            },
            ControlCommand::Reset => {
                self.epoch = t;
                self.attitude.reset();
                log::info!("trajectory clock restarted at t={t:.2}");
            }
        }
    }

    pub fn trajectory(&self) -> Option<&TargetTrajectory> {
        self.trajectory.as_ref()
    }

    pub fn attitude_controller(&self) -> &AttitudeController {
        &self.attitude
    }

    pub fn attitude_controller_mut(&mut self) -> &mut AttitudeController {
        &mut self.attitude
    }

    pub fn input_provider(&self) -> &InputProvider {
        &self.input
    }

    pub fn flight(&self) -> &FlightDynamics {
        &self.flight
    }

    pub fn airframe(&self) -> &Airframe {
        &self.airframe
    }

    pub fn mode(&self) -> InputMode {
        self.input.mode()
    }

    /// Simulation time the trajectory clock counts from.
    pub fn epoch(&self) -> f64 {
        self.epoch
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl std::fmt::Debug for VehicleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VehicleController")
            .field("airframe", &self.airframe.name)
            .field("attitude", &self.attitude)
            .field("mode", &self.input.mode())
            .field("epoch", &self.epoch)
            .finish()
    }
}
