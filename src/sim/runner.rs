use super::rigid_body::RigidBody;
use super::telemetry::TelemetryFrame;
use crate::config::SimConfig;
use crate::dynamics::PhysicsBackend;
use crate::input::{Directions, ManualInput};
use crate::trajectory::{poll_command_file, TargetTrajectory};
use crate::vehicle::VehicleController;

// ---------------------------------------------------------------------------
// Backends the runner can advance
// ---------------------------------------------------------------------------

/// A physics backend that also owns its own integration step.
pub trait SteppedBackend: PhysicsBackend {
    fn step(&mut self, dt: f64);
}

impl SteppedBackend for RigidBody {
    fn step(&mut self, dt: f64) {
        RigidBody::step(self, dt);
    }
}

// ---------------------------------------------------------------------------
// Manual input sources
// ---------------------------------------------------------------------------

/// Supplies one tick of operator input.
pub trait ManualSource {
    fn poll(&mut self, t: f64) -> ManualInput;
}

/// An operator who never touches the controls.
pub struct IdleManual;

impl ManualSource for IdleManual {
    fn poll(&mut self, _t: f64) -> ManualInput {
        ManualInput::default()
    }
}

/// Timed list of operator inputs. Each entry takes effect at its time and is
/// held until the next one; edge-triggered controls (directions, flap steps,
/// camera switch) are delivered on the first tick only.
#[derive(Debug, Clone, Default)]
pub struct ScriptedManual {
    steps: Vec<(f64, ManualInput)>,
    cursor: usize,
    held: ManualInput,
}

impl ScriptedManual {
    pub fn new(mut steps: Vec<(f64, ManualInput)>) -> Self {
        steps.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { steps, cursor: 0, held: ManualInput::default() }
    }

    /// Grab the controls at `t` and fly straight and level from then on.
    pub fn takeover_at(t: f64) -> Self {
        let grab = ManualInput {
            throttle: 1.0,
            directions: Directions { up: true, ..Default::default() },
            ..Default::default()
        };
        Self::new(vec![(t, grab)])
    }

    pub fn then(mut self, t: f64, input: ManualInput) -> Self {
        self.steps.push((t, input));
        self.steps.sort_by(|a, b| a.0.total_cmp(&b.0));
        self
    }
}

impl ManualSource for ScriptedManual {
    fn poll(&mut self, t: f64) -> ManualInput {
        let mut fresh = None;
        while let Some((at, input)) = self.steps.get(self.cursor) {
            if *at > t {
                break;
            }
            fresh = Some(*input);
            self.cursor += 1;
        }
        match fresh {
            Some(input) => {
                self.held = ManualInput {
                    flap_up: false,
                    flap_down: false,
                    camera_switch: false,
                    directions: Directions::default(),
                    ..input
                };
                input
            }
            None => self.held,
        }
    }
}

// ---------------------------------------------------------------------------
// Fixed-step run loop
// ---------------------------------------------------------------------------

/// Drive `vehicle` through `backend` at a fixed step until `config.sim.max_time`.
/// Ticks where the backend has no body produce no frame.
pub fn simulate_with(
    vehicle: &mut VehicleController,
    backend: &mut dyn SteppedBackend,
    manual: &mut dyn ManualSource,
    config: &SimConfig,
) -> Vec<TelemetryFrame> {
    let dt = config.sim.dt;
    let steps = (config.sim.max_time / dt).round() as usize;
    let mut frames = Vec::with_capacity(steps.min(200_000));

    for i in 0..steps {
        let t = i as f64 * dt;

        if let Some(path) = &config.trajectory.command_file {
            match poll_command_file(path) {
                Ok(Some(command)) => vehicle.apply_command(command, t),
                Ok(None) => {}
                Err(err) => log::warn!("failed to read command file {}: {err}", path.display()),
            }
        }

        let input = manual.poll(t);
        let before = backend.state();
        let report = vehicle.tick(backend, &input, t, dt);
        backend.step(dt);

        if let (Some(report), Some(state)) = (report, before) {
            frames.push(TelemetryFrame::new(&report, &state));
        }
    }

    frames
}

/// Reference body spawned as the config describes.
pub fn spawn_body(config: &SimConfig) -> RigidBody {
    RigidBody::airborne(
        config.airframe.mass_kg(),
        config.airframe.inertia,
        config.sim.initial_altitude,
        config.sim.initial_speed,
    )
}

/// Run with the reference rigid body and an idle operator.
pub fn simulate(config: &SimConfig, trajectory: TargetTrajectory) -> Vec<TelemetryFrame> {
    let mut vehicle = VehicleController::new(config, Some(trajectory));
    let mut body = spawn_body(config);
    simulate_with(&mut vehicle, &mut body, &mut IdleManual, config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
