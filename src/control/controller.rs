use serde::Serialize;

use crate::dynamics::state::Attitude;

/// Desired attitude in degrees, already scaled from the normalized file targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AttitudeSetpoint {
    pub pitch: f64,
    pub roll: f64,
}

/// Normalized control outputs in [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AttitudeCommand {
    pub pitch: f64,
    pub roll: f64,
}

/// Trait for attitude control laws.
///
/// Implement this to swap the PID pair for another law; the attitude
/// controller handles enabling, target scaling and the not-ready case.
pub trait Controller {
    /// Compute pitch/roll outputs from a setpoint and the current attitude.
    fn control(&mut self, setpoint: &AttitudeSetpoint, attitude: &Attitude, dt: f64) -> AttitudeCommand;

    /// Reset controller internal state (e.g., PID integrators).
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
