use nalgebra::Vector3;
use serde::Serialize;

use crate::control::pid::wrap_error;
use crate::dynamics::VehicleState;
use crate::input::InputMode;
use crate::vehicle::TickReport;

/// One row of run telemetry: target vs. current attitude, controller
/// outputs, the merged control vector and where the body was.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryFrame {
    pub time: f64,
    pub mode: InputMode,
    pub target_pitch: f64, // deg
    pub target_roll: f64,  // deg
    pub pitch: f64,        // deg
    pub roll: f64,         // deg
    pub yaw: f64,          // deg
    pub pitch_output: f64,
    pub roll_output: f64,
    pub input_pitch: f64,
    pub input_roll: f64,
    pub input_yaw: f64,
    pub throttle: f64,
    pub flaps: u32,
    pub brake: f64,
    pub raw_target_roll: f64,
    pub forward_speed: f64, // m/s
    pub mph: f64,
    pub altitude: f64, // m
    pub position: Vector3<f64>,
    pub grounded: bool,
}

impl TelemetryFrame {
    /// Combine a tick report with the body snapshot taken before the tick.
    pub fn new(report: &TickReport, state: &VehicleState) -> Self {
        Self {
            time: report.time,
            mode: report.mode,
            target_pitch: report.setpoint.pitch,
            target_roll: report.setpoint.roll,
            pitch: report.attitude.pitch,
            roll: report.attitude.roll,
            yaw: report.attitude.yaw,
            pitch_output: report.command.pitch,
            roll_output: report.command.roll,
            input_pitch: report.input.pitch,
            input_roll: report.input.roll,
            input_yaw: report.input.yaw,
            throttle: report.input.sticky_throttle,
            flaps: report.input.flaps,
            brake: report.input.brake,
            raw_target_roll: report.input.raw_target_roll,
            forward_speed: report.derived.forward_speed,
            mph: report.derived.mph,
            altitude: state.altitude(),
            position: state.position,
            grounded: report.grounded,
        }
    }

    /// Bank angle magnitude, deg.
    pub fn bank(&self) -> f64 {
        self.roll.abs()
    }

    /// Shortest signed pitch error, deg.
    pub fn pitch_error(&self) -> f64 {
        wrap_error(self.target_pitch - self.pitch)
    }

    /// Shortest signed roll error, deg. Matches what the roll PID sees.
    pub fn roll_error(&self) -> f64 {
        wrap_error(self.target_roll - self.roll)
    }
}

#[cfg(test)]
pub(crate) fn frame(time: f64) -> TelemetryFrame {
    TelemetryFrame {
        time,
        mode: InputMode::TrajectoryDriven,
        target_pitch: 0.0,
        target_roll: 0.0,
        pitch: 0.0,
        roll: 0.0,
        yaw: 0.0,
        pitch_output: 0.0,
        roll_output: 0.0,
        input_pitch: 0.0,
        input_roll: 0.0,
        input_yaw: 0.0,
        throttle: 1.0,
        flaps: 0,
        brake: 0.0,
        raw_target_roll: 0.0,
        forward_speed: 0.0,
        mph: 0.0,
        altitude: 0.0,
        position: Vector3::zeros(),
        grounded: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn roll_error_takes_the_short_way_across_180() {
        let f = TelemetryFrame { target_roll: 179.0, roll: -179.0, ..frame(0.0) };
        assert_abs_diff_eq!(f.roll_error(), -2.0, epsilon = 1e-12);
        let f = TelemetryFrame { target_roll: -179.0, roll: 179.0, ..frame(0.0) };
        assert_abs_diff_eq!(f.roll_error(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn small_errors_are_unchanged() {
        let f = TelemetryFrame { target_pitch: 10.0, pitch: 4.0, target_roll: -5.0, roll: 20.0, ..frame(0.0) };
        assert_abs_diff_eq!(f.pitch_error(), 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(f.roll_error(), -25.0, epsilon = 1e-12);
    }
}
