use serde::Serialize;

use super::manual::{ManualAxes, ManualInput};
use crate::control::AttitudeCommand;

// ---------------------------------------------------------------------------
// Unified control vector
// ---------------------------------------------------------------------------

/// Control-surface input for one tick. Every field is always populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ControlInput {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
    pub throttle: f64,
    pub sticky_throttle: f64,
    pub flaps: u32,
    pub brake: f64,
    pub camera_switch: bool,
    /// Unscaled, non-PID trajectory roll target used by the bank-angle bins.
    pub raw_target_roll: f64,
}

/// Which source produces the control vector. Trajectory-driven until the
/// operator touches a directional control, then manual for good.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum InputMode {
    #[default]
    TrajectoryDriven,
    Manual,
}

// ---------------------------------------------------------------------------
// Input provider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct InputProvider {
    mode: InputMode,
    manual: ManualAxes,
    current: ControlInput,
}

impl InputProvider {
    pub fn new(manual: ManualAxes) -> Self {
        Self { mode: InputMode::TrajectoryDriven, manual, current: ControlInput::default() }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn is_manual(&self) -> bool {
        self.mode == InputMode::Manual
    }

    /// Latch manual mode. There is no way back.
    pub fn take_over(&mut self) {
        if self.mode != InputMode::Manual {
            log::info!("manual takeover latched");
            self.mode = InputMode::Manual;
        }
    }

    /// Last produced control vector.
    pub fn current(&self) -> ControlInput {
        self.current
    }

    pub fn manual_axes(&self) -> &ManualAxes {
        &self.manual
    }

    /// Produce this tick's control vector.
    ///
    /// `command` is the attitude controller output (zero when it is disabled)
    /// and `raw_target_roll` the un-interpolated trajectory roll target at
    /// this instant (`None` when the trajectory is not ready).
    pub fn update(
        &mut self,
        command: AttitudeCommand,
        raw_target_roll: Option<f64>,
        raw: &ManualInput,
        dt: f64,
    ) -> ControlInput {
        let manual = self.manual.read(raw, dt);
        if raw.activation_edge() {
            self.take_over();
        }
        let raw_target_roll = raw_target_roll.unwrap_or(0.0);

        self.current = match self.mode {
            InputMode::TrajectoryDriven => ControlInput {
                pitch: command.pitch.clamp(-1.0, 1.0),
                roll: command.roll.clamp(-1.0, 1.0),
                // coordinated-turn cue from the raw target, not the PID roll
                yaw: (-raw_target_roll).clamp(-1.0, 1.0),
                throttle: 0.0,
                sticky_throttle: 1.0,
                flaps: 0,
                brake: 0.0,
                camera_switch: false,
                raw_target_roll,
            },
            InputMode::Manual => ControlInput { raw_target_roll, ..manual },
        };
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::manual::Directions;

    fn pid_out() -> AttitudeCommand {
        AttitudeCommand { pitch: 0.3, roll: -0.6 }
    }

    fn stick(pitch: f64, roll: f64) -> ManualInput {
        ManualInput { pitch, roll, yaw: 0.2, throttle: 0.4, ..Default::default() }
    }

    fn edge() -> ManualInput {
        ManualInput { directions: Directions { up: true, ..Default::default() }, ..stick(0.5, 0.5) }
    }

    #[test]
    fn trajectory_mode_uses_pid_and_raw_roll_for_yaw() {
        let mut provider = InputProvider::default();
        let out = provider.update(pid_out(), Some(1.0), &stick(0.9, 0.9), 0.02);
        assert_eq!(provider.mode(), InputMode::TrajectoryDriven);
        assert_eq!(out.pitch, 0.3);
        assert_eq!(out.roll, -0.6);
        assert_eq!(out.yaw, -1.0);
        assert_eq!(out.sticky_throttle, 1.0);
        assert_eq!(out.flaps, 0);
        assert_eq!(out.brake, 0.0);
        assert!(!out.camera_switch);
        assert_eq!(out.raw_target_roll, 1.0);
    }

    #[test]
    fn not_ready_trajectory_gives_zero_yaw() {
        let mut provider = InputProvider::default();
        let out = provider.update(AttitudeCommand::default(), None, &ManualInput::default(), 0.02);
        assert_eq!(out.yaw, 0.0);
        assert_eq!(out.raw_target_roll, 0.0);
    }

    #[test]
    fn activation_edge_switches_on_the_same_tick() {
        let mut provider = InputProvider::default();
        let out = provider.update(pid_out(), Some(1.0), &edge(), 0.02);
        assert!(provider.is_manual());
        assert_eq!(out.pitch, 0.5);
        assert_eq!(out.roll, -0.5);
        assert_eq!(out.sticky_throttle, 0.4);
    }

    #[test]
    fn manual_mode_is_sticky() {
        let mut provider = InputProvider::default();
        provider.update(pid_out(), Some(0.0), &edge(), 0.02);
        for _ in 0..100 {
            let out = provider.update(pid_out(), Some(-1.0), &stick(-0.2, 0.1), 0.02);
            assert_eq!(provider.mode(), InputMode::Manual);
            assert_eq!(out.pitch, -0.2);
            assert_eq!(out.yaw, 0.2);
        }
    }
}
