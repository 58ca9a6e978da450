use super::controller::{AttitudeCommand, AttitudeSetpoint, Controller};
use super::pid::{normalize_degrees, Pid, PidGains};
use crate::dynamics::state::Attitude;
use crate::error::DependencyMissing;
use crate::trajectory::TargetTrajectory;

// ---------------------------------------------------------------------------
// PID law: one independent loop per axis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PidLaw {
    pub pitch_pid: Pid,
    pub roll_pid: Pid,
}

impl PidLaw {
    pub fn new(pitch: PidGains, roll: PidGains) -> Self {
        Self { pitch_pid: Pid::from_gains(pitch), roll_pid: Pid::from_gains(roll) }
    }
}

impl Default for PidLaw {
    fn default() -> Self {
        Self::new(PidGains::default(), PidGains::default())
    }
}

impl Controller for PidLaw {
    fn control(&mut self, setpoint: &AttitudeSetpoint, attitude: &Attitude, dt: f64) -> AttitudeCommand {
        AttitudeCommand {
            pitch: self.pitch_pid.update(setpoint.pitch, normalize_degrees(attitude.pitch), dt),
            roll: self.roll_pid.update(setpoint.roll, normalize_degrees(attitude.roll), dt),
        }
    }

    fn reset(&mut self) {
        self.pitch_pid.reset();
        self.roll_pid.reset();
    }

    fn name(&self) -> &str {
        "PidLaw"
    }
}

// ---------------------------------------------------------------------------
// Attitude controller: trajectory target -> control law -> bounded outputs
// ---------------------------------------------------------------------------

/// Drives pitch/roll outputs from the reference trajectory.
///
/// Targets in the trajectory file are normalized; they are scaled to
/// degrees by `angle_multiplier` before reaching the law. While disabled,
/// or while the trajectory is not ready, outputs are zero and the law's
/// state is left alone.
pub struct AttitudeController {
    law: Box<dyn Controller>,
    pub angle_multiplier: f64,
    enabled: bool,
    setpoint: AttitudeSetpoint,
    command: AttitudeCommand,
    log_interval: u64,
    ticks: u64,
}

impl AttitudeController {
    pub fn new(mut law: Box<dyn Controller>, angle_multiplier: f64) -> Self {
        law.reset();
        Self {
            law,
            angle_multiplier,
            enabled: true,
            setpoint: AttitudeSetpoint::default(),
            command: AttitudeCommand::default(),
            log_interval: 60,
            ticks: 0,
        }
    }

    pub fn pid(pitch: PidGains, roll: PidGains, angle_multiplier: f64) -> Self {
        Self::new(Box::new(PidLaw::new(pitch, roll)), angle_multiplier)
    }

    /// Emit a debug telemetry line every `ticks` updates (0 disables).
    pub fn with_log_interval(mut self, ticks: u64) -> Self {
        self.log_interval = ticks;
        self
    }

    pub fn log_interval(&self) -> u64 {
        self.log_interval
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enabling a disabled controller clears the law's state so no integral
    /// carries over from an earlier session.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.law.reset();
        }
        self.enabled = enabled;
        if !enabled {
            self.command = AttitudeCommand::default();
        }
    }

    pub fn reset(&mut self) {
        self.law.reset();
        self.command = AttitudeCommand::default();
    }

    pub fn law_name(&self) -> &str {
        self.law.name()
    }

    /// Last scaled target, in degrees.
    pub fn setpoint(&self) -> AttitudeSetpoint {
        self.setpoint
    }

    /// Last outputs.
    pub fn command(&self) -> AttitudeCommand {
        self.command
    }

    pub fn update(
        &mut self,
        trajectory: Option<&TargetTrajectory>,
        t: f64,
        attitude: &Attitude,
        dt: f64,
    ) -> AttitudeCommand {
        if !self.enabled {
            return AttitudeCommand::default();
        }
        let Some(trajectory) = trajectory else {
            let err = DependencyMissing { component: "AttitudeController", dependency: "trajectory" };
            log::error!("{err}; disabling");
            self.enabled = false;
            self.command = AttitudeCommand::default();
            return self.command;
        };
        let Some(target) = trajectory.query(t) else {
            self.command = AttitudeCommand::default();
            return self.command;
        };

        self.setpoint = AttitudeSetpoint {
            pitch: target.pitch * self.angle_multiplier,
            roll: target.roll * self.angle_multiplier,
        };
        let raw = self.law.control(&self.setpoint, attitude, dt);
        self.command = AttitudeCommand { pitch: raw.pitch.clamp(-1.0, 1.0), roll: raw.roll.clamp(-1.0, 1.0) };

        self.ticks += 1;
        if self.log_interval > 0 && self.ticks % self.log_interval == 0 {
            log::debug!(
                "t={t:.2} target(P:{:.2}, R:{:.2}) current(P:{:.2}, R:{:.2}) output(P:{:.2}, R:{:.2})",
                self.setpoint.pitch,
                self.setpoint.roll,
                attitude.pitch,
                attitude.roll,
                self.command.pitch,
                self.command.roll,
            );
        }

        self.command
    }
}

impl Default for AttitudeController {
    fn default() -> Self {
        Self::new(Box::new(PidLaw::default()), 30.0)
    }
}

impl std::fmt::Debug for AttitudeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttitudeController")
            .field("law", &self.law.name())
            .field("angle_multiplier", &self.angle_multiplier)
            .field("enabled", &self.enabled)
            .field("command", &self.command)
            .finish()
    }
}
