use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::control::PidGains;
use crate::dynamics::FlightParams;
use crate::error::ConfigError;
use crate::input::{ManualAxes, ThrottleMode};
use crate::vehicle::Airframe;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub dt: f64,       // s
    pub max_time: f64, // s
    /// Attitude debug line every N ticks, 0 to disable.
    pub telemetry_log_interval: u64,
    /// Spawn state of the reference rigid body.
    pub initial_altitude: f64, // m
    pub initial_speed: f64,    // m/s, along the nose
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dt: 0.02,       // 50 Hz fixed step
            max_time: 60.0,
            telemetry_log_interval: 60,
            initial_altitude: 100.0,
            initial_speed: 30.0,
        }
    }
}

/// How the bank bins and the yaw cue read the trajectory roll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawRollSampling {
    /// Most recent sample at or before the query time.
    #[default]
    Hold,
    /// Linearly interpolated, the same value the PID sees before scaling.
    Interpolated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryConfig {
    pub path: Option<PathBuf>,
    pub angle_multiplier: f64,
    pub command_file: Option<PathBuf>,
    pub raw_roll_sampling: RawRollSampling,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("data/pid_targets.csv")),
            angle_multiplier: 30.0,
            command_file: None,
            raw_roll_sampling: RawRollSampling::Hold,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidConfig {
    pub pitch: PidGains,
    pub roll: PidGains,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub max_flap_increments: u32,
    pub throttle_mode: ThrottleMode,
    pub throttle_speed: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { max_flap_increments: 2, throttle_mode: ThrottleMode::Direct, throttle_speed: 0.1 }
    }
}

impl InputConfig {
    pub fn axes(&self) -> ManualAxes {
        ManualAxes::new(self.max_flap_increments, self.throttle_mode, self.throttle_speed)
    }
}

// ---------------------------------------------------------------------------
// Whole configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub sim: RunConfig,
    pub trajectory: TrajectoryConfig,
    pub pid: PidConfig,
    pub input: InputConfig,
    pub flight: FlightParams,
    pub airframe: Airframe,
}

impl SimConfig {
    /// Read and validate a YAML file. Missing sections take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml(&contents)?;
        log::info!("loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_yaml::to_string(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Validation(msg));

        if !(self.sim.dt > 0.0) {
            return invalid(format!("sim.dt must be positive, got {}", self.sim.dt));
        }
        if !(self.sim.max_time > 0.0) {
            return invalid(format!("sim.max_time must be positive, got {}", self.sim.max_time));
        }
        if !(self.sim.initial_altitude >= 0.0) || !self.sim.initial_speed.is_finite() {
            return invalid("sim.initial_altitude must be non-negative and sim.initial_speed finite".into());
        }
        if !self.trajectory.angle_multiplier.is_finite() {
            return invalid("trajectory.angle_multiplier must be finite".into());
        }

        let f = &self.flight;
        if !(f.max_speed_mph > 0.0) {
            return invalid(format!("flight.max_speed_mph must be positive, got {}", f.max_speed_mph));
        }
        if !f.lift_curve.is_well_formed() {
            return invalid("flight.lift_curve keys must be finite with strictly increasing times".into());
        }
        let rates = [
            ("flight.roll_rate", f.roll_rate),
            ("flight.manual_roll_rate", f.manual_roll_rate),
            ("flight.relax_gain", f.relax_gain),
            ("flight.drag_factor", f.drag_factor),
            ("flight.flap_drag_factor", f.flap_drag_factor),
            ("input.throttle_speed", self.input.throttle_speed),
        ];
        if let Some((name, value)) = rates.iter().find(|(_, v)| !(*v >= 0.0)) {
            return invalid(format!("{name} must be non-negative, got {value}"));
        }

        let a = &self.airframe;
        if !(a.weight_lb > 0.0) {
            return invalid(format!("airframe.weight_lb must be positive, got {}", a.weight_lb));
        }
        if a.inertia.iter().any(|i| !(*i > 0.0)) {
            return invalid("airframe.inertia components must be positive".into());
        }
        for engine in &a.engines {
            if !engine.power_curve.is_well_formed() {
                return invalid(format!("engine '{}' power curve is malformed", engine.name));
            }
        }
        Ok(())
    }
}
