use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PID Controller (single angular axis, degrees)
// ---------------------------------------------------------------------------

/// Tunable gains, kept separate so they can live in config files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl Default for PidGains {
    fn default() -> Self {
        Self { kp: 2.0, ki: 0.5, kd: 0.1 }
    }
}

#[derive(Debug, Clone)]
pub struct Pid {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    integral: f64,
    last_error: f64,
}

impl Pid {
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd, integral: 0.0, last_error: 0.0 }
    }

    pub fn from_gains(gains: PidGains) -> Self {
        Self::new(gains.kp, gains.ki, gains.kd)
    }

    /// One control step. `current` must already be in (-180, 180].
    /// Output is clamped to [-1, 1]; the integral itself is not clamped.
    pub fn update(&mut self, target: f64, current: f64, dt: f64) -> f64 {
        let error = wrap_error(target - current);

        self.integral += error * dt;
        let derivative = if dt != 0.0 { (error - self.last_error) / dt } else { 0.0 };
        self.last_error = error;

        (self.kp * error + self.ki * self.integral + self.kd * derivative).clamp(-1.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = 0.0;
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    pub fn last_error(&self) -> f64 {
        self.last_error
    }
}

impl Default for Pid {
    fn default() -> Self {
        Self::from_gains(PidGains::default())
    }
}

/// Shortest-path angular error: anything beyond ±180° goes the other way round.
pub fn wrap_error(error: f64) -> f64 {
    if error.abs() > 180.0 {
        error.signum() * (error.abs() - 360.0)
    } else {
        error
    }
}

/// Map any angle in degrees into (-180, 180].
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}
