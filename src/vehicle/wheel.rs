use serde::{Deserialize, Serialize};

use crate::input::ControlInput;

/// Brake input below this releases the brake entirely.
const BRAKE_DEADBAND: f64 = 0.1;

/// Landing-gear wheel: optional brake and nose-wheel steering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wheel {
    pub name: String,
    pub braking: bool,
    pub brake_power: f64,
    pub steering: bool,
    pub steer_angle: f64, // deg
    pub steer_smooth_speed: f64,
    #[serde(skip)]
    brake_torque: f64,
    #[serde(skip)]
    steer: f64,
}

impl Default for Wheel {
    fn default() -> Self {
        Self {
            name: "wheel".into(),
            braking: false,
            brake_power: 5.0,
            steering: false,
            steer_angle: 20.0,
            steer_smooth_speed: 2.0,
            brake_torque: 0.0,
            steer: 0.0,
        }
    }
}

impl Wheel {
    pub fn main(name: impl Into<String>) -> Self {
        Self { name: name.into(), braking: true, ..Default::default() }
    }

    pub fn nose(name: impl Into<String>) -> Self {
        Self { name: name.into(), steering: true, ..Default::default() }
    }

    pub fn handle(&mut self, input: &ControlInput, dt: f64) {
        if self.braking {
            if input.brake > BRAKE_DEADBAND {
                let t = dt.clamp(0.0, 1.0);
                self.brake_torque += (input.brake * self.brake_power - self.brake_torque) * t;
            } else {
                self.brake_torque = 0.0;
            }
        }
        if self.steering {
            let t = (dt * self.steer_smooth_speed).clamp(0.0, 1.0);
            self.steer += (-input.yaw * self.steer_angle - self.steer) * t;
        }
    }

    pub fn brake_torque(&self) -> f64 {
        self.brake_torque
    }

    pub fn steer_angle(&self) -> f64 {
        self.steer
    }
}
