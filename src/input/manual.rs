use serde::{Deserialize, Serialize};

use super::provider::ControlInput;

// ---------------------------------------------------------------------------
// Raw operator input
// ---------------------------------------------------------------------------

/// Edge-triggered directional controls; any of them latches manual mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Directions {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// One tick of operator input, as read from whatever device is attached.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualInput {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
    pub throttle: f64,
    pub flap_up: bool,
    pub flap_down: bool,
    pub brake: bool,
    pub camera_switch: bool,
    pub directions: Directions,
}

impl ManualInput {
    pub fn activation_edge(&self) -> bool {
        self.directions.any()
    }
}

// ---------------------------------------------------------------------------
// Manual axis processing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThrottleMode {
    /// Throttle tracks the stick directly.
    #[default]
    Direct,
    /// Stick position is a rate; the throttle holds when released.
    Sticky,
}

/// Turns raw operator input into a fully-populated control vector, keeping
/// the flap detent and the sticky-throttle integrator between ticks.
#[derive(Debug, Clone)]
pub struct ManualAxes {
    pub max_flap_increments: u32,
    pub throttle_mode: ThrottleMode,
    pub throttle_speed: f64,
    flaps: u32,
    sticky_throttle: f64,
}

impl ManualAxes {
    pub fn new(max_flap_increments: u32, throttle_mode: ThrottleMode, throttle_speed: f64) -> Self {
        Self { max_flap_increments, throttle_mode, throttle_speed, flaps: 0, sticky_throttle: 0.0 }
    }

    pub fn flaps(&self) -> u32 {
        self.flaps
    }

    pub fn read(&mut self, raw: &ManualInput, dt: f64) -> ControlInput {
        if raw.flap_up {
            self.flaps = (self.flaps + 1).min(self.max_flap_increments);
        }
        if raw.flap_down {
            self.flaps = self.flaps.saturating_sub(1);
        }

        let throttle = raw.throttle.clamp(-1.0, 1.0);
        let sticky_throttle = match self.throttle_mode {
            ThrottleMode::Direct => throttle,
            ThrottleMode::Sticky => {
                self.sticky_throttle = (self.sticky_throttle + throttle * self.throttle_speed * dt).clamp(0.0, 1.0);
                self.sticky_throttle
            }
        };

        ControlInput {
            pitch: raw.pitch.clamp(-1.0, 1.0),
            // operator roll axis is opposite to the trajectory roll convention
            roll: (-raw.roll).clamp(-1.0, 1.0),
            yaw: raw.yaw.clamp(-1.0, 1.0),
            throttle,
            sticky_throttle,
            flaps: self.flaps,
            brake: if raw.brake { 1.0 } else { 0.0 },
            camera_switch: raw.camera_switch,
            raw_target_roll: 0.0,
        }
    }
}

impl Default for ManualAxes {
    fn default() -> Self {
        Self::new(2, ThrottleMode::Direct, 0.1)
    }
}
