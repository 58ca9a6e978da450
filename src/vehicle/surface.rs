use serde::{Deserialize, Serialize};

use crate::input::ControlInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Rudder,
    Elevator,
    Flap,
    Aileron,
}

/// Cosmetic control surface. Deflection follows the control input but never
/// feeds back into the flight model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSurface {
    pub kind: SurfaceKind,
    #[serde(default = "default_max_angle")]
    pub max_angle: f64, // deg
    #[serde(default = "default_smooth_speed")]
    pub smooth_speed: f64,
    #[serde(skip)]
    wanted: f64,
    #[serde(skip)]
    angle: f64,
}

fn default_max_angle() -> f64 {
    30.0
}

fn default_smooth_speed() -> f64 {
    2.0
}

impl ControlSurface {
    pub fn new(kind: SurfaceKind) -> Self {
        Self { kind, max_angle: default_max_angle(), smooth_speed: default_smooth_speed(), wanted: 0.0, angle: 0.0 }
    }

    pub fn handle(&mut self, input: &ControlInput) {
        let value = match self.kind {
            SurfaceKind::Rudder => input.yaw,
            SurfaceKind::Elevator => input.pitch,
            SurfaceKind::Flap => f64::from(input.flaps),
            SurfaceKind::Aileron => input.roll,
        };
        self.wanted = self.max_angle * value;
    }

    /// Ease the deflection toward the wanted angle.
    pub fn update(&mut self, dt: f64) {
        let t = (dt * self.smooth_speed).clamp(0.0, 1.0);
        self.angle += (self.wanted - self.angle) * t;
    }

    pub fn wanted_angle(&self) -> f64 {
        self.wanted
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn each_kind_reads_its_axis() {
        let input = ControlInput { pitch: 0.5, roll: -0.5, yaw: 1.0, flaps: 1, ..Default::default() };
        let wanted = |kind| {
            let mut s = ControlSurface::new(kind);
            s.handle(&input);
            s.wanted_angle()
        };
        assert_eq!(wanted(SurfaceKind::Elevator), 15.0);
        assert_eq!(wanted(SurfaceKind::Aileron), -15.0);
        assert_eq!(wanted(SurfaceKind::Rudder), 30.0);
        assert_eq!(wanted(SurfaceKind::Flap), 30.0);
    }

    #[test]
    fn deflection_eases_toward_wanted() {
        let mut s = ControlSurface::new(SurfaceKind::Elevator);
        s.handle(&ControlInput { pitch: 1.0, ..Default::default() });
        s.update(0.1);
        assert_abs_diff_eq!(s.angle(), 6.0, epsilon = 1e-12);
        for _ in 0..500 {
            s.update(0.1);
        }
        assert_abs_diff_eq!(s.angle(), 30.0, epsilon = 1e-6);
    }
}
