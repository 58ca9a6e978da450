use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::engine::Engine;
use super::ground_effect::GroundEffect;
use super::surface::{ControlSurface, SurfaceKind};
use super::wheel::Wheel;
use crate::dynamics::state::POUNDS_TO_KILOS;

// ---------------------------------------------------------------------------
// Airframe: mass properties plus the attached sub-models
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Airframe {
    pub name: String,
    pub weight_lb: f64,
    pub center_of_mass: Vector3<f64>, // body frame offset, m
    pub inertia: Vector3<f64>,        // [Ixx, Iyy, Izz], kg·m^2
    pub engines: Vec<Engine>,
    pub control_surfaces: Vec<ControlSurface>,
    pub wheels: Vec<Wheel>,
    pub ground_effect: Option<GroundEffect>,
}

impl Airframe {
    pub fn mass_kg(&self) -> f64 {
        self.weight_lb * POUNDS_TO_KILOS
    }

    /// Combined full-throttle thrust, N.
    pub fn max_thrust(&self) -> f64 {
        self.engines.iter().map(|e| e.max_force).sum()
    }
}

impl Default for Airframe {
    fn default() -> Self {
        presets::trainer()
    }
}

// ---------------------------------------------------------------------------
// Airframe builder
// ---------------------------------------------------------------------------

pub struct AirframeBuilder {
    name: String,
    weight_lb: f64,
    center_of_mass: Vector3<f64>,
    inertia: Vector3<f64>,
    engines: Vec<Engine>,
    control_surfaces: Vec<ControlSurface>,
    wheels: Vec<Wheel>,
    ground_effect: Option<GroundEffect>,
}

impl AirframeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight_lb: 800.0,
            center_of_mass: Vector3::zeros(),
            inertia: Vector3::new(400.0, 600.0, 900.0),
            engines: vec![],
            control_surfaces: vec![],
            wheels: vec![],
            ground_effect: None,
        }
    }

    pub fn weight_lb(mut self, v: f64) -> Self { self.weight_lb = v; self }
    pub fn center_of_mass(mut self, v: Vector3<f64>) -> Self { self.center_of_mass = v; self }
    pub fn inertia(mut self, v: Vector3<f64>) -> Self { self.inertia = v; self }
    pub fn engine(mut self, v: Engine) -> Self { self.engines.push(v); self }
    pub fn surface(mut self, v: ControlSurface) -> Self { self.control_surfaces.push(v); self }
    pub fn wheel(mut self, v: Wheel) -> Self { self.wheels.push(v); self }
    pub fn ground_effect(mut self, v: GroundEffect) -> Self { self.ground_effect = Some(v); self }

    pub fn build(self) -> Airframe {
        Airframe {
            name: self.name,
            weight_lb: self.weight_lb,
            center_of_mass: self.center_of_mass,
            inertia: self.inertia,
            engines: self.engines,
            control_surfaces: self.control_surfaces,
            wheels: self.wheels,
            ground_effect: self.ground_effect,
        }
    }
}

// ---------------------------------------------------------------------------
// Preset airframes
// ---------------------------------------------------------------------------

pub mod presets {
    use super::*;

    /// Single-engine trainer with tricycle gear.
    pub fn trainer() -> Airframe {
        AirframeBuilder::new("Trainer")
            .weight_lb(800.0)
            .center_of_mass(Vector3::new(0.1, 0.0, 0.0))
            .engine(Engine::new("prop", 200.0, 2550.0))
            .surface(ControlSurface::new(SurfaceKind::Elevator))
            .surface(ControlSurface::new(SurfaceKind::Rudder))
            .surface(ControlSurface::new(SurfaceKind::Aileron))
            .surface(ControlSurface::new(SurfaceKind::Aileron))
            .surface(ControlSurface::new(SurfaceKind::Flap))
            .wheel(Wheel::nose("nose"))
            .wheel(Wheel::main("left"))
            .wheel(Wheel::main("right"))
            .ground_effect(GroundEffect::default())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn weight_converts_to_kilograms() {
        let a = AirframeBuilder::new("t").weight_lb(800.0).build();
        assert_relative_eq!(a.mass_kg(), 362.8736, epsilon = 1e-9);
    }

    #[test]
    fn trainer_preset_is_complete() {
        let t = presets::trainer();
        assert_eq!(t.engines.len(), 1);
        assert_eq!(t.max_thrust(), 200.0);
        assert_eq!(t.wheels.iter().filter(|w| w.steering).count(), 1);
        assert_eq!(t.wheels.iter().filter(|w| w.braking).count(), 2);
        assert!(t.ground_effect.is_some());
    }
}
