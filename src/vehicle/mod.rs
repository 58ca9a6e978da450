pub mod airframe;
pub mod controller;
pub mod engine;
pub mod ground_effect;
pub mod surface;
pub mod wheel;

pub use airframe::{presets, Airframe, AirframeBuilder};
pub use controller::{TickReport, VehicleController};
pub use engine::Engine;
pub use ground_effect::GroundEffect;
pub use surface::{ControlSurface, SurfaceKind};
pub use wheel::Wheel;
