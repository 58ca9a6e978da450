//! Fixed-wing drone flight dynamics with a trajectory-driven PID attitude
//! loop and a latching manual override.
//!
//! The per-tick pipeline lives in [`vehicle::VehicleController`]; everything
//! physical goes through the [`dynamics::PhysicsBackend`] seam so the same
//! code can drive the bundled [`sim::RigidBody`] or an external engine.

pub mod config;
pub mod control;
pub mod curve;
pub mod dynamics;
pub mod error;
pub mod input;
pub mod io;
pub mod sim;
pub mod trajectory;
pub mod vehicle;

pub use config::SimConfig;
pub use error::{ConfigError, LoadError, SimError};
pub use vehicle::VehicleController;
