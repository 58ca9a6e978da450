pub mod backend;
pub mod flight;
pub mod roll;
pub mod state;

pub use backend::PhysicsBackend;
pub use flight::{FlightDynamics, FlightParams};
pub use roll::{bank_target, rotate_towards, BankLimits, RollMode};
pub use state::{Attitude, FlightDerived, VehicleState};
