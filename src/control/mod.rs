pub mod attitude;
pub mod controller;
pub mod pid;

pub use attitude::{AttitudeController, PidLaw};
pub use controller::{AttitudeCommand, AttitudeSetpoint, Controller};
pub use pid::{normalize_degrees, Pid, PidGains};
