pub mod command;
pub mod loader;
pub mod target;

pub use command::{poll_command_file, ControlCommand};
pub use loader::parse_targets;
pub use target::{TargetSample, TargetTrajectory};
