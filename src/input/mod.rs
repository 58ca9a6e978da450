pub mod manual;
pub mod provider;

pub use manual::{Directions, ManualAxes, ManualInput, ThrottleMode};
pub use provider::{ControlInput, InputMode, InputProvider};
