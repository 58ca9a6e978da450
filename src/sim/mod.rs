pub mod event;
pub mod rigid_body;
pub mod runner;
pub mod telemetry;

pub use event::{
    detect_events, EventDetector, EventKind, LiftoffDetector, SimEvent, TakeoverDetector, TouchdownDetector,
    TrajectoryEndDetector,
};
pub use rigid_body::RigidBody;
pub use runner::{simulate, simulate_with, spawn_body, IdleManual, ManualSource, ScriptedManual, SteppedBackend};
pub use telemetry::TelemetryFrame;
