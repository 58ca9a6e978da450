use super::telemetry::TelemetryFrame;
use crate::input::InputMode;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Takeover,
    Liftoff,
    Touchdown,
    TrajectoryEnd,
    Custom(String),
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Takeover => write!(f, "Manual takeover"),
            EventKind::Liftoff => write!(f, "Liftoff"),
            EventKind::Touchdown => write!(f, "Touchdown"),
            EventKind::TrajectoryEnd => write!(f, "Trajectory end"),
            EventKind::Custom(s) => write!(f, "{s}"),
        }
    }
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub frame: TelemetryFrame,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive frames and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &TelemetryFrame, current: &TelemetryFrame) -> Option<EventKind>;
}

/// Fires on the tick the input provider latches manual mode.
pub struct TakeoverDetector;

impl EventDetector for TakeoverDetector {
    fn check(&mut self, prev: &TelemetryFrame, current: &TelemetryFrame) -> Option<EventKind> {
        (prev.mode != InputMode::Manual && current.mode == InputMode::Manual).then_some(EventKind::Takeover)
    }
}

/// Fires once when altitude crosses a threshold on the way up.
pub struct LiftoffDetector {
    pub altitude: f64,
    fired: bool,
}

impl LiftoffDetector {
    pub fn new(altitude: f64) -> Self {
        Self { altitude, fired: false }
    }
}

impl EventDetector for LiftoffDetector {
    fn check(&mut self, prev: &TelemetryFrame, current: &TelemetryFrame) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        if prev.altitude < self.altitude && current.altitude >= self.altitude {
            self.fired = true;
            Some(EventKind::Liftoff)
        } else {
            None
        }
    }
}

/// Fires when the wheels come into contact with the ground.
pub struct TouchdownDetector;

impl EventDetector for TouchdownDetector {
    fn check(&mut self, prev: &TelemetryFrame, current: &TelemetryFrame) -> Option<EventKind> {
        (!prev.grounded && current.grounded).then_some(EventKind::Touchdown)
    }
}

/// Fires once when simulation time passes the last trajectory sample.
pub struct TrajectoryEndDetector {
    pub end_time: f64,
    fired: bool,
}

impl TrajectoryEndDetector {
    pub fn new(end_time: f64) -> Self {
        Self { end_time, fired: false }
    }
}

impl EventDetector for TrajectoryEndDetector {
    fn check(&mut self, prev: &TelemetryFrame, current: &TelemetryFrame) -> Option<EventKind> {
        if self.fired || !(prev.time < self.end_time && current.time >= self.end_time) {
            return None;
        }
        self.fired = true;
        Some(EventKind::TrajectoryEnd)
    }
}

/// Run every detector over consecutive frames, in time order.
pub fn detect_events(frames: &[TelemetryFrame], detectors: &mut [Box<dyn EventDetector>]) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for pair in frames.windows(2) {
        for detector in detectors.iter_mut() {
            if let Some(kind) = detector.check(&pair[0], &pair[1]) {
                events.push(SimEvent { time: pair[1].time, kind, frame: pair[1].clone() });
            }
        }
    }
    events
}
