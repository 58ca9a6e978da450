use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::input::InputMode;
use crate::sim::{SimEvent, TelemetryFrame};

/// Summary statistics computed from run telemetry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightSummary {
    pub duration_s: f64,
    pub max_speed_mph: f64,
    pub max_altitude_m: f64,
    pub max_bank_deg: f64,
    /// RMS tracking error over trajectory-driven ticks, deg.
    pub pitch_rms_error_deg: f64,
    pub roll_rms_error_deg: f64,
    pub takeover_time_s: Option<f64>,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub time: f64,
    pub event: String,
}

impl FlightSummary {
    /// Compute summary from telemetry. An empty run gives all zeros.
    pub fn from_telemetry(frames: &[TelemetryFrame]) -> Self {
        let max = |f: fn(&TelemetryFrame) -> f64| frames.iter().map(f).fold(0.0_f64, f64::max);

        let tracking: Vec<&TelemetryFrame> =
            frames.iter().filter(|f| f.mode == InputMode::TrajectoryDriven).collect();
        let rms = |err: fn(&TelemetryFrame) -> f64| {
            if tracking.is_empty() {
                return 0.0;
            }
            (tracking.iter().map(|f| err(f).powi(2)).sum::<f64>() / tracking.len() as f64).sqrt()
        };

        FlightSummary {
            duration_s: frames.last().map_or(0.0, |f| f.time),
            max_speed_mph: max(|f| f.mph),
            max_altitude_m: max(|f| f.altitude),
            max_bank_deg: max(|f| f.bank()),
            pitch_rms_error_deg: rms(|f| f.pitch_error()),
            roll_rms_error_deg: rms(|f| f.roll_error()),
            takeover_time_s: frames.iter().find(|f| f.mode == InputMode::Manual).map(|f| f.time),
            events: vec![],
        }
    }

    pub fn with_events(mut self, events: &[SimEvent]) -> Self {
        self.events = events.iter().map(|e| EventRecord { time: e.time, event: e.kind.to_string() }).collect();
        self
    }
}

/// Write flight summary as pretty JSON to a writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &FlightSummary) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, summary)
}

/// Write flight summary JSON to a file.
pub fn write_summary_file(path: impl AsRef<Path>, summary: &FlightSummary) -> Result<(), crate::error::SimError> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::telemetry::frame;
    use crate::sim::EventKind;
    use approx::assert_abs_diff_eq;

    fn simple_run() -> Vec<TelemetryFrame> {
        vec![
            TelemetryFrame { target_pitch: 3.0, pitch: 0.0, mph: 60.0, altitude: 100.0, ..frame(0.0) },
            TelemetryFrame { target_roll: 4.0, roll: 0.0, mph: 80.0, altitude: 120.0, ..frame(1.0) },
            TelemetryFrame { mode: InputMode::Manual, roll: -40.0, altitude: 90.0, ..frame(2.0) },
        ]
    }

    #[test]
    fn summary_computes_extremes_and_tracking() {
        let s = FlightSummary::from_telemetry(&simple_run());
        assert_eq!(s.duration_s, 2.0);
        assert_eq!(s.max_speed_mph, 80.0);
        assert_eq!(s.max_altitude_m, 120.0);
        assert_eq!(s.max_bank_deg, 40.0);
        assert_abs_diff_eq!(s.pitch_rms_error_deg, (9.0_f64 / 2.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(s.roll_rms_error_deg, (16.0_f64 / 2.0).sqrt(), epsilon = 1e-12);
        assert_eq!(s.takeover_time_s, Some(2.0));
    }

    #[test]
    fn empty_run_is_all_zero() {
        assert_eq!(FlightSummary::from_telemetry(&[]), FlightSummary::default());
    }

    #[test]
    fn json_output_is_valid() {
        let frames = simple_run();
        let events = vec![SimEvent { time: 2.0, kind: EventKind::Takeover, frame: frames[2].clone() }];
        let summary = FlightSummary::from_telemetry(&frames).with_events(&events);

        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["max_altitude_m"], 120.0);
        assert_eq!(value["events"][0]["event"], "Manual takeover");
        assert_eq!(value["takeover_time_s"], 2.0);
    }
}
