use std::io::{self, Write};
use std::path::Path;

use crate::input::InputMode;
use crate::sim::TelemetryFrame;

/// Write run telemetry in CSV format.
///
/// Columns: time, mode, target_pitch, target_roll, pitch, roll, yaw,
///          pitch_output, roll_output, input_pitch, input_roll, input_yaw,
///          throttle, flaps, brake, raw_target_roll, forward_speed, mph,
///          altitude, pos_x, pos_y, pos_z, grounded
pub fn write_telemetry<W: Write>(writer: &mut W, frames: &[TelemetryFrame]) -> io::Result<()> {
    writeln!(
        writer,
        "time,mode,target_pitch,target_roll,pitch,roll,yaw,\
         pitch_output,roll_output,input_pitch,input_roll,input_yaw,\
         throttle,flaps,brake,raw_target_roll,forward_speed,mph,\
         altitude,pos_x,pos_y,pos_z,grounded"
    )?;

    for f in frames {
        let mode = match f.mode {
            InputMode::TrajectoryDriven => "trajectory",
            InputMode::Manual => "manual",
        };
        writeln!(
            writer,
            "{:.4},{},{:.3},{:.3},{:.3},{:.3},{:.3},\
             {:.4},{:.4},{:.4},{:.4},{:.4},\
             {:.3},{},{:.2},{:.3},{:.3},{:.2},\
             {:.3},{:.3},{:.3},{:.3},{}",
            f.time, mode, f.target_pitch, f.target_roll, f.pitch, f.roll, f.yaw,
            f.pitch_output, f.roll_output, f.input_pitch, f.input_roll, f.input_yaw,
            f.throttle, f.flaps, f.brake, f.raw_target_roll, f.forward_speed, f.mph,
            f.altitude, f.position.x, f.position.y, f.position.z, u8::from(f.grounded),
        )?;
    }

    Ok(())
}

/// Write telemetry to a CSV file at the given path.
pub fn write_telemetry_file(path: impl AsRef<Path>, frames: &[TelemetryFrame]) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_telemetry(&mut file, frames)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::telemetry::frame;

    #[test]
    fn csv_output_has_header_and_rows() {
        let frames = vec![
            frame(0.0),
            TelemetryFrame { mode: InputMode::Manual, roll: -35.0, flaps: 2, grounded: true, ..frame(0.02) },
        ];

        let mut buf = Vec::new();
        write_telemetry(&mut buf, &frames).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,mode,"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.0000,trajectory,"));
        assert!(lines[2].starts_with("0.0200,manual,"));
        assert!(lines[2].contains(",-35.000,"));
        assert!(lines[2].ends_with(",1"));

        let columns = lines[0].split(',').count();
        assert!(lines.iter().all(|l| l.split(',').count() == columns));
    }
}
