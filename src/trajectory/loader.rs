use std::io::{self, BufRead};

use super::target::TargetSample;

// ---------------------------------------------------------------------------
// Target CSV parsing: `time,targetPitch,targetRoll[,...]`
// ---------------------------------------------------------------------------

/// Parse target rows from a reader.
///
/// The first line is a header and is skipped. Blank lines are ignored. Rows
/// with fewer than three fields, or whose first three fields are not finite
/// numbers, are dropped with a warning. Extra trailing columns are ignored.
/// Rows come back in file order; sorting is the caller's job.
pub fn parse_targets<R: BufRead>(reader: R) -> io::Result<Vec<TargetSample>> {
    let mut samples = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        if idx == 0 || line.trim().is_empty() {
            continue;
        }

        match parse_row(&line) {
            Some(sample) => samples.push(sample),
            None => log::warn!("skipping target row {line_no}: {line:?}"),
        }
    }

    Ok(samples)
}

fn parse_row(line: &str) -> Option<TargetSample> {
    let mut fields = line.split(',').map(str::trim);
    let time = parse_field(fields.next()?)?;
    let pitch = parse_field(fields.next()?)?;
    let roll = parse_field(fields.next()?)?;
    Some(TargetSample { time, pitch, roll })
}

fn parse_field(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_header_and_reads_rows() {
        let csv = "time,pitch,roll\n0,0,0\n10,0.5,-1\n";
        let rows = parse_targets(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], TargetSample { time: 10.0, pitch: 0.5, roll: -1.0 });
    }

    #[test]
    fn drops_short_and_non_numeric_rows() {
        let csv = "time,pitch,roll\n0,0\n1,abc,0\n2, 0.1 , 0.2 \n3,NaN,0\n";
        let rows = parse_targets(csv.as_bytes()).unwrap();
        assert_eq!(rows, vec![TargetSample { time: 2.0, pitch: 0.1, roll: 0.2 }]);
    }

    #[test]
    fn ignores_trailing_columns_and_blank_lines() {
        let csv = "t,p,r,yaw,thrust\n\n5,1,1,9,9\n\n";
        let rows = parse_targets(csv.as_bytes()).unwrap();
        assert_eq!(rows, vec![TargetSample { time: 5.0, pitch: 1.0, roll: 1.0 }]);
    }

    #[test]
    fn header_only_yields_nothing() {
        assert!(parse_targets("time,pitch,roll".as_bytes()).unwrap().is_empty());
    }
}
