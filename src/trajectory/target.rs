use std::cell::Cell;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::loader::parse_targets;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Target samples
// ---------------------------------------------------------------------------

/// One row of the reference trajectory. Pitch and roll are normalized
/// targets as recorded in the file (the attitude controller scales them).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetSample {
    pub time: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl TargetSample {
    /// Zero target returned whenever no trajectory data is available.
    pub fn sentinel(time: f64) -> Self {
        Self { time, pitch: 0.0, roll: 0.0 }
    }
}

/// Linear interpolation over a time-sorted, non-empty slice.
///
/// Queries outside the recorded range return the first/last sample
/// unmodified, as does a NaN query. A zero-width bracket returns the
/// earlier sample.
pub fn interpolate(samples: &[TargetSample], t: f64) -> Option<TargetSample> {
    let first = samples.first()?;
    let last = samples.last()?;
    if t.is_nan() || t <= first.time {
        return Some(*first);
    }
    if t >= last.time {
        return Some(*last);
    }

    let idx = samples.partition_point(|s| s.time < t);
    let prev = samples[idx - 1];
    let next = samples[idx];
    let span = next.time - prev.time;
    if span <= 0.0 {
        return Some(prev);
    }

    let u = ((t - prev.time) / span).clamp(0.0, 1.0);
    Some(TargetSample {
        time: t,
        pitch: prev.pitch + (next.pitch - prev.pitch) * u,
        roll: prev.roll + (next.roll - prev.roll) * u,
    })
}

/// Zero-order hold: the latest sample recorded at or before `t` (the first
/// sample before the range starts).
pub fn hold(samples: &[TargetSample], t: f64) -> Option<TargetSample> {
    let first = samples.first()?;
    let idx = samples.partition_point(|s| s.time <= t);
    Some(if idx == 0 { *first } else { samples[idx - 1] })
}

// ---------------------------------------------------------------------------
// Trajectory owner
// ---------------------------------------------------------------------------

/// Owns the reference trajectory and hands out immutable snapshots.
///
/// The sample list lives behind an `Arc<[TargetSample]>` that is replaced
/// wholesale on (re)load, so a reader holding a snapshot never observes a
/// partially-built list.
#[derive(Debug, Default)]
pub struct TargetTrajectory {
    samples: Option<Arc<[TargetSample]>>,
    source: Option<PathBuf>,
    warned_not_ready: Cell<bool>,
}

impl TargetTrajectory {
    /// A trajectory with no data; every query returns the sentinel.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_samples(samples: Vec<TargetSample>) -> Self {
        let mut trajectory = Self::empty();
        trajectory.publish(samples);
        trajectory
    }

    /// Load from `path`, logging (not returning) a failure. The path is
    /// remembered either way so a later `reload` can retry.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let mut trajectory = Self::empty();
        if let Err(err) = trajectory.load(path) {
            log::error!("{err}");
        }
        trajectory
    }

    /// Read and publish samples from a file. On failure the previously
    /// published samples (if any) are kept.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let path = path.as_ref().to_path_buf();
        log::info!("loading trajectory targets from {}", path.display());
        self.source = Some(path.clone());

        let file = File::open(&path).map_err(|source| LoadError::Io { path: path.clone(), source })?;
        self.load_from_reader(BufReader::new(file), &path)
    }

    pub fn load_from_reader<R: BufRead>(&mut self, reader: R, origin: &Path) -> Result<usize, LoadError> {
        let samples = parse_targets(reader)
            .map_err(|source| LoadError::Io { path: origin.to_path_buf(), source })?;
        if samples.is_empty() {
            return Err(LoadError::Empty { path: origin.to_path_buf() });
        }
        let count = samples.len();
        self.publish(samples);
        log::info!("loaded {count} trajectory samples from {}", origin.display());
        Ok(count)
    }

    /// Re-read the remembered source. Only an explicit reload retries a
    /// failed load.
    pub fn reload(&mut self) -> Result<usize, LoadError> {
        let path = self.source.clone().ok_or(LoadError::NoSource)?;
        self.load(path)
    }

    fn publish(&mut self, mut samples: Vec<TargetSample>) {
        // stable: equal times keep file order
        samples.sort_by(|a, b| a.time.total_cmp(&b.time));
        self.samples = if samples.is_empty() { None } else { Some(samples.into()) };
        self.warned_not_ready.set(false);
    }

    pub fn is_ready(&self) -> bool {
        self.samples.is_some()
    }

    pub fn len(&self) -> usize {
        self.samples.as_ref().map_or(0, |s| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Current sample list; stays valid across a later reload.
    pub fn snapshot(&self) -> Option<Arc<[TargetSample]>> {
        self.samples.clone()
    }

    /// Time span covered by the samples.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        let samples = self.samples.as_ref()?;
        Some((samples.first()?.time, samples.last()?.time))
    }

    /// Interpolated target, or `None` when not ready.
    pub fn query(&self, t: f64) -> Option<TargetSample> {
        interpolate(self.samples.as_deref()?, t)
    }

    /// Un-interpolated target at `t` (zero-order hold), or `None` when not ready.
    pub fn query_raw(&self, t: f64) -> Option<TargetSample> {
        hold(self.samples.as_deref()?, t)
    }

    /// Interpolated target, degrading to the sentinel when not ready.
    pub fn sample(&self, t: f64) -> TargetSample {
        self.query(t).unwrap_or_else(|| {
            self.warn_not_ready();
            TargetSample::sentinel(t)
        })
    }

    fn warn_not_ready(&self) {
        if !self.warned_not_ready.replace(true) {
            log::warn!("trajectory not ready, using zero targets");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::Write;

    fn scenario() -> TargetTrajectory {
        TargetTrajectory::from_samples(vec![
            TargetSample { time: 0.0, pitch: 0.0, roll: 0.0 },
            TargetSample { time: 10.0, pitch: 0.5, roll: -1.0 },
            TargetSample { time: 20.0, pitch: 0.0, roll: 1.0 },
        ])
    }

    #[test]
    fn interpolates_between_samples() {
        let s = scenario().sample(5.0);
        assert_abs_diff_eq!(s.time, 5.0);
        assert_abs_diff_eq!(s.pitch, 0.25);
        assert_abs_diff_eq!(s.roll, -0.5);
    }

    #[test]
    fn holds_boundaries_without_extrapolating() {
        let traj = scenario();
        assert_eq!(traj.sample(25.0), TargetSample { time: 20.0, pitch: 0.0, roll: 1.0 });
        assert_eq!(traj.sample(-3.0), TargetSample { time: 0.0, pitch: 0.0, roll: 0.0 });
    }

    #[test]
    fn continuous_at_sample_boundaries() {
        let traj = scenario();
        let at = traj.sample(10.0);
        let before = traj.sample(10.0 - 1e-9);
        let after = traj.sample(10.0 + 1e-9);
        assert_abs_diff_eq!(at.pitch, 0.5);
        assert_abs_diff_eq!(before.pitch, at.pitch, epsilon = 1e-6);
        assert_abs_diff_eq!(after.pitch, at.pitch, epsilon = 1e-6);
        assert_abs_diff_eq!(before.roll, at.roll, epsilon = 1e-6);
    }

    #[test]
    fn samples_lie_on_bracketing_segment() {
        let traj = scenario();
        for i in 1..20 {
            let t = 10.0 + i as f64 * 0.5;
            let s = traj.sample(t);
            let u = (t - 10.0) / 10.0;
            assert_abs_diff_eq!(s.pitch, 0.5 * (1.0 - u), epsilon = 1e-12);
            assert_abs_diff_eq!(s.roll, -1.0 + 2.0 * u, epsilon = 1e-12);
        }
    }

    #[test]
    fn duplicate_times_interpolate_from_later_duplicate() {
        let samples = [
            TargetSample { time: 0.0, pitch: 0.0, roll: 0.0 },
            TargetSample { time: 1.0, pitch: 1.0, roll: 1.0 },
            TargetSample { time: 1.0, pitch: 2.0, roll: 2.0 },
            TargetSample { time: 2.0, pitch: 3.0, roll: 3.0 },
        ];
        let s = interpolate(&samples, 1.5).unwrap();
        assert_abs_diff_eq!(s.pitch, 2.5);
        let s = interpolate(&samples, 0.5).unwrap();
        assert_abs_diff_eq!(s.pitch, 0.5);
    }

    #[test]
    fn nan_time_falls_back_to_first_sample() {
        let traj = scenario();
        assert_eq!(traj.sample(f64::NAN), TargetSample { time: 0.0, pitch: 0.0, roll: 0.0 });
        assert_eq!(traj.query_raw(f64::NAN).unwrap().time, 0.0);
    }

    #[test]
    fn sorts_out_of_order_rows_stably() {
        let traj = TargetTrajectory::from_samples(vec![
            TargetSample { time: 2.0, pitch: 2.0, roll: 0.0 },
            TargetSample { time: 1.0, pitch: 1.0, roll: 0.0 },
            TargetSample { time: 1.0, pitch: 9.0, roll: 0.0 },
        ]);
        let snap = traj.snapshot().unwrap();
        let pitches: Vec<f64> = snap.iter().map(|s| s.pitch).collect();
        assert_eq!(pitches, vec![1.0, 9.0, 2.0]);
    }

    #[test]
    fn raw_query_holds_previous_sample() {
        let traj = scenario();
        assert_eq!(traj.query_raw(5.0).unwrap().roll, 0.0);
        assert_eq!(traj.query_raw(10.0).unwrap().roll, -1.0);
        assert_eq!(traj.query_raw(15.0).unwrap().roll, -1.0);
        assert_eq!(traj.query_raw(-1.0).unwrap().roll, 0.0);
        assert_eq!(traj.query_raw(99.0).unwrap().roll, 1.0);
    }

    #[test]
    fn not_ready_returns_sentinel() {
        let traj = TargetTrajectory::empty();
        assert!(!traj.is_ready());
        assert!(traj.query(3.0).is_none());
        assert_eq!(traj.sample(3.0), TargetSample::sentinel(3.0));
    }

    #[test]
    fn missing_file_is_recoverable() {
        let mut traj = TargetTrajectory::empty();
        let err = traj.load("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(!traj.is_ready());
        assert_eq!(traj.sample(1.0), TargetSample::sentinel(1.0));
    }

    #[test]
    fn header_only_file_is_empty_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "time,pitch,roll").unwrap();
        let mut traj = TargetTrajectory::empty();
        assert!(matches!(traj.load(file.path()), Err(LoadError::Empty { .. })));
        assert!(!traj.is_ready());
    }

    #[test]
    fn reload_swaps_and_keeps_old_snapshot_intact() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "time,pitch,roll\n0,0,0\n10,1,1").unwrap();
        let mut traj = TargetTrajectory::open(file.path());
        assert_eq!(traj.len(), 2);
        let old = traj.snapshot().unwrap();

        std::fs::write(file.path(), "time,pitch,roll\n0,0,0\n5,0.2,0\n10,0.4,0\n").unwrap();
        assert_eq!(traj.reload().unwrap(), 3);
        assert_eq!(old.len(), 2);
        assert_abs_diff_eq!(traj.sample(10.0).pitch, 0.4);
    }

    #[test]
    fn failed_reload_keeps_previous_data() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "time,pitch,roll\n0,0.3,0").unwrap();
        let mut traj = TargetTrajectory::open(file.path());
        std::fs::write(file.path(), "time,pitch,roll\n").unwrap();
        assert!(traj.reload().is_err());
        assert!(traj.is_ready());
        assert_abs_diff_eq!(traj.sample(0.0).pitch, 0.3);
    }

    #[test]
    fn reload_without_source_is_an_error() {
        let mut traj = scenario();
        assert!(matches!(traj.reload(), Err(LoadError::NoSource)));
    }
}
