use std::path::PathBuf;

use drone_sim::io::{write_summary_file, write_telemetry_file, FlightSummary};
use drone_sim::sim::{
    detect_events, simulate_with, spawn_body, EventDetector, IdleManual, LiftoffDetector, ManualSource,
    ScriptedManual, TakeoverDetector, TelemetryFrame, TouchdownDetector, TrajectoryEndDetector,
};
use drone_sim::trajectory::TargetTrajectory;
use drone_sim::{SimConfig, SimError, VehicleController};

const USAGE: &str =
    "usage: drone-sim [CONFIG.yaml] [--targets PATH] [--telemetry OUT.csv] [--summary OUT.json] [--takeover SECONDS]";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    targets: Option<PathBuf>,
    telemetry: Option<PathBuf>,
    summary: Option<PathBuf>,
    takeover: Option<f64>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, SimError> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| args.next().ok_or_else(|| SimError::Usage(format!("{flag} needs a value")));
        match arg.as_str() {
            "--targets" => parsed.targets = Some(value("--targets")?.into()),
            "--telemetry" => parsed.telemetry = Some(value("--telemetry")?.into()),
            "--summary" => parsed.summary = Some(value("--summary")?.into()),
            "--takeover" => {
                let raw = value("--takeover")?;
                let t = raw.parse().map_err(|_| SimError::Usage(format!("bad takeover time '{raw}'")))?;
                parsed.takeover = Some(t);
            }
            "-h" | "--help" => return Err(SimError::Usage(USAGE.into())),
            flag if flag.starts_with("--") => return Err(SimError::Usage(format!("unknown flag {flag}\n{USAGE}"))),
            _ if parsed.config.is_none() => parsed.config = Some(PathBuf::from(&arg)),
            _ => return Err(SimError::Usage(format!("unexpected argument '{arg}'\n{USAGE}"))),
        }
    }
    Ok(parsed)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), SimError> {
    let args = parse_args(std::env::args().skip(1))?;

    // -----------------------------------------------------------------------
    // Configuration and trajectory
    // -----------------------------------------------------------------------
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(path) = args.targets {
        config.trajectory.path = Some(path);
    }

    let trajectory = config.trajectory.path.as_ref().map(TargetTrajectory::open);
    let end_time = trajectory.as_ref().and_then(|t| t.time_range()).map(|(_, end)| end);

    // -----------------------------------------------------------------------
    // Run simulation
    // -----------------------------------------------------------------------
    let mut vehicle = VehicleController::new(&config, trajectory);
    let mut body = spawn_body(&config);
    let mut manual: Box<dyn ManualSource> = match args.takeover {
        Some(t) => Box::new(ScriptedManual::takeover_at(t)),
        None => Box::new(IdleManual),
    };
    let frames = simulate_with(&mut vehicle, &mut body, manual.as_mut(), &config);

    // -----------------------------------------------------------------------
    // Analyze run
    // -----------------------------------------------------------------------
    let mut detectors: Vec<Box<dyn EventDetector>> = vec![
        Box::new(TakeoverDetector),
        Box::new(LiftoffDetector::new(1.0)),
        Box::new(TouchdownDetector),
    ];
    if let Some(end) = end_time {
        detectors.push(Box::new(TrajectoryEndDetector::new(end)));
    }
    let events = detect_events(&frames, &mut detectors);
    let summary = FlightSummary::from_telemetry(&frames).with_events(&events);

    print_report(&config, &vehicle, &frames, &summary);

    if let Some(path) = &args.telemetry {
        write_telemetry_file(path, &frames)?;
        log::info!("wrote {} telemetry rows to {}", frames.len(), path.display());
    }
    if let Some(path) = &args.summary {
        write_summary_file(path, &summary)?;
        log::info!("wrote flight summary to {}", path.display());
    }
    Ok(())
}

fn print_report(config: &SimConfig, vehicle: &VehicleController, frames: &[TelemetryFrame], summary: &FlightSummary) {
    let airframe = vehicle.airframe();
    println!();
    println!("====================================================================");
    println!("  DRONE FLIGHT SIMULATION - {}", airframe.name);
    println!("====================================================================");
    println!();
    println!("  Airframe");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Weight:        {:>8.1} lb    Mass:         {:>8.1} kg",
        airframe.weight_lb,
        airframe.mass_kg()
    );
    println!(
        "  Engines:       {:>8}       Max thrust:   {:>8.0} N",
        airframe.engines.len(),
        airframe.max_thrust()
    );
    println!(
        "  Surfaces:      {:>8}       Wheels:       {:>8}",
        airframe.control_surfaces.len(),
        airframe.wheels.len()
    );
    println!(
        "  Control law:   {:>8}       Multiplier:   {:>8.1} deg",
        vehicle.attitude_controller().law_name(),
        config.trajectory.angle_multiplier
    );
    println!();

    println!("  Flight Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    if summary.events.is_empty() {
        println!("  (none)");
    }
    for event in &summary.events {
        println!("  {:<18} t={:>6.2}s", event.event, event.time);
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Duration:      {:>8.1} s", summary.duration_s);
    println!("  Max speed:     {:>8.1} mph", summary.max_speed_mph);
    println!("  Max altitude:  {:>8.1} m", summary.max_altitude_m);
    println!("  Max bank:      {:>8.1} deg", summary.max_bank_deg);
    println!(
        "  RMS error:     {:>8.2} deg pitch, {:.2} deg roll",
        summary.pitch_rms_error_deg, summary.roll_rms_error_deg
    );
    match summary.takeover_time_s {
        Some(t) => println!("  Takeover:      {:>8.2} s", t),
        None => println!("  Takeover:      {:>8}", "never"),
    }
    println!();

    // -----------------------------------------------------------------------
    // Attitude table (sampled)
    // -----------------------------------------------------------------------
    println!("  Attitude");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>8}  {:>8}  {:>8}  {:>8}  {:>7}  {:>6}",
        "t (s)", "tgt ptch", "pitch", "tgt roll", "roll", "alt (m)", "mode"
    );
    println!("  {}", "─".repeat(64));

    let sample_interval = (frames.len() / 30).max(1);
    for (i, f) in frames.iter().enumerate() {
        if i % sample_interval != 0 && i != frames.len() - 1 {
            continue;
        }
        let mode = if f.mode == drone_sim::input::InputMode::Manual { "MAN" } else { "TRAJ" };
        println!(
            "  {:>7.2}  {:>8.2}  {:>8.2}  {:>8.2}  {:>8.2}  {:>7.1}  {:>6}",
            f.time, f.target_pitch, f.pitch, f.target_roll, f.roll, f.altitude, mode
        );
    }

    println!();
    println!("  Simulation: {} ticks, dt={} s", frames.len(), config.sim.dt);
    println!("====================================================================");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, SimError> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_positional_config_and_flags() {
        let a = args(&["run.yaml", "--takeover", "4.5", "--summary", "out.json"]).unwrap();
        assert_eq!(a.config, Some(PathBuf::from("run.yaml")));
        assert_eq!(a.takeover, Some(4.5));
        assert_eq!(a.summary, Some(PathBuf::from("out.json")));
        assert!(a.telemetry.is_none());
    }

    #[test]
    fn rejects_missing_value_and_unknown_flag() {
        assert!(matches!(args(&["--telemetry"]), Err(SimError::Usage(_))));
        assert!(matches!(args(&["--bogus"]), Err(SimError::Usage(_))));
        assert!(matches!(args(&["--takeover", "soon"]), Err(SimError::Usage(_))));
    }
}
