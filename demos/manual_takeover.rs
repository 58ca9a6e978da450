use drone_sim::input::{InputMode, ManualInput};
use drone_sim::sim::{detect_events, simulate_with, spawn_body, EventDetector, ScriptedManual, TakeoverDetector};
use drone_sim::trajectory::{TargetSample, TargetTrajectory};
use drone_sim::{SimConfig, VehicleController};

fn main() {
    let mut config = SimConfig::default();
    config.sim.max_time = 15.0;

    let trajectory = TargetTrajectory::from_samples(vec![
        TargetSample { time: 0.0, pitch: 0.0, roll: 1.0 },
        TargetSample { time: 15.0, pitch: 0.0, roll: 1.0 },
    ]);

    // fly the trajectory for 5 s, grab the stick, then roll left and hold
    let roll_left = ManualInput { roll: 0.5, throttle: 1.0, ..Default::default() };
    let mut manual = ScriptedManual::takeover_at(5.0).then(8.0, roll_left);

    let mut vehicle = VehicleController::new(&config, Some(trajectory));
    let mut body = spawn_body(&config);
    let frames = simulate_with(&mut vehicle, &mut body, &mut manual, &config);

    let mut detectors: Vec<Box<dyn EventDetector>> = vec![Box::new(TakeoverDetector)];
    for event in detect_events(&frames, &mut detectors) {
        println!("{} at t={:.2} s (roll {:.1} deg)", event.kind, event.time, event.frame.roll);
    }

    let traj_ticks = frames.iter().filter(|f| f.mode == InputMode::TrajectoryDriven).count();
    println!("Trajectory-driven ticks: {}", traj_ticks);
    println!("Manual ticks: {}", frames.len() - traj_ticks);
    if let Some(last) = frames.last() {
        println!("Final bank: {:.1} deg, altitude {:.1} m", last.roll, last.altitude);
    }
}
