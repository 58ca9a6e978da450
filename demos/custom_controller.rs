use drone_sim::control::{AttitudeCommand, AttitudeSetpoint, Controller};
use drone_sim::dynamics::Attitude;
use drone_sim::sim::{simulate_with, spawn_body, IdleManual};
use drone_sim::trajectory::{TargetSample, TargetTrajectory};
use drone_sim::{SimConfig, VehicleController};

/// Bang-bang attitude law: full deflection toward the target outside a
/// deadband, nothing inside it.
struct BangBangController {
    deadband: f64, // deg
    authority: f64,
}

impl BangBangController {
    fn axis(&self, error: f64) -> f64 {
        if error > self.deadband {
            self.authority
        } else if error < -self.deadband {
            -self.authority
        } else {
            0.0
        }
    }
}

impl Controller for BangBangController {
    fn control(&mut self, setpoint: &AttitudeSetpoint, attitude: &Attitude, _dt: f64) -> AttitudeCommand {
        AttitudeCommand {
            pitch: self.axis(setpoint.pitch - attitude.pitch),
            roll: self.axis(setpoint.roll - attitude.roll),
        }
    }

    fn name(&self) -> &str {
        "BangBang"
    }
}

fn main() {
    let mut config = SimConfig::default();
    config.sim.max_time = 20.0;

    // gentle climb, then a left and a right bank
    let trajectory = TargetTrajectory::from_samples(vec![
        TargetSample { time: 0.0, pitch: 0.0, roll: 0.0 },
        TargetSample { time: 5.0, pitch: 0.3, roll: 0.0 },
        TargetSample { time: 10.0, pitch: 0.1, roll: -1.0 },
        TargetSample { time: 15.0, pitch: 0.1, roll: 1.0 },
        TargetSample { time: 20.0, pitch: 0.0, roll: 0.0 },
    ]);

    let law = BangBangController { deadband: 2.0, authority: 0.6 };
    let mut vehicle = VehicleController::new(&config, Some(trajectory)).with_law(Box::new(law));
    let mut body = spawn_body(&config);

    println!("Simulating with {} controller...", vehicle.attitude_controller().law_name());
    let frames = simulate_with(&mut vehicle, &mut body, &mut IdleManual, &config);

    let max_alt = frames.iter().map(|f| f.altitude).fold(0.0_f64, f64::max);
    let max_bank = frames.iter().map(|f| f.roll.abs()).fold(0.0_f64, f64::max);
    let pitch_rms = if frames.is_empty() {
        0.0
    } else {
        (frames.iter().map(|f| (f.target_pitch - f.pitch).powi(2)).sum::<f64>() / frames.len() as f64).sqrt()
    };

    println!("Max altitude: {:.1} m", max_alt);
    println!("Max bank: {:.1} deg", max_bank);
    println!("Pitch RMS error: {:.2} deg", pitch_rms);
    println!("Telemetry frames: {}", frames.len());
}
