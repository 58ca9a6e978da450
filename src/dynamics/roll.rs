use nalgebra::UnitQuaternion;

use crate::input::{ControlInput, InputMode};

// ---------------------------------------------------------------------------
// Bank-angle steering
// ---------------------------------------------------------------------------

/// Raw trajectory roll values within this distance of -1 or +1 count as a
/// bank command; everything else is wings level.
pub const BANK_BIN_TOLERANCE: f64 = 1e-6;

/// Which roll law runs this tick, carrying the signal it needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RollMode {
    /// Operator roll axis in [-1, 1], scaled to a bank angle.
    Manual { input: f64 },
    /// Raw (un-interpolated) trajectory roll target, read as a {-1, 0, +1} bin.
    TrajectoryDriven { raw_target: f64 },
}

impl RollMode {
    pub fn select(mode: InputMode, input: &ControlInput) -> Self {
        match mode {
            InputMode::Manual => RollMode::Manual { input: input.roll },
            InputMode::TrajectoryDriven => RollMode::TrajectoryDriven { raw_target: input.raw_target_roll },
        }
    }
}

/// Bank limits for the two roll laws, degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BankLimits {
    pub manual_max_bank: f64,
    pub trajectory_bank: f64,
}

/// Target bank angle in degrees (positive = right wing down).
pub fn bank_target(mode: RollMode, limits: &BankLimits) -> f64 {
    match mode {
        RollMode::Manual { input } => input.clamp(-1.0, 1.0) * limits.manual_max_bank,
        RollMode::TrajectoryDriven { raw_target } => {
            if (raw_target - 1.0).abs() <= BANK_BIN_TOLERANCE {
                limits.trajectory_bank
            } else if (raw_target + 1.0).abs() <= BANK_BIN_TOLERANCE {
                -limits.trajectory_bank
            } else {
                0.0
            }
        }
    }
}

/// Orientation with the given bank, keeping the current pitch and yaw.
pub fn banked_orientation(current: &UnitQuaternion<f64>, bank_deg: f64) -> UnitQuaternion<f64> {
    let (_, pitch, yaw) = current.euler_angles();
    UnitQuaternion::from_euler_angles(bank_deg.to_radians(), pitch, yaw)
}

/// Rotate `from` toward `to` by at most `max_step_deg`.
pub fn rotate_towards(
    from: &UnitQuaternion<f64>,
    to: &UnitQuaternion<f64>,
    max_step_deg: f64,
) -> UnitQuaternion<f64> {
    let angle = from.angle_to(to);
    let max_step = max_step_deg.max(0.0).to_radians();
    if angle <= max_step || angle < 1e-12 {
        return *to;
    }
    from.try_slerp(to, max_step / angle, 1e-9).unwrap_or(*to)
}

/// One roll-steering step: the orientation the body should take this tick.
pub fn steer_roll(
    current: &UnitQuaternion<f64>,
    mode: RollMode,
    limits: &BankLimits,
    rate_deg_s: f64,
    dt: f64,
) -> UnitQuaternion<f64> {
    let target = banked_orientation(current, bank_target(mode, limits));
    let next = rotate_towards(current, &target, rate_deg_s * dt);
    log::trace!("roll {mode:?}: step {:.3} deg", current.angle_to(&next).to_degrees());
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::state::Attitude;
    use approx::assert_abs_diff_eq;

    const LIMITS: BankLimits = BankLimits { manual_max_bank: 45.0, trajectory_bank: 35.0 };

    fn traj(raw_target: f64) -> RollMode {
        RollMode::TrajectoryDriven { raw_target }
    }

    #[test]
    fn trajectory_bins_are_categorical() {
        assert_eq!(bank_target(traj(-1.0), &LIMITS), -35.0);
        assert_eq!(bank_target(traj(1.0), &LIMITS), 35.0);
        assert_eq!(bank_target(traj(0.0), &LIMITS), 0.0);
        assert_eq!(bank_target(traj(0.3), &LIMITS), 0.0);
        assert_eq!(bank_target(traj(-0.99), &LIMITS), 0.0);
        assert_eq!(bank_target(traj(2.0), &LIMITS), 0.0);
    }

    #[test]
    fn manual_bank_is_proportional() {
        assert_eq!(bank_target(RollMode::Manual { input: 1.0 }, &LIMITS), 45.0);
        assert_eq!(bank_target(RollMode::Manual { input: -0.5 }, &LIMITS), -22.5);
        assert_eq!(bank_target(RollMode::Manual { input: 3.0 }, &LIMITS), 45.0);
    }

    #[test]
    fn mode_selection_follows_input_mode() {
        let input = ControlInput { roll: 0.4, raw_target_roll: -1.0, ..Default::default() };
        assert_eq!(RollMode::select(InputMode::Manual, &input), RollMode::Manual { input: 0.4 });
        assert_eq!(
            RollMode::select(InputMode::TrajectoryDriven, &input),
            RollMode::TrajectoryDriven { raw_target: -1.0 }
        );
    }

    #[test]
    fn banked_orientation_keeps_pitch_and_yaw() {
        let q = Attitude { roll: 5.0, pitch: 10.0, yaw: 40.0 }.to_orientation();
        let att = Attitude::from_orientation(&banked_orientation(&q, -35.0));
        assert_abs_diff_eq!(att.roll, -35.0, epsilon = 1e-9);
        assert_abs_diff_eq!(att.pitch, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(att.yaw, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn rotate_towards_is_rate_bounded() {
        let from = UnitQuaternion::identity();
        let to = Attitude { roll: 35.0, pitch: 0.0, yaw: 0.0 }.to_orientation();
        let step = rotate_towards(&from, &to, 5.0);
        assert_abs_diff_eq!(from.angle_to(&step).to_degrees(), 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(Attitude::from_orientation(&step).roll, 5.0, epsilon = 1e-9);

        let snap = rotate_towards(&from, &to, 90.0);
        assert_abs_diff_eq!(snap.angle_to(&to), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn steering_converges_on_bin_target() {
        let mut q = UnitQuaternion::identity();
        for _ in 0..50 {
            q = steer_roll(&q, traj(-1.0), &LIMITS, 100.0, 0.02);
        }
        assert_abs_diff_eq!(Attitude::from_orientation(&q).roll, -35.0, epsilon = 1e-9);
    }
}
