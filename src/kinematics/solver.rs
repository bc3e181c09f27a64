//! Movement controllers that steer the tool point toward a target.
//!
//! [`InverseKinematics`] needs no analytic Jacobian. Each tick it estimates,
//! per joint, how the tool-to-target distance changes when that joint turns
//! by a small probe angle, and then turns the joint against that gradient.
//! The step is cheap but noisy; near the target it oscillates inside the
//! movement threshold, which is what ends the motion.

use super::actuator::Manipulator;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Smallest accepted speed percentage.
pub const MIN_SPEED_PERCENT: f32 = 0.01;

/// Rate fraction matching [`MIN_SPEED_PERCENT`].
pub const MIN_SPEED_FRACTION: f32 = 0.0001;

/// Events raised by a movement controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionEvent {
    /// The tool is within the movement threshold of the target.
    TargetReached,
}

/// Steering of the arm toward a tool target.
pub trait MovementController {
    /// Replace the current target. The most recent call wins.
    fn set_target(&mut self, position: Vec3, speed_percent: f32);

    fn target(&self) -> Option<Vec3>;

    /// Advance one tick, rotating the arm's joints.
    fn update<A: Manipulator + ?Sized>(&mut self, arm: &mut A) -> Option<MotionEvent>;
}

/// Solver tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Distance below which the target counts as reached.
    pub movement_threshold: f32,
    /// Probe rotation used to estimate each joint's gradient, in actuator command units.
    pub probe_angle: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            movement_threshold: 0.1,
            probe_angle: 0.01,
        }
    }
}

/// Convert a speed percentage into a rate fraction in `(0, 1]`.
///
/// Percentages below [`MIN_SPEED_PERCENT`] (or NaN) are raised to it;
/// anything above 100 runs at the full rate.
///
/// ```rust
/// use cellsort::kinematics::speed_fraction;
///
/// assert_eq!(speed_fraction(50.0), 0.5);
/// assert_eq!(speed_fraction(250.0), 1.0);
/// assert_eq!(speed_fraction(-3.0), 0.0001);
/// ```
pub fn speed_fraction(speed_percent: f32) -> f32 {
    if speed_percent.is_nan() || speed_percent < MIN_SPEED_PERCENT {
        MIN_SPEED_FRACTION
    } else if speed_percent > 100.0 {
        1.0
    } else {
        (speed_percent / 100.0).max(MIN_SPEED_FRACTION)
    }
}

/// Gradient-descent inverse kinematics.
#[derive(Clone, Debug)]
pub struct InverseKinematics {
    config: SolverConfig,
    target: Option<Vec3>,
    speed_fraction: f32,
}

impl Default for InverseKinematics {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl InverseKinematics {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            target: None,
            speed_fraction: 1.0,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn movement_threshold(&self) -> f32 {
        self.config.movement_threshold
    }

    pub fn set_movement_threshold(&mut self, threshold: f32) {
        self.config.movement_threshold = threshold;
    }

    /// Rate fraction applied to the descent step.
    pub fn speed_fraction(&self) -> f32 {
        self.speed_fraction
    }

    /// Marginal change of the target distance per unit rotation of joint `index`.
    ///
    /// The joint is probed at its full rate and turned back afterwards.
    fn gradient<A: Manipulator + ?Sized>(&self, arm: &mut A, index: usize, target: Vec3) -> f32 {
        let probe = self.config.probe_angle;
        let before = arm.tool_position().distance(target);
        let Some(joint) = arm.joint_mut(index) else {
            return 0.0;
        };
        joint.rotate(probe, 1.0);
        let after = arm.tool_position().distance(target);
        if let Some(joint) = arm.joint_mut(index) {
            joint.rotate(-probe, 1.0);
        }
        (after - before) / probe
    }
}

impl MovementController for InverseKinematics {
    fn set_target(&mut self, position: Vec3, speed_percent: f32) {
        self.speed_fraction = speed_fraction(speed_percent);
        self.target = Some(position);
    }

    fn target(&self) -> Option<Vec3> {
        self.target
    }

    fn update<A: Manipulator + ?Sized>(&mut self, arm: &mut A) -> Option<MotionEvent> {
        let target = self.target?;

        if arm.tool_position().distance(target) < self.config.movement_threshold {
            return Some(MotionEvent::TargetReached);
        }

        for index in 0..arm.joint_count() {
            let gradient = self.gradient(arm, index, target);
            if let Some(joint) = arm.joint_mut(index) {
                joint.rotate(-gradient, self.speed_fraction);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::{Actuator, Axis, SerialChain};

    /// Linear slide: the "angle" is a displacement along one axis.
    struct Slide {
        value: f32,
        max_rate: f32,
        commands: usize,
    }

    impl Actuator for Slide {
        fn angle(&self) -> Vec3 {
            Vec3::new(self.value, 0.0, 0.0)
        }

        fn max_rate(&self) -> f32 {
            self.max_rate
        }

        fn rotate(&mut self, delta: f32, rate_fraction: f32) {
            self.commands += 1;
            self.value += delta * self.max_rate * rate_fraction.clamp(0.0, 1.0);
        }
    }

    struct Gantry {
        axes: [Slide; 3],
    }

    impl Gantry {
        fn at(position: Vec3) -> Self {
            let slide = |value| Slide {
                value,
                max_rate: 0.1,
                commands: 0,
            };
            Self {
                axes: [slide(position.x), slide(position.y), slide(position.z)],
            }
        }

        fn commands(&self) -> usize {
            self.axes.iter().map(|s| s.commands).sum()
        }
    }

    impl Manipulator for Gantry {
        fn joint_count(&self) -> usize {
            3
        }

        fn joint_mut(&mut self, index: usize) -> Option<&mut dyn Actuator> {
            self.axes.get_mut(index).map(|s| s as &mut dyn Actuator)
        }

        fn tool_position(&self) -> Vec3 {
            Vec3::new(self.axes[0].value, self.axes[1].value, self.axes[2].value)
        }
    }

    fn run<A: Manipulator>(solver: &mut InverseKinematics, arm: &mut A, max_ticks: usize) -> Option<usize> {
        (0..max_ticks).find(|_| solver.update(arm) == Some(MotionEvent::TargetReached))
    }

    #[test]
    fn no_target_means_no_motion() {
        let mut solver = InverseKinematics::default();
        let mut gantry = Gantry::at(Vec3::ONE);

        assert_eq!(solver.update(&mut gantry), None);
        assert_eq!(gantry.commands(), 0);
    }

    #[test]
    fn target_within_threshold_reports_without_rotating() {
        let mut solver = InverseKinematics::default();
        let mut gantry = Gantry::at(Vec3::new(1.0, 2.0, 3.0));
        solver.set_target(Vec3::new(1.05, 2.0, 3.0), 100.0);

        assert_eq!(solver.update(&mut gantry), Some(MotionEvent::TargetReached));
        assert_eq!(gantry.commands(), 0);
    }

    #[test]
    fn each_tick_probes_and_steps_every_joint() {
        let mut solver = InverseKinematics::default();
        let mut gantry = Gantry::at(Vec3::ZERO);
        solver.set_target(Vec3::new(5.0, 0.0, 0.0), 100.0);

        assert_eq!(solver.update(&mut gantry), None);
        // probe, probe back and the real step for each of the three joints
        assert_eq!(gantry.commands(), 9);
        assert!(gantry.tool_position().x > 0.0);
    }

    #[test]
    fn gantry_converges_on_target() {
        let mut solver = InverseKinematics::default();
        let mut gantry = Gantry::at(Vec3::new(0.0, 3.0, 0.0));
        let target = Vec3::new(-2.5, 6.0, 0.0);
        solver.set_target(target, 100.0);

        assert!(run(&mut solver, &mut gantry, 20_000).is_some());
        assert!(gantry.tool_position().distance(target) < solver.movement_threshold());
    }

    #[test]
    fn planar_chain_converges_on_reachable_point() {
        let mut chain = SerialChain::new(Vec3::ZERO)
            .with_joint(Axis::Z, 1.0, 30.0, Vec3::new(4.0, 0.0, 0.0))
            .with_joint(Axis::Z, 1.0, 30.0, Vec3::new(4.0, 0.0, 0.0));
        let target = SerialChain::new(Vec3::ZERO)
            .with_joint(Axis::Z, 1.0, 40.0, Vec3::new(4.0, 0.0, 0.0))
            .with_joint(Axis::Z, 1.0, 50.0, Vec3::new(4.0, 0.0, 0.0))
            .tool_position();

        let mut solver = InverseKinematics::default();
        solver.set_target(target, 100.0);

        assert!(run(&mut solver, &mut chain, 50_000).is_some());
    }

    #[test]
    fn slower_speed_takes_longer() {
        let target = Vec3::new(2.0, 0.0, 0.0);

        let mut fast = InverseKinematics::default();
        fast.set_target(target, 100.0);
        let fast_ticks = run(&mut fast, &mut Gantry::at(Vec3::ZERO), 100_000).unwrap();

        let mut slow = InverseKinematics::default();
        slow.set_target(target, 25.0);
        let slow_ticks = run(&mut slow, &mut Gantry::at(Vec3::ZERO), 100_000).unwrap();

        assert!(slow_ticks > fast_ticks);
    }

    #[test]
    fn latest_target_wins() {
        let mut solver = InverseKinematics::default();
        solver.set_target(Vec3::X, 10.0);
        solver.set_target(Vec3::Y, 80.0);

        assert_eq!(solver.target(), Some(Vec3::Y));
        assert_eq!(solver.speed_fraction(), 0.8);
    }

    #[test]
    fn speed_percent_boundaries() {
        assert_eq!(speed_fraction(0.0), 0.0001);
        assert_eq!(speed_fraction(-50.0), 0.0001);
        assert_eq!(speed_fraction(f32::NAN), 0.0001);
        assert_eq!(speed_fraction(100.0), 1.0);
        assert_eq!(speed_fraction(100.5), 1.0);
        assert_eq!(speed_fraction(20.0), 0.2);
    }

    #[test]
    fn tiny_positive_speed_is_raised_to_minimum() {
        assert_eq!(speed_fraction(0.005), MIN_SPEED_FRACTION);
        assert_eq!(speed_fraction(1.0e-45), MIN_SPEED_FRACTION);
    }

    #[test]
    fn tiny_speed_still_moves_the_arm() {
        let mut solver = InverseKinematics::default();
        let mut gantry = Gantry::at(Vec3::ZERO);
        solver.set_target(Vec3::new(5.0, 0.0, 0.0), 1.0e-30);

        solver.update(&mut gantry);
        assert!(gantry.tool_position().x > 0.0);
    }

    #[test]
    fn movement_threshold_is_configurable() {
        let mut solver = InverseKinematics::default();
        let mut gantry = Gantry::at(Vec3::ZERO);
        solver.set_target(Vec3::new(0.5, 0.0, 0.0), 100.0);
        assert_eq!(solver.update(&mut gantry), None);

        solver.set_movement_threshold(1.0);
        assert_eq!(solver.update(&mut gantry), Some(MotionEvent::TargetReached));
    }
}
