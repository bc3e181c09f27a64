//! Simulated sorting cell: a four-joint arm with a fork tool picking wares
//! off the pickup conveyor and sorting them onto the brick and wood conveyors.
//!
//! Run with `cargo run --example sorting_cell`.

use cellsort::config::RobotConfig;
use cellsort::kinematics::{Actuator, Axis, Manipulator, RevoluteJoint, SerialChain};
use cellsort::robot::{PickAndPlace, RobotSignal, WareKind};
use cellsort::tool::{Tool, ToolPart, CLOSED_REFERENCE};
use glam::Vec3;
use tracing::{info, Level};

const DT: f32 = 1.0 / 60.0;
const TICKS: usize = 300_000;
/// Ticks between the robot going idle and the next ware showing up.
const SPAWN_DELAY: usize = 120;

struct SimulatedCell {
    arm: SerialChain,
    left: RevoluteJoint,
    right: RevoluteJoint,
    top: RevoluteJoint,
    alignment: RevoluteJoint,
}

impl SimulatedCell {
    fn new() -> Self {
        let arm = SerialChain::new(Vec3::ZERO)
            .with_joint(Axis::Y, 1.0, 0.0, Vec3::new(0.0, 1.0, 0.0))
            .with_joint(Axis::Z, 1.0, 60.0, Vec3::new(4.0, 0.0, 0.0))
            .with_joint(Axis::Z, 1.0, -90.0, Vec3::new(4.0, 0.0, 0.0))
            .with_joint(Axis::Z, 1.0, -30.0, Vec3::new(1.0, 0.0, 0.0));
        Self {
            arm,
            left: RevoluteJoint::new(Axis::X, 2.0).with_angle(CLOSED_REFERENCE),
            right: RevoluteJoint::new(Axis::X, 2.0).with_angle(CLOSED_REFERENCE),
            top: RevoluteJoint::new(Axis::Y, 2.0),
            alignment: RevoluteJoint::new(Axis::Z, 2.0).with_angle(180.0),
        }
    }
}

impl Manipulator for SimulatedCell {
    fn joint_count(&self) -> usize {
        self.arm.joint_count()
    }

    fn joint_mut(&mut self, index: usize) -> Option<&mut dyn Actuator> {
        self.arm.joint_mut(index)
    }

    fn tool_position(&self) -> Vec3 {
        self.arm.tool_position()
    }
}

impl Tool for SimulatedCell {
    fn orientation(&self) -> Vec3 {
        self.alignment.angle()
    }

    fn part(&self, part: ToolPart) -> &dyn Actuator {
        match part {
            ToolPart::ForkLeft => &self.left,
            ToolPart::ForkRight => &self.right,
            ToolPart::ForkTop => &self.top,
            ToolPart::Alignment => &self.alignment,
        }
    }

    fn part_mut(&mut self, part: ToolPart) -> &mut dyn Actuator {
        match part {
            ToolPart::ForkLeft => &mut self.left,
            ToolPart::ForkRight => &mut self.right,
            ToolPart::ForkTop => &mut self.top,
            ToolPart::Alignment => &mut self.alignment,
        }
    }
}

/// Hands out alternating ware kinds a fixed delay after each idle signal.
struct Spawner {
    countdown: Option<usize>,
    next: WareKind,
}

impl Spawner {
    fn notify_idle(&mut self) {
        self.countdown = Some(SPAWN_DELAY);
    }

    fn poll(&mut self) -> Option<WareKind> {
        let remaining = self.countdown?;
        if remaining > 0 {
            self.countdown = Some(remaining - 1);
            return None;
        }
        self.countdown = None;
        let kind = self.next;
        self.next = match kind {
            WareKind::Brick => WareKind::Wood,
            _ => WareKind::Brick,
        };
        Some(kind)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let mut robot = PickAndPlace::from_config(&RobotConfig::default())?;
    let mut cell = SimulatedCell::new();
    let mut spawner = Spawner {
        countdown: None,
        next: WareKind::Brick,
    };
    let mut sorted = 0usize;

    robot.start();
    for tick in 0..TICKS {
        robot.tick(&mut cell, DT);

        for signal in robot.drain_signals() {
            match signal {
                RobotSignal::StateChanged(state) => info!(tick, %state, "state changed"),
                RobotSignal::TargetUpdated(point) => info!(tick, ?point, "new target"),
                RobotSignal::WareReleased => sorted += 1,
                RobotSignal::NowIdle => spawner.notify_idle(),
                RobotSignal::WarePickedUp => {}
            }
        }

        if let Some(kind) = spawner.poll() {
            info!(tick, ?kind, "ware arrived");
            robot.report_ware_arrival(kind);
        }
    }

    info!(sorted, state = ?robot.current_state_name(), "simulation finished");
    for label in robot.history().labels(10) {
        info!("  {label}");
    }
    Ok(())
}
