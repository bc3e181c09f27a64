//! Fork gripper with continuous horizontal leveling.
//!
//! The tool carries three fork actuators and one alignment actuator. An
//! open or close command drives every fork toward its own target angle until
//! all three sit within the angle threshold at once; then the command is
//! cleared and a [`ToolEvent`] is raised. Independently of any command, each
//! update turns the alignment actuator to keep the tool level.
//!
//! Rotations are proportional to the angular error and to the elapsed time
//! passed to [`update`](ToolController::update), so convergence speed does not
//! depend on the tick rate.

use crate::kinematics::{wrap_degrees, Actuator, Axis};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Reading of a closed left/right fork, in degrees.
pub const CLOSED_REFERENCE: f32 = 90.0;

/// How far a fork swings when opened, in degrees.
pub const OPEN_OFFSET: f32 = 30.0;

/// Movable parts of the tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolPart {
    ForkLeft,
    ForkRight,
    ForkTop,
    Alignment,
}

/// Access to the tool's actuators and its orientation.
pub trait Tool {
    /// Orientation of the tool body, euler angles in degrees.
    fn orientation(&self) -> Vec3;

    fn part(&self, part: ToolPart) -> &dyn Actuator;

    fn part_mut(&mut self, part: ToolPart) -> &mut dyn Actuator;
}

/// Completion events of a tool command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolEvent {
    Opened,
    Closed,
}

/// Pending tool command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GripCommand {
    #[default]
    None,
    Open,
    Close,
}

/// Steering of the tool.
pub trait ToolController {
    fn open(&mut self);

    fn close(&mut self);

    /// Advance by `dt` seconds.
    fn update<R: Tool + ?Sized>(&mut self, rig: &mut R, dt: f32) -> Option<ToolEvent>;
}

/// Where one fork is read and what it should read when open or closed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForkGeometry {
    pub part: ToolPart,
    pub axis: Axis,
    pub closed_angle: f32,
    pub open_angle: f32,
}

impl ForkGeometry {
    fn target(&self, command: GripCommand) -> f32 {
        match command {
            GripCommand::Open => self.open_angle,
            _ => self.closed_angle,
        }
    }
}

/// Gripper tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GripperConfig {
    pub forks: [ForkGeometry; 3],
    /// A fork within this many degrees of its target counts as there.
    pub angle_threshold: f32,
    /// Rate fraction for fork rotations.
    pub fork_rate: f32,
    /// Tool roll (z) that counts as level.
    pub alignment_reference: f32,
    /// Rate fraction for the alignment actuator.
    pub alignment_rate: f32,
}

impl Default for GripperConfig {
    fn default() -> Self {
        let side = |part| ForkGeometry {
            part,
            axis: Axis::X,
            closed_angle: CLOSED_REFERENCE,
            open_angle: CLOSED_REFERENCE - OPEN_OFFSET,
        };
        Self {
            forks: [
                side(ToolPart::ForkLeft),
                side(ToolPart::ForkRight),
                ForkGeometry {
                    part: ToolPart::ForkTop,
                    axis: Axis::Y,
                    closed_angle: 0.0,
                    open_angle: OPEN_OFFSET,
                },
            ],
            angle_threshold: 0.5,
            fork_rate: 0.2,
            alignment_reference: 180.0,
            alignment_rate: 1.0,
        }
    }
}

/// Three-fork gripper controller.
#[derive(Clone, Debug, Default)]
pub struct GripperController {
    config: GripperConfig,
    command: GripCommand,
}

impl GripperController {
    pub fn new(config: GripperConfig) -> Self {
        Self {
            config,
            command: GripCommand::None,
        }
    }

    pub fn config(&self) -> &GripperConfig {
        &self.config
    }

    pub fn command(&self) -> GripCommand {
        self.command
    }

    fn error<R: Tool + ?Sized>(&self, rig: &R, fork: &ForkGeometry) -> f32 {
        let reading = fork.axis.component(rig.part(fork.part).angle());
        wrap_degrees(fork.target(self.command) - reading)
    }

    fn align<R: Tool + ?Sized>(&self, rig: &mut R, dt: f32) {
        let error = wrap_degrees(self.config.alignment_reference - rig.orientation().z);
        rig.part_mut(ToolPart::Alignment)
            .rotate(error * dt, self.config.alignment_rate);
    }

    /// Rotate the forks toward the current command's targets.
    /// Returns true once every fork reads within the threshold.
    fn drive_forks<R: Tool + ?Sized>(&self, rig: &mut R, dt: f32) -> bool {
        let threshold = self.config.angle_threshold;
        let errors = self.config.forks.clone().map(|fork| {
            let error = self.error(rig, &fork);
            (fork.part, error)
        });

        if errors.iter().all(|(_, error)| error.abs() < threshold) {
            return true;
        }

        for (part, error) in errors {
            if error.abs() >= threshold {
                rig.part_mut(part).rotate(error * dt, self.config.fork_rate);
            }
        }
        false
    }
}

impl ToolController for GripperController {
    fn open(&mut self) {
        self.command = GripCommand::Open;
    }

    fn close(&mut self) {
        self.command = GripCommand::Close;
    }

    fn update<R: Tool + ?Sized>(&mut self, rig: &mut R, dt: f32) -> Option<ToolEvent> {
        let dt = dt.max(0.0);
        self.align(rig, dt);

        let event = match self.command {
            GripCommand::None => return None,
            GripCommand::Open => ToolEvent::Opened,
            GripCommand::Close => ToolEvent::Closed,
        };

        if self.drive_forks(rig, dt) {
            self.command = GripCommand::None;
            Some(event)
        } else {
            None
        }
    }
}
