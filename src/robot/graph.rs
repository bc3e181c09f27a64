//! The pick-and-place state graph.
//!
//! Every motion state carries a [`MotionRequest`] and the command to issue
//! once the solver reports arrival; the two tool states carry the grip
//! command to start. Entering a state hands its payload to the
//! [`RobotContext`], which starts the motion or the grip.

use super::command::{RobotCommand, WareKind};
use super::controller::RobotContext;
use super::error::RobotError;
use super::layout::{CellLayout, MotionRequest, UP};
use crate::builder::StateMachineBuilder;
use crate::config::ConfigError;
use crate::core::{State, StateMachine};
use crate::kinematics::MovementController;
use crate::tool::{GripCommand, ToolController};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// State names of the graph.
pub mod states {
    pub const IDLE: &str = "Idle";
    pub const MOVE_TO_STANDBY: &str = "MoveToStandby";
    pub const STANDBY: &str = "Standby";
    pub const MOVE_TO_CONVEYOR_PICKUP: &str = "MoveToConveyorPickup";
    pub const MOVE_TO_PALETT: &str = "MoveToPalett";
    pub const LIFT_PALETT: &str = "LiftPalett";
    pub const CLOSE_TOOL: &str = "CloseTool";
    pub const LIFT_WARE_FROM_CONVEYOR: &str = "LiftWareFromConveyor";
    pub const MOVE_TO_CONVEYOR_WARE: &str = "MoveToConveyorWare";
    pub const MOVE_TO_DROP: &str = "MoveToDrop";
    pub const OPEN_TOOL: &str = "OpenTool";
    pub const DROP_PALETT: &str = "DropPalett";
    pub const DEPART_FROM_PALETT: &str = "DepartFromPalett";
}

use states::*;

/// Distance behind a conveyor point where the tool approaches from.
const APPROACH: f32 = -3.5;

/// Payload of a working state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum StateTask {
    /// Move the tool, then issue `next`.
    Motion {
        request: MotionRequest,
        next: RobotCommand,
    },

    /// Start a tool command; the tool's event drives the next step.
    Grip(GripCommand),
}

pub type RobotMachine<M, T> = StateMachine<RobotCommand, StateTask, RobotContext<M, T>>;

/// The motion states in cycle order with their requests and follow-up commands.
///
/// Absolute points are derived from the pickup conveyor, which must exist.
pub fn waypoints(
    layout: &CellLayout,
) -> Result<Vec<(&'static str, MotionRequest, RobotCommand)>, ConfigError> {
    let pickup = layout
        .conveyor_position(WareKind::Pickup)
        .ok_or(ConfigError::MissingConveyor(WareKind::Pickup))?;
    let along = layout
        .conveyor_direction(WareKind::Pickup)
        .unwrap_or(Vec3::ZERO);

    Ok(vec![
        (
            MOVE_TO_STANDBY,
            MotionRequest::absolute(layout.standby, 100.0),
            RobotCommand::None,
        ),
        (
            MOVE_TO_CONVEYOR_PICKUP,
            MotionRequest::absolute(pickup - along * 3.0, 100.0),
            RobotCommand::MoveToPalett,
        ),
        (
            MOVE_TO_PALETT,
            MotionRequest::absolute(pickup, 20.0),
            RobotCommand::MoveToLift,
        ),
        (
            LIFT_PALETT,
            MotionRequest::absolute(pickup + UP * 0.5, 2.0),
            RobotCommand::CloseTool,
        ),
        (
            LIFT_WARE_FROM_CONVEYOR,
            MotionRequest::absolute(pickup - along * 4.0 + UP * 0.25, 60.0),
            RobotCommand::MoveToConveyor,
        ),
        (
            MOVE_TO_CONVEYOR_WARE,
            MotionRequest::ware_relative(UP * 0.5, APPROACH, 40.0),
            RobotCommand::MoveToLift,
        ),
        (
            MOVE_TO_DROP,
            MotionRequest::ware_relative(UP * 0.5, 0.0, 50.0),
            RobotCommand::OpenTool,
        ),
        (
            DROP_PALETT,
            MotionRequest::ware_relative(Vec3::ZERO, 0.0, 1.0),
            RobotCommand::MoveToConveyor,
        ),
        (
            DEPART_FROM_PALETT,
            MotionRequest::ware_relative(Vec3::ZERO, APPROACH, 20.0),
            RobotCommand::MoveToStandby,
        ),
    ])
}

/// Assemble the graph, starting in [`IDLE`](states::IDLE).
pub fn build_machine<M, T>(
    layout: &CellLayout,
    history_capacity: usize,
) -> Result<RobotMachine<M, T>, RobotError>
where
    M: MovementController + 'static,
    T: ToolController + 'static,
{
    let motions = waypoints(layout)?.into_iter().map(|(name, request, next)| {
        State::new(name)
            .with_payload(StateTask::Motion { request, next })
            .on_enter(run_task::<M, T>)
    });

    let machine = StateMachineBuilder::new()
        .history_capacity(history_capacity)
        .initial(IDLE)
        .state(State::new(IDLE))
        .state(State::new(STANDBY).on_enter(enter_standby::<M, T>))
        .states(motions)
        .state(grip_state(CLOSE_TOOL, GripCommand::Close))
        .state(grip_state(OPEN_TOOL, GripCommand::Open))
        .transition(IDLE, MOVE_TO_STANDBY, RobotCommand::MoveToStandby)
        .transition(MOVE_TO_STANDBY, STANDBY, RobotCommand::None)
        .transition(STANDBY, MOVE_TO_CONVEYOR_PICKUP, RobotCommand::MoveToConveyor)
        .transition(MOVE_TO_CONVEYOR_PICKUP, MOVE_TO_PALETT, RobotCommand::MoveToPalett)
        .transition(MOVE_TO_PALETT, LIFT_PALETT, RobotCommand::MoveToLift)
        .transition(LIFT_PALETT, CLOSE_TOOL, RobotCommand::CloseTool)
        .transition(CLOSE_TOOL, LIFT_WARE_FROM_CONVEYOR, RobotCommand::MoveToConveyor)
        .transition(LIFT_WARE_FROM_CONVEYOR, MOVE_TO_CONVEYOR_WARE, RobotCommand::MoveToConveyor)
        .transition(MOVE_TO_CONVEYOR_WARE, MOVE_TO_DROP, RobotCommand::MoveToLift)
        .transition(MOVE_TO_DROP, OPEN_TOOL, RobotCommand::OpenTool)
        .transition(OPEN_TOOL, DROP_PALETT, RobotCommand::MoveToPalett)
        .transition(DROP_PALETT, DEPART_FROM_PALETT, RobotCommand::MoveToConveyor)
        .transition(DEPART_FROM_PALETT, MOVE_TO_STANDBY, RobotCommand::MoveToStandby)
        .transition(DEPART_FROM_PALETT, MOVE_TO_CONVEYOR_PICKUP, RobotCommand::MoveToConveyor)
        .build()?;

    Ok(machine)
}

fn grip_state<M, T>(name: &'static str, command: GripCommand) -> State<RobotCommand, StateTask, RobotContext<M, T>>
where
    M: MovementController + 'static,
    T: ToolController + 'static,
{
    State::new(name)
        .with_payload(StateTask::Grip(command))
        .on_enter(run_task::<M, T>)
}

fn run_task<M: MovementController, T: ToolController>(
    ctx: &mut RobotContext<M, T>,
    task: Option<&StateTask>,
) {
    match task {
        Some(StateTask::Motion { request, next }) => ctx.begin_motion(request, *next),
        Some(StateTask::Grip(command)) => ctx.begin_grip(*command),
        None => {}
    }
}

fn enter_standby<M: MovementController, T: ToolController>(
    ctx: &mut RobotContext<M, T>,
    _task: Option<&StateTask>,
) {
    ctx.settle();
}
