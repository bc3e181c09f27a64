//! The pick-and-place orchestrator.
//!
//! [`PickAndPlace`] owns the state graph and a [`RobotContext`] holding the
//! movement and tool controllers. It turns controller events and ware
//! arrivals into commands for the graph; entry actions of the states issue
//! the next motion or tool command. Everything the orchestrator wants the
//! host to know is queued as a [`RobotSignal`] and handed out by
//! [`drain_signals`](PickAndPlace::drain_signals).

use super::command::{RobotCommand, WareKind};
use super::error::RobotError;
use super::graph::{build_machine, states, RobotMachine};
use super::layout::{CellLayout, MotionRequest};
use crate::config::RobotConfig;
use crate::core::{Command, MachineContext, StateHistory, Step, DEFAULT_HISTORY_CAPACITY};
use crate::kinematics::{InverseKinematics, Manipulator, MotionEvent, MovementController};
use crate::tool::{GripCommand, GripperController, Tool, ToolController, ToolEvent};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Notifications for the host, in emission order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RobotSignal {
    /// A new state was entered.
    StateChanged(String),
    /// A motion toward this point was issued.
    TargetUpdated(Vec3),
    /// The ware was gripped and lifted off the pickup conveyor.
    WarePickedUp,
    /// The ware was let go over its destination conveyor.
    WareReleased,
    /// The robot is in standby, ready for the next ware.
    NowIdle,
}

/// Everything the state entry actions operate on.
pub struct RobotContext<M, T> {
    movement: M,
    tool: T,
    layout: CellLayout,
    next_command: RobotCommand,
    ware: WareKind,
    signals: Vec<RobotSignal>,
}

impl<M: MovementController, T: ToolController> RobotContext<M, T> {
    fn new(movement: M, tool: T, layout: CellLayout) -> Self {
        Self {
            movement,
            tool,
            layout,
            next_command: RobotCommand::None,
            ware: WareKind::Pickup,
            signals: Vec::new(),
        }
    }

    pub(super) fn begin_motion(&mut self, request: &MotionRequest, next: RobotCommand) {
        self.next_command = next;
        match request.resolve(&self.layout, self.ware) {
            Some(point) => {
                self.movement.set_target(point, request.speed_percent);
                self.signals.push(RobotSignal::TargetUpdated(point));
            }
            None => warn!(ware = ?self.ware, "no conveyor configured for ware kind, skipping motion"),
        }
    }

    pub(super) fn begin_grip(&mut self, command: GripCommand) {
        self.next_command = RobotCommand::None;
        match command {
            GripCommand::Open => self.tool.open(),
            GripCommand::Close => self.tool.close(),
            GripCommand::None => {}
        }
    }

    pub(super) fn settle(&mut self) {
        self.ware = WareKind::Pickup;
        info!("robot idle");
        self.signals.push(RobotSignal::NowIdle);
    }
}

impl<M, T> MachineContext for RobotContext<M, T> {
    fn on_state_changed(&mut self, state: &str) {
        self.signals.push(RobotSignal::StateChanged(state.to_string()));
    }
}

/// Sorting cell controller: picks wares off the pickup conveyor and drops
/// them on the conveyor of their kind.
///
/// Signals queue up until [`drain_signals`](Self::drain_signals) is called.
/// The queue is unbounded, so the host must drain it regularly, typically
/// once per tick.
pub struct PickAndPlace<M = InverseKinematics, T = GripperController> {
    machine: RobotMachine<M, T>,
    context: RobotContext<M, T>,
}

impl PickAndPlace {
    /// Build the default controllers from `config` after validating it.
    pub fn from_config(config: &RobotConfig) -> Result<Self, RobotError> {
        config.validate()?;
        Self::with_history_capacity(
            InverseKinematics::new(config.solver.clone()),
            GripperController::new(config.gripper.clone()),
            config.layout.clone(),
            config.history_capacity,
        )
    }
}

impl<M, T> PickAndPlace<M, T>
where
    M: MovementController + 'static,
    T: ToolController + 'static,
{
    pub fn new(movement: M, tool: T, layout: CellLayout) -> Result<Self, RobotError> {
        Self::with_history_capacity(movement, tool, layout, DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_history_capacity(
        movement: M,
        tool: T,
        layout: CellLayout,
        history_capacity: usize,
    ) -> Result<Self, RobotError> {
        let machine = build_machine(&layout, history_capacity)?;
        Ok(Self {
            machine,
            context: RobotContext::new(movement, tool, layout),
        })
    }

    /// Leave `Idle` and head for standby. Ignored once started.
    pub fn start(&mut self) -> Step {
        if self.current_state_name() != Some(states::IDLE) {
            debug!(state = ?self.current_state_name(), "already started");
            return Step::Ignored;
        }
        self.dispatch(RobotCommand::MoveToStandby)
    }

    /// A new ware of `kind` is waiting on the pickup conveyor.
    ///
    /// Accepted in `Standby` and while departing from the last drop; the ware
    /// kind never changes in the middle of a cycle.
    pub fn report_ware_arrival(&mut self, kind: WareKind) -> Step {
        let state = self.current_state_name();
        if state != Some(states::STANDBY) && state != Some(states::DEPART_FROM_PALETT) {
            debug!(?state, ?kind, "ware arrival outside standby, ignoring");
            return Step::Ignored;
        }
        self.context.ware = kind;
        self.dispatch(RobotCommand::MoveToConveyor)
    }

    pub fn ware_kind(&self) -> WareKind {
        self.context.ware
    }

    pub fn set_ware_kind(&mut self, kind: WareKind) {
        self.context.ware = kind;
    }

    pub fn handle_motion_event(&mut self, event: MotionEvent) -> Step {
        match event {
            MotionEvent::TargetReached => {
                let command = std::mem::take(&mut self.context.next_command);
                self.dispatch(command)
            }
        }
    }

    pub fn handle_tool_event(&mut self, event: ToolEvent) -> Step {
        match event {
            ToolEvent::Opened => {
                info!(ware = ?self.context.ware, "ware released");
                self.context.signals.push(RobotSignal::WareReleased);
                self.dispatch(RobotCommand::MoveToPalett)
            }
            ToolEvent::Closed => {
                info!(ware = ?self.context.ware, "ware picked up");
                self.context.signals.push(RobotSignal::WarePickedUp);
                self.dispatch(RobotCommand::MoveToConveyor)
            }
        }
    }

    /// Advance both controllers by one tick of `dt` seconds, solver first.
    ///
    /// Any signals raised are appended to the queue; call
    /// [`drain_signals`](Self::drain_signals) afterwards.
    pub fn tick<B: Manipulator + Tool + ?Sized>(&mut self, body: &mut B, dt: f32) {
        if let Some(event) = self.context.movement.update(&mut *body) {
            self.handle_motion_event(event);
        }
        if let Some(event) = self.context.tool.update(&mut *body, dt) {
            self.handle_tool_event(event);
        }
    }

    /// Take the signals queued since the last call, leaving the queue empty.
    pub fn drain_signals(&mut self) -> Vec<RobotSignal> {
        std::mem::take(&mut self.context.signals)
    }

    pub fn current_state_name(&self) -> Option<&str> {
        self.machine.current_state_name()
    }

    /// Command issued at the next "target reached".
    pub fn next_command(&self) -> RobotCommand {
        self.context.next_command
    }

    pub fn history(&self) -> &StateHistory<RobotCommand> {
        self.machine.history()
    }

    pub fn machine(&self) -> &RobotMachine<M, T> {
        &self.machine
    }

    pub fn layout(&self) -> &CellLayout {
        &self.context.layout
    }

    pub fn movement(&self) -> &M {
        &self.context.movement
    }

    pub fn tool(&self) -> &T {
        &self.context.tool
    }

    fn dispatch(&mut self, command: RobotCommand) -> Step {
        match self.machine.advance(command, &mut self.context) {
            Ok(step) => step,
            Err(err) => {
                error!(command = command.name(), %err, "state machine rejected command");
                Step::Ignored
            }
        }
    }
}
