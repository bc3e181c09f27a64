//! Command symbols and ware kinds of the sorting cell.

use crate::command_enum;
use serde::{Deserialize, Serialize};

command_enum! {
    /// Edge labels of the pick-and-place graph.
    #[derive(Default)]
    pub enum RobotCommand {
        /// Unconditional step, also the empty next-command slot.
        #[default]
        None,
        MoveToConveyor,
        MoveToStandby,
        MoveToLift,
        MoveToPalett,
        OpenTool,
        CloseTool,
        /// Reserved for choosing a destination conveyor; no transition uses it.
        DecideDestination,
    }
}

/// Kind of ware on the cell, selecting which conveyor point is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WareKind {
    /// The conveyor wares arrive on.
    #[default]
    Pickup,
    Brick,
    Wood,
}

impl WareKind {
    pub const ALL: [WareKind; 3] = [Self::Pickup, Self::Brick, Self::Wood];
}
