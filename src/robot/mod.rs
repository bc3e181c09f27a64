//! Pick-and-place orchestration of the sorting cell.

pub mod command;
pub mod controller;
pub mod error;
pub mod graph;
pub mod layout;

pub use command::{RobotCommand, WareKind};
pub use controller::{PickAndPlace, RobotContext, RobotSignal};
pub use error::RobotError;
pub use graph::{build_machine, states, waypoints, RobotMachine, StateTask};
pub use layout::{CellLayout, Destination, MotionRequest, UP};
