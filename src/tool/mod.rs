//! End-effector control.

pub mod gripper;

pub use gripper::{
    ForkGeometry, GripCommand, GripperConfig, GripperController, Tool, ToolController, ToolEvent,
    ToolPart, CLOSED_REFERENCE, OPEN_OFFSET,
};
