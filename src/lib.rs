//! Cellsort: control core for a pick-and-place sorting arm
//!
//! A robot arm with a fork gripper picks wares off a pickup conveyor and drops
//! them on the conveyor of their kind. The crate holds everything between the
//! host's scene and the arm's actuators: it owns no clock and no threads, and
//! the host drives it with one [`tick`](robot::PickAndPlace::tick) per
//! simulation step.
//!
//! # Core Concepts
//!
//! - **State machine**: a generic graph of named states keyed by command
//!   symbols, whose entry actions run with a caller-supplied context
//!   ([`core`], [`builder`])
//! - **Motion solver**: finite-difference inverse kinematics steering the tool
//!   point toward a target ([`kinematics`])
//! - **Gripper**: fork open/close convergence and tool leveling ([`tool`])
//! - **Orchestrator**: the fixed pick-and-place cycle wiring the three
//!   together ([`robot`])
//!
//! # Example
//!
//! ```rust
//! use cellsort::config::RobotConfig;
//! use cellsort::kinematics::MotionEvent;
//! use cellsort::robot::{PickAndPlace, RobotSignal, WareKind};
//!
//! let mut robot = PickAndPlace::from_config(&RobotConfig::default()).unwrap();
//! robot.start();
//! assert_eq!(robot.current_state_name(), Some("MoveToStandby"));
//!
//! robot.handle_motion_event(MotionEvent::TargetReached);
//! assert!(robot.drain_signals().contains(&RobotSignal::NowIdle));
//!
//! robot.report_ware_arrival(WareKind::Brick);
//! assert_eq!(robot.current_state_name(), Some("MoveToConveyorPickup"));
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod kinematics;
pub mod robot;
pub mod tool;

// Re-export commonly used types
pub use builder::StateMachineBuilder;
pub use config::{ConfigError, RobotConfig};
pub use crate::core::{Command, MachineContext, MachineError, State, StateHistory, StateMachine, Step};
pub use robot::{PickAndPlace, RobotCommand, RobotError, RobotSignal, WareKind};
