//! Builder API for ergonomic state machine construction.
//!
//! This module provides a fluent builder and the `command_enum!` macro for
//! defining command symbols with minimal boilerplate.

pub mod machine;
pub mod macros;

pub use machine::StateMachineBuilder;
