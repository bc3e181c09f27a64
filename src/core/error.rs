//! Configuration errors raised while assembling or driving a state machine.

use thiserror::Error;

/// Errors reported by [`StateMachine`](crate::core::StateMachine) and its builder.
///
/// All of these are configuration errors: they surface while the graph is
/// being assembled and should abort construction. A command that has no
/// transition from the current state is not an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("State '{name}' already exists")]
    DuplicateState { name: String },

    #[error("State '{name}' not found")]
    UnknownState { name: String },

    #[error("Transition from '{from}' on command '{command}' already exists")]
    DuplicateTransition { from: String, command: String },

    #[error("Initial state already set to '{current}'")]
    AlreadyInitialized { current: String },

    #[error("Initial state not specified. Call set_initial_state before advancing")]
    NotInitialized,
}
