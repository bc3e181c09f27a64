//! Orchestrator construction errors.

use crate::config::ConfigError;
use crate::core::MachineError;
use thiserror::Error;

/// Errors raised while assembling a [`PickAndPlace`](super::PickAndPlace).
#[derive(Debug, Error)]
pub enum RobotError {
    #[error("State graph rejected: {0}")]
    Machine(#[from] MachineError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
