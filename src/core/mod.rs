//! Generic state machine engine.
//!
//! This module contains the reusable core of the controller:
//! - Command symbols via the `Command` trait
//! - Named states with payloads and entry actions
//! - The reactive `StateMachine` driven by `advance`
//! - Bounded, timestamped history of transitions
//!
//! Nothing here knows about motion, wares or actuators.

mod error;
mod history;
mod machine;
mod state;

pub use error::MachineError;
pub use history::{StateHistory, TransitionRecord, DEFAULT_HISTORY_CAPACITY};
pub use machine::{StateMachine, Step};
pub use state::{humanize, Command, EntryAction, MachineContext, State};
