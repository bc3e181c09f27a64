//! Reactive state machine keyed by command symbols.

use super::error::MachineError;
use super::history::{StateHistory, TransitionRecord, DEFAULT_HISTORY_CAPACITY};
use super::state::{Command, MachineContext, State};
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Outcome of [`StateMachine::advance`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// The command matched a transition and the destination was entered.
    Transitioned { from: String, to: String },

    /// The current state has no transition for the command.
    Ignored,
}

impl Step {
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }
}

/// Directed graph of named states driven by command symbols.
///
/// The machine has no timers: it only moves when [`advance`](Self::advance)
/// is called. Entry actions receive the caller-supplied context, never the
/// machine itself, so they cannot re-enter `advance`.
pub struct StateMachine<C: Command, P, Ctx> {
    states: Vec<State<C, P, Ctx>>,
    by_name: HashMap<String, usize>,
    current: Option<usize>,
    history: StateHistory<C>,
}

impl<C: Command, P, Ctx> Default for StateMachine<C, P, Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Command, P, Ctx> StateMachine<C, P, Ctx> {
    /// Create an empty, uninitialized machine.
    pub fn new() -> Self {
        Self::with_history_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create an empty machine that keeps at most `capacity` history records.
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            states: Vec::new(),
            by_name: HashMap::new(),
            current: None,
            history: StateHistory::with_capacity(capacity),
        }
    }

    /// Register a state. Names are unique; a duplicate is rejected and the
    /// already registered state keeps its transitions.
    pub fn add_state(&mut self, state: State<C, P, Ctx>) -> Result<(), MachineError> {
        if self.by_name.contains_key(state.name()) {
            return Err(MachineError::DuplicateState {
                name: state.name().to_string(),
            });
        }
        let index = self.states.len();
        self.by_name.insert(state.name().to_string(), index);
        self.states.push(state);
        Ok(())
    }

    /// Add the edge `src --command--> dst`.
    ///
    /// Both states must be registered and `src` must not already have an
    /// edge for `command`.
    pub fn add_transition(&mut self, src: &str, dst: &str, command: C) -> Result<(), MachineError> {
        let from = self.index_of(src)?;
        let to = self.index_of(dst)?;

        let transitions = &mut self.states[from].transitions;
        if transitions.contains_key(&command) {
            return Err(MachineError::DuplicateTransition {
                from: src.to_string(),
                command: command.name().to_string(),
            });
        }
        transitions.insert(command, to);
        Ok(())
    }

    /// Set the state the machine starts in. The entry action is not run.
    pub fn set_initial_state(&mut self, name: &str) -> Result<(), MachineError> {
        if let Some(current) = self.current_state_name() {
            return Err(MachineError::AlreadyInitialized {
                current: current.to_string(),
            });
        }
        self.current = Some(self.index_of(name)?);
        Ok(())
    }

    /// Follow the current state's transition for `command`.
    ///
    /// Without a matching transition this is a no-op returning
    /// [`Step::Ignored`]. Otherwise the transition is recorded, the context
    /// is told about the new state and the destination's entry action runs
    /// with its payload.
    pub fn advance(&mut self, command: C, ctx: &mut Ctx) -> Result<Step, MachineError>
    where
        Ctx: MachineContext,
    {
        let from = self.current.ok_or(MachineError::NotInitialized)?;
        let Some(&to) = self.states[from].transitions.get(&command) else {
            trace!(
                state = self.states[from].name(),
                command = command.name(),
                "no transition, ignoring command"
            );
            return Ok(Step::Ignored);
        };

        let from_name = self.states[from].name().to_string();
        let to_name = self.states[to].name().to_string();
        debug!(from = %from_name, to = %to_name, command = command.name(), "transition");

        self.history.record(TransitionRecord {
            from: from_name.clone(),
            to: to_name.clone(),
            command,
            timestamp: Utc::now(),
        });
        self.current = Some(to);

        let destination = &self.states[to];
        ctx.on_state_changed(destination.name());
        destination.enter(ctx);

        Ok(Step::Transitioned {
            from: from_name,
            to: to_name,
        })
    }

    /// Name of the current state, `None` before initialization.
    pub fn current_state_name(&self) -> Option<&str> {
        self.current.map(|i| self.states[i].name())
    }

    pub fn current_state(&self) -> Option<&State<C, P, Ctx>> {
        self.current.map(|i| &self.states[i])
    }

    pub fn state(&self, name: &str) -> Option<&State<C, P, Ctx>> {
        self.by_name.get(name).map(|&i| &self.states[i])
    }

    pub fn contains_state(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Destination of `src`'s transition for `command`, if any.
    pub fn transition_target(&self, src: &str, command: C) -> Option<&str> {
        let from = *self.by_name.get(src)?;
        let to = *self.states[from].transitions.get(&command)?;
        Some(self.states[to].name())
    }

    /// Number of registered states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn history(&self) -> &StateHistory<C> {
        &self.history
    }

    fn index_of(&self, name: &str) -> Result<usize, MachineError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| MachineError::UnknownState {
                name: name.to_string(),
            })
    }
}
