//! Builder for constructing state machines.

use crate::core::{Command, MachineError, State, StateMachine, DEFAULT_HISTORY_CAPACITY};

/// Builder for constructing state machines with a fluent API.
///
/// States and transitions are collected first and applied in order by
/// [`build`](Self::build), which stops at the first configuration error.
pub struct StateMachineBuilder<C: Command, P, Ctx> {
    initial: Option<String>,
    states: Vec<State<C, P, Ctx>>,
    transitions: Vec<(String, String, C)>,
    history_capacity: usize,
}

impl<C: Command, P, Ctx> StateMachineBuilder<C, P, Ctx> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            states: Vec::new(),
            transitions: Vec::new(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Add a state.
    pub fn state(mut self, state: State<C, P, Ctx>) -> Self {
        self.states.push(state);
        self
    }

    /// Add multiple states at once.
    pub fn states(mut self, states: impl IntoIterator<Item = State<C, P, Ctx>>) -> Self {
        self.states.extend(states);
        self
    }

    /// Add the edge `from --command--> to`.
    pub fn transition(mut self, from: impl Into<String>, to: impl Into<String>, command: C) -> Self {
        self.transitions.push((from.into(), to.into(), command));
        self
    }

    /// Limit the number of history records the machine keeps.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Build the state machine.
    /// Returns an error if a state is duplicated, a transition is duplicated or
    /// refers to an unknown state, or the initial state is missing.
    pub fn build(self) -> Result<StateMachine<C, P, Ctx>, MachineError> {
        let initial = self.initial.ok_or(MachineError::NotInitialized)?;

        let mut machine = StateMachine::with_history_capacity(self.history_capacity);
        for state in self.states {
            machine.add_state(state)?;
        }
        for (from, to, command) in &self.transitions {
            machine.add_transition(from, to, *command)?;
        }
        machine.set_initial_state(&initial)?;

        Ok(machine)
    }
}

impl<C: Command, P, Ctx> Default for StateMachineBuilder<C, P, Ctx> {
    fn default() -> Self {
        Self::new()
    }
}
