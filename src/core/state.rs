//! States, command symbols and entry actions.
//!
//! A [`State`] is a named node of the machine graph. It carries an optional
//! payload and an optional entry action that runs every time the machine
//! enters the state. Commands are the edge labels of the graph; any small
//! copyable enum can serve as one by implementing [`Command`] (usually via
//! the [`command_enum!`](crate::command_enum) macro).

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::hash::Hash;

/// Trait for command symbols that label transitions.
///
/// Commands are compared for equality and hashed, never ordered.
///
/// # Example
///
/// ```rust
/// use cellsort::core::Command;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Door {
///     Open,
///     Close,
/// }
///
/// impl Command for Door {
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Open => "Open",
///             Self::Close => "Close",
///         }
///     }
/// }
///
/// assert_eq!(Door::Open.name(), "Open");
/// ```
pub trait Command: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Get the command's name for display/logging.
    fn name(&self) -> &'static str;
}

/// Hook the machine calls into while advancing.
///
/// The context is whatever the entry actions operate on. The machine only
/// needs one thing from it: a place to report that a new state was entered.
pub trait MachineContext {
    /// Called with the destination's name right before its entry action runs.
    fn on_state_changed(&mut self, _state: &str) {}
}

impl MachineContext for () {}

/// Entry action of a state: receives the context and the state's payload.
pub type EntryAction<P, Ctx> = Box<dyn Fn(&mut Ctx, Option<&P>) + Send + Sync>;

/// A named state with its payload, entry action and outgoing transitions.
///
/// Outgoing transitions are owned by the state but can only be added
/// through [`StateMachine::add_transition`](crate::core::StateMachine::add_transition),
/// which validates both endpoints.
pub struct State<C: Command, P, Ctx> {
    name: String,
    payload: Option<P>,
    on_enter: Option<EntryAction<P, Ctx>>,
    pub(crate) transitions: HashMap<C, usize>,
}

impl<C: Command, P, Ctx> State<C, P, Ctx> {
    /// Create a state with no payload and no entry action.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: None,
            on_enter: None,
            transitions: HashMap::new(),
        }
    }

    /// Attach the payload handed to the entry action.
    pub fn with_payload(mut self, payload: P) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Attach the entry action.
    pub fn on_enter<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut Ctx, Option<&P>) + Send + Sync + 'static,
    {
        self.on_enter = Some(Box::new(action));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> Option<&P> {
        self.payload.as_ref()
    }

    pub fn has_entry_action(&self) -> bool {
        self.on_enter.is_some()
    }

    /// Commands this state has an outgoing transition for.
    pub fn commands(&self) -> impl Iterator<Item = &C> {
        self.transitions.keys()
    }

    pub(crate) fn enter(&self, ctx: &mut Ctx) {
        if let Some(action) = &self.on_enter {
            action(ctx, self.payload.as_ref());
        }
    }
}

impl<C: Command, P: Debug, Ctx> Debug for State<C, P, Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("payload", &self.payload)
            .field("on_enter", &self.on_enter.is_some())
            .field("transitions", &self.transitions.len())
            .finish()
    }
}

/// Turn a state name into a display label by inserting a space before
/// every capital that follows a lowercase letter or digit.
///
/// ```rust
/// use cellsort::core::humanize;
///
/// assert_eq!(humanize("MoveToStandby"), "Move To Standby");
/// assert_eq!(humanize("Idle"), "Idle");
/// ```
pub fn humanize(name: &str) -> String {
    let mut label = String::with_capacity(name.len() * 2);
    let mut previous: Option<char> = None;
    for ch in name.chars() {
        if let Some(prev) = previous {
            if ch.is_uppercase() && prev != ' ' && !prev.is_uppercase() {
                label.push(' ');
            }
        }
        label.push(ch);
        previous = Some(ch);
    }
    label
}
