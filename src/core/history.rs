//! State transition history tracking.
//!
//! Every transition the machine takes is recorded with the command that
//! triggered it and a timestamp. The history is a bounded ring: once the
//! capacity is reached the oldest record is dropped, so a machine that
//! cycles forever keeps a constant footprint.

use super::state::{humanize, Command};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of transitions kept by a machine.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use cellsort::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: "Idle".to_string(),
///     to: "Running".to_string(),
///     command: 1u8,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, "Running");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord<C> {
    /// The state being transitioned from
    pub from: String,
    /// The state being transitioned to
    pub to: String,
    /// The command that selected the transition
    pub command: C,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered, bounded history of state transitions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory<C> {
    records: VecDeque<TransitionRecord<C>>,
    capacity: usize,
}

impl<C: Command> Default for StateHistory<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Command> StateHistory<C> {
    /// Create an empty history with [`DEFAULT_HISTORY_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create an empty history keeping at most `capacity` records.
    ///
    /// A capacity of zero disables recording.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, record: TransitionRecord<C>) {
        if self.capacity == 0 {
            return;
        }
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in the order they happened, oldest first.
    pub fn transitions(&self) -> impl DoubleEndedIterator<Item = &TransitionRecord<C>> {
        self.records.iter()
    }

    /// The most recent record.
    pub fn latest(&self) -> Option<&TransitionRecord<C>> {
        self.records.back()
    }

    /// Get the path of state names traversed.
    ///
    /// The first retained record contributes its `from` state, every record
    /// contributes its `to` state.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from.as_str());
        }
        path.extend(self.records.iter().map(|r| r.to.as_str()));
        path
    }

    /// Time between the first and the last retained transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Display labels of the last `limit` entered states, newest first.
    pub fn labels(&self, limit: usize) -> Vec<String> {
        self.records
            .iter()
            .rev()
            .take(limit)
            .map(|r| humanize(&r.to))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestCommand {
        Next,
    }

    impl Command for TestCommand {
        fn name(&self) -> &'static str {
            "Next"
        }
    }

    fn record(from: &str, to: &str, timestamp: DateTime<Utc>) -> TransitionRecord<TestCommand> {
        TransitionRecord {
            from: from.to_string(),
            to: to.to_string(),
            command: TestCommand::Next,
            timestamp,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<TestCommand> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.latest().is_none());
        assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let mut history = StateHistory::new();
        let now = Utc::now();
        history.record(record("Initial", "Processing", now));
        history.record(record("Processing", "Complete", now));

        assert_eq!(history.get_path(), vec!["Initial", "Processing", "Complete"]);
        assert_eq!(history.latest().map(|r| r.to.as_str()), Some("Complete"));
    }

    #[test]
    fn capacity_evicts_oldest_record() {
        let mut history = StateHistory::with_capacity(2);
        let now = Utc::now();
        history.record(record("A", "B", now));
        history.record(record("B", "C", now));
        history.record(record("C", "D", now));

        assert_eq!(history.len(), 2);
        assert_eq!(history.get_path(), vec!["B", "C", "D"]);
    }

    #[test]
    fn zero_capacity_disables_recording() {
        let mut history = StateHistory::with_capacity(0);
        history.record(record("A", "B", Utc::now()));
        assert!(history.is_empty());
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let mut history = StateHistory::new();
        let start = Utc::now();
        history.record(record("A", "B", start));
        history.record(record("B", "C", start + chrono::Duration::milliseconds(250)));

        assert_eq!(history.duration(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let mut history = StateHistory::new();
        history.record(record("A", "B", Utc::now()));
        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn labels_are_newest_first_and_humanized() {
        let mut history = StateHistory::new();
        let now = Utc::now();
        history.record(record("Idle", "MoveToStandby", now));
        history.record(record("MoveToStandby", "Standby", now));

        assert_eq!(history.labels(10), vec!["Standby", "Move To Standby"]);
        assert_eq!(history.labels(1), vec!["Standby"]);
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = StateHistory::new();
        history.record(record("Initial", "Processing", Utc::now()));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<TestCommand> = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.len(), 1);
        assert_eq!(deserialized.latest(), history.latest());
    }
}
