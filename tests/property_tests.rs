//! Property-based tests for the state machine engine and the scalar helpers.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use cellsort::command_enum;
use cellsort::core::{humanize, MachineContext, MachineError, State, StateMachine, Step};
use cellsort::kinematics::{speed_fraction, wrap_degrees, MIN_SPEED_FRACTION, MIN_SPEED_PERCENT};
use proptest::prelude::*;

command_enum! {
    enum Signal {
        Go,
        Halt,
        Retry,
    }
}

const NAMES: [&str; 5] = ["Alpha", "Bravo", "Charlie", "Delta", "Echo"];

#[derive(Default)]
struct Entered(Vec<String>);

impl MachineContext for Entered {}

prop_compose! {
    fn arbitrary_signal()(variant in 0..3u8) -> Signal {
        match variant {
            0 => Signal::Go,
            1 => Signal::Halt,
            _ => Signal::Retry,
        }
    }
}

prop_compose! {
    fn arbitrary_edge()(from in 0..NAMES.len(), to in 0..NAMES.len(), signal in arbitrary_signal())
        -> (usize, usize, Signal) {
        (from, to, signal)
    }
}

fn entering(name: &'static str) -> State<Signal, (), Entered> {
    State::new(name).on_enter(move |ctx: &mut Entered, _| ctx.0.push(name.to_string()))
}

/// Machine over all names with the first accepted edge per (source, signal).
fn graph(edges: &[(usize, usize, Signal)], initial: usize) -> StateMachine<Signal, (), Entered> {
    let mut machine = StateMachine::new();
    for name in NAMES {
        machine.add_state(entering(name)).unwrap();
    }
    for &(from, to, signal) in edges {
        let _ = machine.add_transition(NAMES[from], NAMES[to], signal);
    }
    machine.set_initial_state(NAMES[initial]).unwrap();
    machine
}

proptest! {
    #[test]
    fn advance_follows_exactly_the_configured_edge(
        edges in prop::collection::vec(arbitrary_edge(), 0..15),
        start in 0..NAMES.len(),
        signal in arbitrary_signal(),
    ) {
        let mut machine = graph(&edges, start);
        let expected = machine.transition_target(NAMES[start], signal).map(str::to_string);
        let mut ctx = Entered::default();

        let step = machine.advance(signal, &mut ctx).unwrap();

        match expected {
            Some(destination) => {
                prop_assert!(step.is_transition());
                prop_assert_eq!(machine.current_state_name(), Some(destination.as_str()));
                prop_assert_eq!(ctx.0, vec![destination]);
                prop_assert_eq!(machine.history().len(), 1);
            }
            None => {
                prop_assert_eq!(step, Step::Ignored);
                prop_assert_eq!(machine.current_state_name(), Some(NAMES[start]));
                prop_assert!(ctx.0.is_empty());
                prop_assert!(machine.history().is_empty());
            }
        }
    }

    #[test]
    fn first_edge_wins_for_duplicates(
        edges in prop::collection::vec(arbitrary_edge(), 1..15),
    ) {
        let machine = graph(&edges, 0);
        let (from, to, signal) = edges[0];
        prop_assert_eq!(machine.transition_target(NAMES[from], signal), Some(NAMES[to]));
    }

    #[test]
    fn duplicate_state_always_fails_and_keeps_edges(
        edges in prop::collection::vec(arbitrary_edge(), 0..15),
        index in 0..NAMES.len(),
    ) {
        let mut machine = graph(&edges, 0);
        let before: Vec<_> = [Signal::Go, Signal::Halt, Signal::Retry]
            .iter()
            .map(|&s| machine.transition_target(NAMES[index], s).map(str::to_string))
            .collect();

        let result = machine.add_state(entering(NAMES[index]));

        prop_assert_eq!(result, Err(MachineError::DuplicateState { name: NAMES[index].to_string() }));
        let after: Vec<_> = [Signal::Go, Signal::Halt, Signal::Retry]
            .iter()
            .map(|&s| machine.transition_target(NAMES[index], s).map(str::to_string))
            .collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(machine.len(), NAMES.len());
    }

    #[test]
    fn history_never_exceeds_capacity(
        signals in prop::collection::vec(arbitrary_signal(), 0..100),
        capacity in 0usize..10,
    ) {
        let mut machine: StateMachine<Signal, (), Entered> = StateMachine::with_history_capacity(capacity);
        machine.add_state(entering("Alpha")).unwrap();
        machine.add_state(entering("Bravo")).unwrap();
        machine.add_transition("Alpha", "Bravo", Signal::Go).unwrap();
        machine.add_transition("Bravo", "Alpha", Signal::Go).unwrap();
        machine.set_initial_state("Alpha").unwrap();

        let mut ctx = Entered::default();
        let mut transitions = 0;
        for signal in signals {
            if machine.advance(signal, &mut ctx).unwrap().is_transition() {
                transitions += 1;
            }
        }

        prop_assert_eq!(machine.history().len(), transitions.min(capacity));
        prop_assert_eq!(ctx.0.len(), transitions);
    }

    #[test]
    fn speed_fraction_stays_in_unit_interval(percent in proptest::num::f32::ANY) {
        let fraction = speed_fraction(percent);
        prop_assert!(fraction >= MIN_SPEED_FRACTION);
        prop_assert!(fraction <= 1.0);
    }

    #[test]
    fn speed_fraction_is_linear_inside_range(percent in 0.01f32..=100.0) {
        prop_assert!((speed_fraction(percent) - percent / 100.0).abs() < 1e-6);
    }

    #[test]
    fn speed_below_minimum_is_raised(percent in -1.0e6f32..MIN_SPEED_PERCENT) {
        prop_assert_eq!(speed_fraction(percent), MIN_SPEED_FRACTION);
    }

    #[test]
    fn wrapped_angle_is_half_open_and_equivalent(angle in -1.0e4f32..1.0e4) {
        let wrapped = wrap_degrees(angle);
        prop_assert!(wrapped > -180.0 && wrapped <= 180.0);
        let turns = (angle - wrapped) / 360.0;
        prop_assert!((turns - turns.round()).abs() < 1e-3);
    }

    #[test]
    fn humanize_only_inserts_spaces(name in "[A-Za-z][a-zA-Z0-9]{0,20}") {
        let label = humanize(&name);
        prop_assert_eq!(label.replace(' ', ""), name.clone());
        prop_assert!(label.len() >= name.len());
    }
}
