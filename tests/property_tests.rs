//! Property-based tests for the timed signal machine.
//!
//! These tests use proptest to drive the machine through random sequences
//! of host operations on a virtual clock and check the cycle invariants.

use proptest::prelude::*;
use signal_cycle::{ManualScheduler, Phase, SignalConfig, TimedStateMachine};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Debug)]
enum Op {
    Request,
    Fire,
    Advance(u64),
    Start,
    Stop,
    Halt,
    Resume,
}

prop_compose! {
    fn cycle_op()(variant in 0..3u8, ms in 0..8000u64) -> Op {
        match variant {
            0 => Op::Request,
            1 => Op::Fire,
            _ => Op::Advance(ms),
        }
    }
}

fn any_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => cycle_op(),
        1 => Just(Op::Start),
        1 => Just(Op::Stop),
        1 => Just(Op::Halt),
        1 => Just(Op::Resume),
    ]
}

fn apply(machine: &TimedStateMachine<ManualScheduler>, clock: &ManualScheduler, op: &Op) {
    match op {
        Op::Request => machine.request_pedestrian(),
        Op::Fire => {
            clock.fire_next();
        }
        Op::Advance(ms) => {
            clock.advance(Duration::from_millis(*ms));
        }
        Op::Start => machine.start(),
        Op::Stop => machine.stop(),
        Op::Halt => machine.halt(),
        Op::Resume => machine.resume(),
    }
}

fn observed(machine: &TimedStateMachine<ManualScheduler>) -> Arc<Mutex<Vec<Phase>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    machine.subscribe(move |phase| sink.lock().unwrap().push(phase));
    seen
}

proptest! {
    #[test]
    fn phases_never_skip_yellow(ops in prop::collection::vec(cycle_op(), 0..60)) {
        let clock = ManualScheduler::new();
        let machine = TimedStateMachine::new(clock.clone());
        let seen = observed(&machine);
        machine.start();

        for op in &ops {
            apply(&machine, &clock, op);
        }

        let seen = seen.lock().unwrap();
        prop_assert_eq!(seen[0], Phase::Green);
        for pair in seen.windows(2) {
            prop_assert_eq!(pair[1], pair[0].next());
        }
    }

    #[test]
    fn dwells_come_from_the_configured_set(ops in prop::collection::vec(cycle_op(), 0..60)) {
        let clock = ManualScheduler::new();
        let machine = TimedStateMachine::new(clock.clone());
        let config = SignalConfig::default();
        machine.start();

        for op in &ops {
            apply(&machine, &clock, op);
        }

        for entry in machine.history().entries() {
            let expected = config.dwell_ms(entry.phase, entry.pedestrian);
            prop_assert_eq!(entry.dwell_ms, expected);
            if entry.phase == Phase::Yellow {
                prop_assert_eq!(entry.dwell_ms, config.yellow_ms);
            }
        }
    }

    #[test]
    fn request_is_honored_for_at_most_limit_entries(
        steps in prop::collection::vec(any::<bool>(), 0..80)
    ) {
        let clock = ManualScheduler::new();
        let machine = TimedStateMachine::new(clock.clone());
        let limit = machine.config().debounce_limit;
        machine.start();

        let mut streak = 0;
        for request in steps {
            if request {
                if !machine.state().pedestrian_requested {
                    streak = 0;
                }
                machine.request_pedestrian();
            }
            let requested_before = machine.state().pedestrian_requested;
            clock.fire_next();

            prop_assert!(machine.state().debounce_count < limit);

            let history = machine.history();
            let Some(entry) = history.last() else {
                continue;
            };
            prop_assert!(!entry.pedestrian || requested_before);
            streak = if entry.pedestrian { streak + 1 } else { 0 };
            prop_assert!(streak <= limit);
        }
    }

    #[test]
    fn at_most_one_timer_is_outstanding(ops in prop::collection::vec(any_op(), 0..80)) {
        let clock = ManualScheduler::new();
        let machine = TimedStateMachine::new(clock.clone());

        for op in &ops {
            apply(&machine, &clock, op);
            prop_assert!(clock.pending() <= 1);
            prop_assert_eq!(clock.pending() == 1, machine.pending_timer().is_some());
        }
    }

    #[test]
    fn current_phase_is_always_in_the_enumeration(ops in prop::collection::vec(any_op(), 0..80)) {
        let clock = ManualScheduler::new();
        let machine = TimedStateMachine::new(clock.clone());
        prop_assert_eq!(machine.current_phase(), Phase::Green);

        for op in &ops {
            apply(&machine, &clock, op);
            prop_assert!(Phase::ALL.contains(&machine.current_phase()));
        }
    }

    #[test]
    fn without_requests_the_dwell_cycle_is_fixed(fires in 1..40usize) {
        let clock = ManualScheduler::new();
        let machine = TimedStateMachine::new(clock.clone());
        machine.start();

        for _ in 0..fires {
            clock.fire_next();
        }

        let expected = [5000u64, 1000, 2000];
        for (i, delay) in clock.requested_delays().iter().enumerate() {
            prop_assert_eq!(*delay, Duration::from_millis(expected[i % 3]));
        }
    }
}
