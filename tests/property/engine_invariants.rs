//! Property-based tests for the session state machine and leaderboard.
//!
//! Random command sequences must never push the scan count past the roster
//! size, and ranking must be a deterministic stable sort.

use classroom::leaderboard;
use classroom::session::{SessionState, TickOutcome};
use classroom_proto::session::SessionStatus;
use classroom_proto::student::Student;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Op {
    Start(u32),
    Tick,
    Arrival,
    StaleArrival,
    Stop,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => (0u32..10).prop_map(Op::Start),
        4 => Just(Op::Tick),
        4 => Just(Op::Arrival),
        1 => Just(Op::StaleArrival),
        1 => Just(Op::Stop),
    ]
}

fn arb_roster() -> impl Strategy<Value = Vec<Student>> {
    prop::collection::vec((any::<bool>(), 0u32..20), 0..12).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (present, points))| {
                let id = u32::try_from(i).unwrap();
                Student::new(id, format!("Student {id}"), present, points)
            })
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Session state machine
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn scan_count_never_exceeds_roster(
        window in 1u32..20,
        ops in prop::collection::vec(arb_op(), 0..200),
    ) {
        let mut state = SessionState::new(window);
        let mut roster_size = 0;
        for op in ops {
            match op {
                Op::Start(size) => {
                    roster_size = size;
                    state.start(size);
                    prop_assert_eq!(state.status(), SessionStatus::Active);
                    prop_assert_eq!(state.remaining_secs(), window);
                    prop_assert_eq!(state.scan_count(), 0);
                }
                Op::Tick => {
                    let was_active = state.status() == SessionStatus::Active;
                    let outcome = state.tick();
                    prop_assert_eq!(was_active, outcome != TickOutcome::Idle);
                    if outcome == TickOutcome::Expired {
                        prop_assert_eq!(state.remaining_secs(), 0);
                        prop_assert_eq!(state.status(), SessionStatus::Expired);
                    }
                }
                Op::Arrival => {
                    let generation = state.generation();
                    state.record_arrival(generation);
                }
                Op::StaleArrival => {
                    let before = state.scan_count();
                    let stale = state.generation().wrapping_sub(1);
                    prop_assert!(!state.record_arrival(stale));
                    prop_assert_eq!(state.scan_count(), before);
                }
                Op::Stop => {
                    state.stop();
                    prop_assert_eq!(state.status(), SessionStatus::Inactive);
                }
            }
            prop_assert!(state.scan_count() <= roster_size);
        }
    }

    /// Only an open window moves the scan count.
    #[test]
    fn arrivals_ignored_unless_active(
        ops in prop::collection::vec(arb_op(), 0..100),
    ) {
        let mut state = SessionState::new(5);
        for op in ops {
            match op {
                Op::Start(size) => { state.start(size); }
                Op::Tick => { state.tick(); }
                Op::Stop => { state.stop(); }
                Op::Arrival | Op::StaleArrival => {
                    let before = state.scan_count();
                    let active = state.status() == SessionStatus::Active;
                    let counted = state.record_arrival(state.generation());
                    if !active {
                        prop_assert!(!counted);
                        prop_assert_eq!(state.scan_count(), before);
                    }
                }
            }
        }
    }

    /// A window of `n` units expires on exactly the `n`th tick.
    #[test]
    fn window_expires_after_exactly_window_ticks(window in 1u32..500) {
        let mut state = SessionState::new(window);
        state.start(3);
        for _ in 1..window {
            prop_assert!(matches!(state.tick(), TickOutcome::Counting(_)));
        }
        prop_assert_eq!(state.tick(), TickOutcome::Expired);
        prop_assert_eq!(state.tick(), TickOutcome::Idle);
    }
}

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn leaderboard_is_sorted_and_complete(roster in arb_roster()) {
        let ranked = leaderboard::rank(&roster);
        prop_assert_eq!(ranked.len(), roster.len());
        for (i, entry) in ranked.iter().enumerate() {
            prop_assert_eq!(entry.rank, i + 1);
        }
        for pair in ranked.windows(2) {
            prop_assert!(pair[0].student.points >= pair[1].student.points);
            // Equal points keep roster order (ids are assigned in roster order).
            if pair[0].student.points == pair[1].student.points {
                prop_assert!(pair[0].student.id < pair[1].student.id);
            }
        }
    }

    #[test]
    fn leaderboard_is_deterministic(roster in arb_roster()) {
        prop_assert_eq!(leaderboard::rank(&roster), leaderboard::rank(&roster));
    }

    #[test]
    fn top_is_prefix_of_rank(roster in arb_roster(), n in 0usize..15) {
        let ranked = leaderboard::rank(&roster);
        let top = leaderboard::top(&roster, n);
        prop_assert_eq!(top.len(), n.min(roster.len()));
        prop_assert_eq!(&ranked[..top.len()], top.as_slice());
    }
}
