//! Property-based tests for the store, the reducer combinator and composition.
//!
//! Random `Step` sequences are folded by hand and checked against what the
//! store ends up holding, how often listeners fire and which combined states
//! keep their identity.

use proptest::prelude::*;
use serde_json::json;
use statecell::combine::{combine_reducers, CombinedState};
use statecell::core::{compose, Action, Composable};
use statecell::store::{create_store, reducer, Reducer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Debug)]
enum Step {
    Inc(i64),
    Dec(i64),
    Reset,
    Unknown(String),
}

impl Step {
    fn action(&self) -> Action {
        match self {
            Self::Inc(by) => Action::new("INC").with_payload(*by),
            Self::Dec(by) => Action::new("DEC").with_payload(*by),
            Self::Reset => Action::new("RESET"),
            Self::Unknown(kind) => Action::new(kind.as_str()),
        }
    }

    fn apply(&self, count: i64) -> i64 {
        match self {
            Self::Inc(by) => count + by,
            Self::Dec(by) => count - by,
            Self::Reset => 0,
            Self::Unknown(_) => count,
        }
    }
}

prop_compose! {
    fn arbitrary_step()(variant in 0..4u8, by in -100..100i64, kind in "[a-z_]{1,12}") -> Step {
        match variant {
            0 => Step::Inc(by),
            1 => Step::Dec(by),
            2 => Step::Reset,
            _ => Step::Unknown(kind),
        }
    }
}

fn counter() -> Reducer<i64> {
    reducer(|state: Option<i64>, action: &Action| {
        let count = state.unwrap_or(0);
        let by = action.payload().and_then(|by| by.as_i64()).unwrap_or(0);
        match action.kind() {
            Some("INC") => count + by,
            Some("DEC") => count - by,
            Some("RESET") => 0,
            _ => count,
        }
    })
}

fn counter_slice(state: Option<Arc<i64>>, action: &Action) -> Option<Arc<i64>> {
    let count = state.unwrap_or_default();
    let by = action.payload().and_then(|by| by.as_i64()).unwrap_or(0);
    Some(match action.kind() {
        Some("INC") => Arc::new(*count + by),
        Some("DEC") => Arc::new(*count - by),
        Some("RESET") => Arc::new(0),
        _ => count,
    })
}

proptest! {
    #[test]
    fn dispatch_returns_the_dispatched_action(step in arbitrary_step()) {
        let store = create_store(counter(), None).unwrap();
        let action = step.action().with_field("meta", json!({ "source": "proptest" }));
        let returned = store.dispatch(action.clone()).unwrap();
        prop_assert_eq!(returned, action);
    }

    #[test]
    fn state_is_the_fold_of_dispatched_actions(
        start in -1000..1000i64,
        steps in prop::collection::vec(arbitrary_step(), 0..40),
    ) {
        let store = create_store(counter(), Some(start)).unwrap();
        for step in &steps {
            store.dispatch(step.action()).unwrap();
        }
        let expected = steps.iter().fold(start, |count, step| step.apply(count));
        prop_assert_eq!(store.get_state().unwrap(), expected);
    }

    #[test]
    fn listeners_run_once_per_dispatch(steps in prop::collection::vec(arbitrary_step(), 0..20)) {
        let store = create_store(counter(), None).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&calls);
        store.subscribe(move || {
            sink.fetch_add(1, Ordering::SeqCst);
        }).unwrap();

        for step in &steps {
            store.dispatch(step.action()).unwrap();
        }
        prop_assert_eq!(calls.load(Ordering::SeqCst), steps.len());
    }

    #[test]
    fn combined_state_changes_only_when_a_slice_changes(step in arbitrary_step()) {
        let root = combine_reducers()
            .slice("count", counter_slice)
            .shape_warnings(false)
            .build();
        let state: CombinedState = root.reduce(None, &Action::new("SEED")).unwrap();
        let next = root.reduce(Some(state.clone()), &step.action()).unwrap();

        let slice_changed = !next
            .slice("count")
            .unwrap()
            .ptr_eq(state.slice("count").unwrap());
        prop_assert_eq!(!next.ptr_eq(&state), slice_changed);
        prop_assert_eq!(slice_changed, !matches!(step, Step::Unknown(_)));
    }

    #[test]
    fn compose_applies_right_to_left(factors in prop::collection::vec(-5..5i64, 0..6), x in -100..100i64) {
        let funcs: Vec<Composable<Vec<i64>>> = factors
            .iter()
            .map(|&factor| -> Composable<Vec<i64>> {
                Arc::new(move |mut trail: Vec<i64>| {
                    trail.push(factor);
                    trail
                })
            })
            .collect();

        let trail = compose(funcs)(vec![x]);

        let mut expected = vec![x];
        expected.extend(factors.iter().rev());
        prop_assert_eq!(trail, expected);
    }
}
