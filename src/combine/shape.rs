//! Shape checks for slice reducers and combined state.
//!
//! Reducer shapes are validated once, when a combination is built, and every
//! violation is collected instead of stopping at the first one. State shape
//! drift is only ever reported as a warning.

use crate::combine::slice::{CombinedState, SliceReducer};
use crate::core::{Action, ShapeViolation, StoreError};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Probe every slice reducer with an empty state, first with the init action
/// and then with an action type no reducer can know.
pub(crate) fn assert_reducer_shapes(reducers: &[(String, SliceReducer)]) -> Result<(), StoreError> {
    let checks: Vec<Validation<(), NonEmptyVec<ShapeViolation>>> = reducers
        .iter()
        .map(|(key, reducer)| check_reducer(key, reducer))
        .collect();

    match Validation::all_vec(checks) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(violations) => Err(StoreError::ReducerShape(violations.into_vec())),
    }
}

fn check_reducer(key: &str, reducer: &SliceReducer) -> Validation<(), NonEmptyVec<ShapeViolation>> {
    let probe = |action: Action, nothing: ShapeViolation| match reducer(None, &action) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(nothing),
        Err(error) => Err(ShapeViolation::InitFailed {
            key: key.to_string(),
            reason: error.to_string(),
        }),
    };

    let outcome = probe(
        Action::init(),
        ShapeViolation::InitReturnedNothing {
            key: key.to_string(),
        },
    )
    .and_then(|()| {
        probe(
            Action::probe_unknown(),
            ShapeViolation::ProbeReturnedNothing {
                key: key.to_string(),
            },
        )
    });

    match outcome {
        Ok(()) => Validation::success(()),
        Err(violation) => Validation::fail(violation),
    }
}

/// Advisory message about the state handed to a combined reducer, if any.
///
/// Unexpected keys are recorded in `reported` and never reported twice. They
/// are recorded but not reported for the replace action, since reducers
/// swapped in later may still claim them.
pub(crate) fn unexpected_shape_warning(
    state: Option<&CombinedState>,
    reducer_keys: &[&str],
    action: &Action,
    reported: &mut HashSet<String>,
) -> Option<String> {
    if reducer_keys.is_empty() {
        return Some(
            "Store does not have a valid reducer. Make sure the slices passed \
             to combine_reducers() have reducers."
                .to_string(),
        );
    }

    let unexpected: Vec<&str> = state
        .into_iter()
        .flat_map(CombinedState::keys)
        .filter(|key| !reducer_keys.contains(key) && !reported.contains(*key))
        .collect();
    reported.extend(unexpected.iter().map(|key| key.to_string()));

    if action.is_replace() || unexpected.is_empty() {
        return None;
    }

    let argument = if action.is_init() {
        "preloaded state passed to create_store"
    } else {
        "previous state received by the reducer"
    };

    Some(format!(
        "Unexpected {} \"{}\" found in {}. Expected to find one of the known reducer keys \
         instead: \"{}\". Unexpected keys will be ignored.",
        if unexpected.len() > 1 { "keys" } else { "key" },
        unexpected.join("\", \""),
        argument,
        reducer_keys.join("\", \""),
    ))
}
