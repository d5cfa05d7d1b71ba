//! The root reducer produced by combining slice reducers.

use crate::combine::shape::unexpected_shape_warning;
use crate::combine::slice::{CombinedState, SliceReducer};
use crate::core::{Action, StoreError};
use crate::store::Reducer;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

struct Inner {
    reducers: Vec<(String, SliceReducer)>,
    shape_error: Option<StoreError>,
    shape_warnings: bool,
    reported_keys: Mutex<HashSet<String>>,
}

/// Slice reducers merged into one reducer over [`CombinedState`].
///
/// Built with [`combine_reducers`](crate::combine::combine_reducers). Cloning
/// is cheap and clones share the set of already reported unexpected keys.
#[derive(Clone)]
pub struct Combination {
    inner: Arc<Inner>,
}

impl Combination {
    pub(crate) fn new(
        reducers: Vec<(String, SliceReducer)>,
        shape_error: Option<StoreError>,
        shape_warnings: bool,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                reducers,
                shape_error,
                shape_warnings,
                reported_keys: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Run every slice reducer on its slice.
    ///
    /// Returns `state` itself when no slice changed identity, and a freshly
    /// allocated state holding only the reducer keys otherwise.
    pub fn reduce(
        &self,
        state: Option<CombinedState>,
        action: &Action,
    ) -> Result<CombinedState, StoreError> {
        if let Some(error) = &self.inner.shape_error {
            return Err(error.clone());
        }

        if self.inner.shape_warnings {
            self.warn_on_unexpected_shape(state.as_ref(), action);
        }

        let mut changed = false;
        let mut next = BTreeMap::new();
        for (key, reducer) in &self.inner.reducers {
            let previous = state.as_ref().and_then(|state| state.slice(key));
            let slice = reducer(previous, action)?.ok_or_else(|| {
                StoreError::SliceReturnedNothing {
                    key: key.clone(),
                    action: action.describe(),
                }
            })?;

            changed = changed || !previous.is_some_and(|previous| previous.ptr_eq(&slice));
            next.insert(key.clone(), slice);
        }

        match state {
            Some(state) if !changed => Ok(state),
            _ => Ok(CombinedState::from_slices(next)),
        }
    }

    /// The reducer shape error every call returns, if validation failed.
    pub fn shape_error(&self) -> Option<&StoreError> {
        self.inner.shape_error.as_ref()
    }

    /// Keys with a reducer, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.reducers.iter().map(|(key, _)| key.as_str())
    }

    pub fn into_reducer(self) -> Reducer<CombinedState> {
        Arc::new(move |state: Option<CombinedState>, action: &Action| self.reduce(state, action))
    }

    fn warn_on_unexpected_shape(&self, state: Option<&CombinedState>, action: &Action) {
        let keys: Vec<&str> = self.keys().collect();
        let mut reported = self
            .inner
            .reported_keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(message) = unexpected_shape_warning(state, &keys, action, &mut reported) {
            log::warn!("{message}");
        }
    }
}

impl std::fmt::Debug for Combination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Combination")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .field("shape_error", &self.inner.shape_error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::combine::{combine_reducers, CombineReducers, CombinedState};
    use crate::core::Action;
    use crate::log_capture::{at_level, capture_logs};
    use crate::store::create_store;
    use log::Level;
    use std::sync::Arc;

    fn count(state: Option<Arc<i64>>, action: &Action) -> Option<Arc<i64>> {
        let count = state.unwrap_or_default();
        Some(if action.is("INC") { Arc::new(*count + 1) } else { count })
    }

    fn counting() -> CombineReducers {
        combine_reducers().slice("count", count)
    }

    fn with_legacy_key() -> CombinedState {
        CombinedState::new()
            .with("count", 3i64)
            .with("legacy", "old".to_string())
    }

    #[test]
    fn unexpected_preloaded_key_is_warned_about_once() {
        let root = counting().shape_warnings(true).build();

        let (store, records) = capture_logs(|| {
            let store = create_store(root.into_reducer(), Some(with_legacy_key())).unwrap();
            store.dispatch(Action::new("INC")).unwrap();
            store.dispatch(Action::new("INC")).unwrap();
            store
        });

        let warnings = at_level(&records, Level::Warn);
        assert_eq!(
            warnings,
            vec![
                "Unexpected key \"legacy\" found in preloaded state passed to create_store. \
                 Expected to find one of the known reducer keys instead: \"count\". \
                 Unexpected keys will be ignored."
            ]
        );
        let state = store.get_state().unwrap();
        assert_eq!(state.get::<i64>("count").as_deref(), Some(&5));
        assert!(!state.contains_key("legacy"));
    }

    #[test]
    fn unexpected_key_in_previous_state_names_the_reducer_argument() {
        let root = counting().shape_warnings(true).build();

        let (result, records) =
            capture_logs(|| root.reduce(Some(with_legacy_key()), &Action::new("INC")));
        assert!(result.is_ok());

        let warnings = at_level(&records, Level::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with(
            "Unexpected key \"legacy\" found in previous state received by the reducer."
        ));
    }

    #[test]
    fn replace_does_not_warn_about_dropped_keys() {
        let before = combine_reducers()
            .slice("count", count)
            .slice("legacy", |state: Option<Arc<String>>, _action: &Action| {
                state.or_else(|| Some(Arc::new("old".to_string())))
            })
            .shape_warnings(false)
            .build();
        let store = create_store(before.into_reducer(), None).unwrap();
        let after = counting().shape_warnings(true).build();

        let (_, records) = capture_logs(|| {
            store.replace_reducer(after.into_reducer()).unwrap();
            store.dispatch(Action::new("INC")).unwrap();
        });

        assert!(at_level(&records, Level::Warn).is_empty());
        let state = store.get_state().unwrap();
        assert_eq!(state.keys().collect::<Vec<_>>(), vec!["count"]);
    }

    #[test]
    fn warnings_stay_silent_when_disabled() {
        let root = counting().shape_warnings(false).build();

        let (_, records) =
            capture_logs(|| root.reduce(Some(with_legacy_key()), &Action::new("INC")));

        assert!(at_level(&records, Level::Warn).is_empty());
    }
}
