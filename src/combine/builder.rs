//! Builder for combined reducers.

use crate::combine::combination::Combination;
use crate::combine::shape::assert_reducer_shapes;
use crate::combine::slice::{erase, CombinedState, SliceReducer};
use crate::core::{Action, StoreError};
use std::any::Any;
use std::sync::Arc;

/// A typed slice reducer. `None` means "no value" and is never a valid
/// result.
pub type SliceFn<T> = Arc<dyn Fn(Option<Arc<T>>, &Action) -> Option<Arc<T>> + Send + Sync>;

/// Start combining slice reducers.
pub fn combine_reducers() -> CombineReducers {
    CombineReducers::new()
}

/// Builder for a [`Combination`] with a fluent API.
///
/// Every slice reducer receives only its own slice and must return its
/// initial state when handed `None`, for any action.
///
/// # Example
///
/// ```rust
/// use statecell::combine::combine_reducers;
/// use statecell::core::Action;
/// use statecell::store::create_store;
/// use std::sync::Arc;
///
/// let root = combine_reducers()
///     .slice("count", |state: Option<Arc<i64>>, action: &Action| {
///         let count = state.unwrap_or_default();
///         Some(if action.is("INC") { Arc::new(*count + 1) } else { count })
///     })
///     .build();
///
/// let store = create_store(root.into_reducer(), None).unwrap();
/// store.dispatch(Action::new("INC")).unwrap();
///
/// let state = store.get_state().unwrap();
/// assert_eq!(state.get::<i64>("count").as_deref(), Some(&1));
/// ```
pub struct CombineReducers {
    entries: Vec<(String, Option<SliceReducer>)>,
    shape_warnings: bool,
}

impl CombineReducers {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            shape_warnings: cfg!(debug_assertions),
        }
    }

    /// Add a slice reducer under `key`.
    pub fn slice<T, F>(self, key: impl Into<String>, reduce: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(Option<Arc<T>>, &Action) -> Option<Arc<T>> + Send + Sync + 'static,
    {
        self.try_slice(key, move |state: Option<Arc<T>>, action: &Action| {
            Ok(reduce(state, action))
        })
    }

    /// Add a slice reducer that can fail.
    pub fn try_slice<T, F>(mut self, key: impl Into<String>, reduce: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(Option<Arc<T>>, &Action) -> Result<Option<Arc<T>>, StoreError>
            + Send
            + Sync
            + 'static,
    {
        let key = key.into();
        let reducer = erase(&key, reduce);
        self.insert(key, Some(reducer));
        self
    }

    /// Declare a key whose reducer may be missing. A missing reducer is
    /// reported and the key is left out of the combination.
    pub fn optional_slice<T>(mut self, key: impl Into<String>, reduce: Option<SliceFn<T>>) -> Self
    where
        T: Any + Send + Sync,
    {
        let key = key.into();
        let reducer = reduce.map(|reduce| {
            erase(&key, move |state: Option<Arc<T>>, action: &Action| {
                Ok(reduce(state, action))
            })
        });
        self.insert(key, reducer);
        self
    }

    /// Nest another combination; its state lives under `key`.
    pub fn nest(self, key: impl Into<String>, combination: Combination) -> Self {
        self.try_slice(key, move |state: Option<Arc<CombinedState>>, action: &Action| {
            let next = combination.reduce(state.as_deref().cloned(), action)?;
            Ok(Some(match state {
                Some(previous) if previous.ptr_eq(&next) => previous,
                _ => Arc::new(next),
            }))
        })
    }

    /// Emit advisory shape warnings. Defaults to on in debug builds.
    pub fn shape_warnings(mut self, enabled: bool) -> Self {
        self.shape_warnings = enabled;
        self
    }

    /// Build the combination, validating every slice reducer once.
    ///
    /// Validation failures are not returned here; the combination returns
    /// them from every call instead.
    pub fn build(self) -> Combination {
        let mut reducers = Vec::with_capacity(self.entries.len());
        for (key, reducer) in self.entries {
            match reducer {
                Some(reducer) => reducers.push((key, reducer)),
                None if self.shape_warnings => log::warn!("No reducer provided for key \"{key}\""),
                None => {}
            }
        }

        let shape_error = assert_reducer_shapes(&reducers).err();
        if let Some(error) = &shape_error {
            log::debug!("combined reducer failed shape validation: {error}");
        }

        Combination::new(reducers, shape_error, self.shape_warnings)
    }

    // A repeated key keeps its first position and takes the latest reducer.
    fn insert(&mut self, key: String, reducer: Option<SliceReducer>) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = reducer,
            None => self.entries.push((key, reducer)),
        }
    }
}

impl Default for CombineReducers {
    fn default() -> Self {
        Self::new()
    }
}
