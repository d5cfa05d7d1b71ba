//! Root reducer type and constructors.

use crate::core::{Action, StoreError};
use std::sync::Arc;

/// A root reducer: `(state, action) -> next state`.
///
/// `None` means the state is not defined yet, which only happens on the
/// initialization action of a store created without preloaded state. The
/// reducer must then return its initial state.
pub type Reducer<S> = Arc<dyn Fn(Option<S>, &Action) -> Result<S, StoreError> + Send + Sync>;

/// Wrap an infallible reducer function.
///
/// # Example
///
/// ```rust
/// use statecell::store::reducer;
/// use statecell::core::Action;
///
/// let counter = reducer(|state: Option<i64>, action: &Action| {
///     let count = state.unwrap_or(0);
///     if action.is("INC") { count + 1 } else { count }
/// });
///
/// assert_eq!(counter(None, &Action::new("INC")).unwrap(), 1);
/// ```
pub fn reducer<S, F>(reduce: F) -> Reducer<S>
where
    S: 'static,
    F: Fn(Option<S>, &Action) -> S + Send + Sync + 'static,
{
    Arc::new(move |state: Option<S>, action: &Action| Ok(reduce(state, action)))
}

/// Wrap a reducer that can fail.
pub fn try_reducer<S, F>(reduce: F) -> Reducer<S>
where
    S: 'static,
    F: Fn(Option<S>, &Action) -> Result<S, StoreError> + Send + Sync + 'static,
{
    Arc::new(reduce)
}
