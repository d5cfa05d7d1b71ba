//! Binding action creators to a dispatch function.

use crate::core::Action;
use crate::store::{Dispatch, DispatchResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Builds an action from its argument.
pub type ActionCreator<A> = Arc<dyn Fn(A) -> Action + Send + Sync>;

/// An action creator that dispatches what it creates.
pub type BoundActionCreator<A> = Arc<dyn Fn(A) -> DispatchResult + Send + Sync>;

/// Bind one action creator.
///
/// # Example
///
/// ```rust
/// use statecell::bind::{bind_action_creator, ActionCreator};
/// use statecell::core::Action;
/// use statecell::store::{create_store, reducer};
/// use std::sync::Arc;
///
/// let store = create_store(
///     reducer(|state: Option<i64>, action: &Action| {
///         let by = action.payload().and_then(|by| by.as_i64()).unwrap_or(0);
///         state.unwrap_or(0) + by
///     }),
///     None,
/// )
/// .unwrap();
///
/// let add: ActionCreator<i64> = Arc::new(|by: i64| Action::new("ADD").with_payload(by));
/// let add = bind_action_creator(add, store.dispatcher());
///
/// add(3).unwrap();
/// add(4).unwrap();
/// assert_eq!(store.get_state().unwrap(), 7);
/// ```
pub fn bind_action_creator<A: 'static>(
    creator: ActionCreator<A>,
    dispatch: Dispatch,
) -> BoundActionCreator<A> {
    Arc::new(move |argument: A| dispatch(creator(argument)))
}

/// Bind every action creator in a map, keeping the keys.
pub fn bind_action_creators<A: 'static>(
    creators: HashMap<String, ActionCreator<A>>,
    dispatch: Dispatch,
) -> HashMap<String, BoundActionCreator<A>> {
    creators
        .into_iter()
        .map(|(name, creator)| (name, bind_action_creator(creator, Arc::clone(&dispatch))))
        .collect()
}
