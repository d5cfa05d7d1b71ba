//! Minimal observable view of a store's state.

use crate::core::StoreError;
use crate::store::listeners::Subscription;
use crate::store::machine::Store;
use std::sync::Arc;

/// Receives state snapshots from a [`StateObservable`].
///
/// `next` defaults to doing nothing, so an observer that only cares about
/// being registered is valid. Closures taking `&S` are observers.
pub trait Observer<S>: Send + Sync {
    fn next(&self, _state: &S) {}
}

impl<S, F> Observer<S> for F
where
    F: Fn(&S) + Send + Sync,
{
    fn next(&self, state: &S) {
        self(state)
    }
}

/// Types that can hand out an observable of a store's state.
pub trait InteropObservable<S> {
    fn observable(&self) -> StateObservable<S>;
}

/// Pushes the current state to observers, then every new state after each
/// dispatch.
///
/// # Example
///
/// ```rust
/// use statecell::core::Action;
/// use statecell::store::{create_store, reducer, InteropObservable};
/// use std::sync::{Arc, Mutex};
///
/// let store = create_store(
///     reducer(|state: Option<i64>, action: &Action| {
///         state.unwrap_or(0) + i64::from(action.is("INC"))
///     }),
///     None,
/// )
/// .unwrap();
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// store
///     .observable()
///     .subscribe(move |state: &i64| sink.lock().unwrap().push(*state))
///     .unwrap();
///
/// store.dispatch(Action::new("INC")).unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
/// ```
pub struct StateObservable<S> {
    store: Store<S>,
}

impl<S> Clone for StateObservable<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: Clone + Send + Sync + 'static> StateObservable<S> {
    /// Deliver the current state to `observer` right away and again after
    /// every dispatch until the subscription is cancelled.
    pub fn subscribe<O>(&self, observer: O) -> Result<Subscription, StoreError>
    where
        O: Observer<S> + 'static,
    {
        let observer = Arc::new(observer);
        let shared = self.store.shared();
        let emit = move || {
            if let Some(shared) = shared.upgrade() {
                if let Ok(state) = shared.get_state() {
                    observer.next(&state);
                }
            }
        };

        emit();
        self.store.subscribe(emit)
    }
}

impl<S: Clone + Send + Sync + 'static> InteropObservable<S> for Store<S> {
    fn observable(&self) -> StateObservable<S> {
        StateObservable {
            store: self.clone(),
        }
    }
}

impl<S: Clone + Send + Sync + 'static> InteropObservable<S> for StateObservable<S> {
    fn observable(&self) -> StateObservable<S> {
        self.clone()
    }
}
