//! The store and its dispatch state machine.

use crate::core::{Action, Composable, StoreError};
use crate::store::listeners::{
    Entry, Listener, ListenerHost, ListenerId, ListenerRegistry, Subscription,
};
use crate::store::reducer::Reducer;
use serde_json::Value;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::thread::{self, ThreadId};

/// Outcome of a dispatch: the dispatched action on success.
pub type DispatchResult = Result<Action, StoreError>;

/// A dispatch function, raw or wrapped by middleware.
pub type Dispatch = Arc<dyn Fn(Action) -> DispatchResult + Send + Sync>;

/// Builds a store from a root reducer and optional preloaded state.
pub type StoreCreator<S> =
    Arc<dyn Fn(Reducer<S>, Option<S>) -> Result<Store<S>, StoreError> + Send + Sync>;

/// Turns a store creator into an augmented one with the same signature.
///
/// Several enhancers are combined with [`compose`](crate::core::compose)
/// before being handed to the store.
pub type Enhancer<S> = Composable<StoreCreator<S>>;

/// Whether a reducer is currently running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchPhase {
    Idle,
    Dispatching,
}

struct Core<S> {
    state: S,
    reducer: Reducer<S>,
    listeners: ListenerRegistry,
    /// Thread whose reducer is running, if any.
    dispatcher: Option<ThreadId>,
}

impl<S> Core<S> {
    fn phase(&self) -> DispatchPhase {
        match self.dispatcher {
            Some(_) => DispatchPhase::Dispatching,
            None => DispatchPhase::Idle,
        }
    }

    /// True while the calling thread is inside the reducer.
    fn reducing_here(&self) -> bool {
        self.dispatcher == Some(thread::current().id())
    }
}

pub(crate) struct Shared<S> {
    core: Mutex<Core<S>>,
    /// Signalled whenever a dispatch leaves the reducer.
    turn: Condvar,
}

/// Owns the store's single dispatch turn for the length of one reducer call.
///
/// [`ReducerTurn::commit`] stores the next state and releases the turn under
/// the same lock. Dropping the turn uncommitted, on a reducer error or an
/// unwind, only releases it.
struct ReducerTurn<'a, S> {
    shared: &'a Shared<S>,
    committed: bool,
}

impl<S> ReducerTurn<'_, S> {
    fn commit(mut self, next: S) -> Arc<Vec<Entry>> {
        self.committed = true;
        let listeners = {
            let mut core = self.shared.lock();
            core.state = next;
            core.dispatcher = None;
            core.listeners.publish()
        };
        self.shared.turn.notify_all();
        listeners
    }
}

impl<S> Drop for ReducerTurn<'_, S> {
    fn drop(&mut self) {
        if !self.committed {
            self.shared.lock().dispatcher = None;
            self.shared.turn.notify_all();
        }
    }
}

impl<S> Shared<S> {
    // No lock is ever held while user code runs, so a poisoned lock still
    // guards consistent data.
    fn lock(&self) -> MutexGuard<'_, Core<S>> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the dispatch turn, waiting while another thread's reducer runs.
    fn acquire_turn(&self) -> Result<(ReducerTurn<'_, S>, Reducer<S>, S), StoreError>
    where
        S: Clone,
    {
        let current = thread::current().id();
        let mut core = self.lock();
        while let Some(owner) = core.dispatcher {
            if owner == current {
                return Err(StoreError::ReducerDispatch);
            }
            core = self
                .turn
                .wait(core)
                .unwrap_or_else(PoisonError::into_inner);
        }
        let reducer = Arc::clone(&core.reducer);
        let previous = core.state.clone();
        core.dispatcher = Some(current);
        drop(core);

        let turn = ReducerTurn {
            shared: self,
            committed: false,
        };
        Ok((turn, reducer, previous))
    }
}

impl<S: Clone + Send + Sync + 'static> Shared<S> {
    pub(crate) fn get_state(&self) -> Result<S, StoreError> {
        let core = self.lock();
        if core.reducing_here() {
            return Err(StoreError::GetStateWhileDispatching);
        }
        Ok(core.state.clone())
    }

    fn dispatch(&self, action: Action) -> DispatchResult {
        let (turn, reducer, previous) = self.acquire_turn()?;

        log::trace!("dispatching {}", action.action_type());
        let next = reducer(Some(previous), &action)?;

        let listeners = turn.commit(next);
        for entry in listeners.iter() {
            (entry.callback)();
        }

        Ok(action)
    }

    fn subscribe(&self, listener: Listener) -> Result<ListenerId, StoreError> {
        let mut core = self.lock();
        if core.reducing_here() {
            return Err(StoreError::SubscribeWhileDispatching);
        }
        let id = core.listeners.add(listener);
        log::trace!("listener {id} subscribed ({} registered)", core.listeners.len());
        Ok(id)
    }

    fn replace_reducer(&self, reducer: Reducer<S>) -> Result<(), StoreError> {
        self.lock().reducer = reducer;
        log::debug!("reducer replaced, re-initializing state");
        self.dispatch(Action::replace()).map(|_| ())
    }

    fn phase(&self) -> DispatchPhase {
        self.lock().phase()
    }
}

impl<S: Send> ListenerHost for Shared<S> {
    fn remove_listener(&self, id: ListenerId) -> Result<(), StoreError> {
        let mut core = self.lock();
        if core.reducing_here() {
            return Err(StoreError::UnsubscribeWhileDispatching);
        }
        core.listeners.remove(id);
        Ok(())
    }
}

/// Late-bound slot holding the dispatch function a store hands out.
pub(crate) struct DispatchSlot {
    current: RwLock<Dispatch>,
}

impl DispatchSlot {
    pub(crate) fn new(dispatch: Dispatch) -> Self {
        Self {
            current: RwLock::new(dispatch),
        }
    }

    pub(crate) fn current(&self) -> Dispatch {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub(crate) fn replace(&self, dispatch: Dispatch) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = dispatch;
    }
}

/// A predictable state container.
///
/// State only changes through [`Store::dispatch`], which runs the root
/// reducer and then notifies every listener. `Store` is a cheap handle;
/// clones share the same state.
///
/// Handles may be used from several threads. Only one reducer runs at a
/// time: a dispatch from another thread waits for the running reducer to
/// commit its state before reading it. The dispatching-state errors
/// ([`StoreError::ReducerDispatch`], [`StoreError::GetStateWhileDispatching`]
/// and the subscription ones) are only reported to the thread whose reducer
/// is running. Other threads reading state meanwhile see the last committed
/// snapshot.
///
/// # Example
///
/// ```rust
/// use statecell::core::Action;
/// use statecell::store::{create_store, reducer};
///
/// let counter = reducer(|state: Option<i64>, action: &Action| {
///     let count = state.unwrap_or(0);
///     if action.is("INC") { count + 1 } else { count }
/// });
///
/// let store = create_store(counter, None).unwrap();
/// store.dispatch(Action::new("INC")).unwrap();
/// store.dispatch(Action::new("INC")).unwrap();
///
/// assert_eq!(store.get_state().unwrap(), 2);
/// ```
pub struct Store<S> {
    shared: Arc<Shared<S>>,
    dispatch: Arc<DispatchSlot>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            dispatch: Arc::clone(&self.dispatch),
        }
    }
}

impl<S: Clone + Send + Sync + 'static> Store<S> {
    /// Current state snapshot.
    ///
    /// Fails with [`StoreError::GetStateWhileDispatching`] while a reducer runs.
    pub fn get_state(&self) -> Result<S, StoreError> {
        self.shared.get_state()
    }

    /// Dispatch an action through the middleware chain, if any, into the
    /// root reducer. Returns the dispatched action.
    pub fn dispatch(&self, action: Action) -> DispatchResult {
        let dispatch = self.dispatch.current();
        dispatch(action)
    }

    /// Dispatch a dynamic value after checking it is a plain record with a
    /// defined `type`.
    pub fn dispatch_value(&self, value: Value) -> DispatchResult {
        self.dispatch(Action::from_value(value)?)
    }

    /// Register a listener for every future dispatch.
    pub fn subscribe<F>(&self, listener: F) -> Result<Subscription, StoreError>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.shared.subscribe(Arc::new(listener))?;
        let host: Arc<dyn ListenerHost> = self.shared.clone();
        Ok(Subscription::new(id, Arc::downgrade(&host)))
    }

    /// Swap the root reducer and let it initialize any new state.
    pub fn replace_reducer(&self, reducer: Reducer<S>) -> Result<(), StoreError> {
        self.shared.replace_reducer(reducer)
    }

    /// The dispatch function this store currently hands out.
    pub fn dispatcher(&self) -> Dispatch {
        self.dispatch.current()
    }

    pub fn is_dispatching(&self) -> bool {
        self.shared.phase() == DispatchPhase::Dispatching
    }

    pub(crate) fn shared(&self) -> Weak<Shared<S>> {
        Arc::downgrade(&self.shared)
    }

    /// A handle sharing this store's state but dispatching through `slot`.
    pub(crate) fn with_dispatch_slot(&self, slot: Arc<DispatchSlot>) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            dispatch: slot,
        }
    }
}

/// Create a store, seeding its state with the reducer's initial state.
///
/// `preloaded_state` is handed to the reducer on initialization instead of
/// `None`.
pub fn create_store<S: Clone + Send + Sync + 'static>(
    reducer: Reducer<S>,
    preloaded_state: Option<S>,
) -> Result<Store<S>, StoreError> {
    let state = reducer(preloaded_state, &Action::init())?;
    let shared = Arc::new(Shared {
        core: Mutex::new(Core {
            state,
            reducer,
            listeners: ListenerRegistry::new(),
            dispatcher: None,
        }),
        turn: Condvar::new(),
    });

    let raw: Dispatch = {
        let shared = Arc::clone(&shared);
        Arc::new(move |action: Action| shared.dispatch(action))
    };

    Ok(Store {
        shared,
        dispatch: Arc::new(DispatchSlot::new(raw)),
    })
}

/// Create a store through an enhancer, such as one built by
/// [`apply_middleware`](crate::middleware::apply_middleware).
pub fn create_store_with<S: Clone + Send + Sync + 'static>(
    reducer: Reducer<S>,
    preloaded_state: Option<S>,
    enhancer: Enhancer<S>,
) -> Result<Store<S>, StoreError> {
    let creator: StoreCreator<S> = Arc::new(create_store::<S>);
    enhancer(creator)(reducer, preloaded_state)
}
