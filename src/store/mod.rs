//! The store: a single mutable cell of state changed only by dispatching
//! actions through a reducer.
//!
//! ## Dispatch cycle
//!
//! 1. The action passes through the middleware chain, if any
//! 2. The root reducer computes the next state (`Dispatching` phase)
//! 3. The state is committed, the phase returns to `Idle` and the listener
//!    snapshot is published, all under one lock
//! 4. Listeners run in registration order
//!
//! Inside a running reducer, reading state, dispatching and changing
//! listeners all fail. Listeners themselves run outside that phase and may
//! dispatch. A dispatch from another thread waits its turn.

mod builder;
mod listeners;
mod machine;
mod observable;
mod reducer;

pub use builder::StoreBuilder;
pub use listeners::{Listener, Subscription};
pub use machine::{
    create_store, create_store_with, Dispatch, DispatchPhase, DispatchResult, Enhancer, Store,
    StoreCreator,
};
pub use observable::{InteropObservable, Observer, StateObservable};
pub use reducer::{reducer, try_reducer, Reducer};

pub(crate) use machine::DispatchSlot;
