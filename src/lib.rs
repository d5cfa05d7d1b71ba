//! Statecell: a predictable state container
//!
//! All application state lives in one [`Store`]. The only way to change it
//! is to dispatch an [`Action`], a plain record describing what happened.
//! A pure reducer computes the next state from the previous one and the
//! action, and every subscribed listener is told once the new state is in
//! place.
//!
//! # Core Concepts
//!
//! - **Actions**: plain records with a `type`, see [`core::Action`]
//! - **Reducers**: `(state, action) -> state`, see [`store::reducer`]
//! - **Combined reducers**: one reducer per state slice, see [`combine`]
//! - **Middleware**: wrap dispatch to log, rewrite or defer actions, see [`middleware`]
//!
//! # Example
//!
//! ```rust
//! use statecell::combine::combine_reducers;
//! use statecell::core::Action;
//! use statecell::middleware::{apply_middleware, LoggerMiddleware, Middleware};
//! use statecell::store::StoreBuilder;
//! use std::sync::Arc;
//!
//! let root = combine_reducers()
//!     .slice("count", |state: Option<Arc<i64>>, action: &Action| {
//!         let count = state.unwrap_or_default();
//!         Some(match action.kind() {
//!             Some("INC") => Arc::new(*count + 1),
//!             Some("DEC") => Arc::new(*count - 1),
//!             _ => count,
//!         })
//!     })
//!     .build();
//!
//! let logger: Arc<dyn Middleware<_>> = Arc::new(LoggerMiddleware::new());
//! let store = StoreBuilder::new(root.into_reducer())
//!     .enhancer(apply_middleware(vec![logger]))
//!     .build()
//!     .unwrap();
//!
//! store.dispatch(Action::new("INC")).unwrap();
//! store.dispatch(Action::new("INC")).unwrap();
//! store.dispatch(Action::new("DEC")).unwrap();
//!
//! let state = store.get_state().unwrap();
//! assert_eq!(state.get::<i64>("count").as_deref(), Some(&1));
//! ```

mod macros;

#[cfg(test)]
mod log_capture;

pub mod bind;
pub mod combine;
pub mod core;
pub mod middleware;
pub mod store;

// Re-export commonly used types
pub use crate::core::{compose, Action, StoreError};
pub use combine::{combine_reducers, CombinedState};
pub use middleware::{apply_middleware, Middleware};
pub use store::{create_store, create_store_with, Store, StoreBuilder};
