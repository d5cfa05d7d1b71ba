//! Middleware for the store's dispatch.
//!
//! Middleware sits between `dispatch` and the root reducer:
//!
//! ```text
//! dispatch → m1 → m2 → … → raw dispatch → reducer → listeners
//! ```
//!
//! Each middleware can:
//! - Inspect the action and the current state
//! - Rewrite the action before passing it on
//! - Short-circuit by not calling `next`
//! - Dispatch new actions through the whole chain
//!
//! ## Example
//!
//! ```rust
//! use statecell::core::Action;
//! use statecell::middleware::{apply_middleware, middleware};
//! use statecell::store::{reducer, StoreBuilder};
//!
//! let drop_noise = middleware(|_api, next, action: Action| {
//!     if action.is("NOISE") {
//!         Ok(action)
//!     } else {
//!         next(action)
//!     }
//! });
//!
//! let store = StoreBuilder::new(reducer(|state: Option<u32>, _action: &Action| {
//!     state.unwrap_or(0) + 1
//! }))
//! .enhancer(apply_middleware(vec![drop_noise]))
//! .build()
//! .unwrap();
//!
//! store.dispatch(Action::new("NOISE")).unwrap();
//! store.dispatch(Action::new("SIGNAL")).unwrap();
//! assert_eq!(store.get_state().unwrap(), 2);
//! ```

mod logger;
mod pipeline;

pub use logger::{LoggerBuilder, LoggerMiddleware};
pub use pipeline::{apply_middleware, MiddlewareApi};

use crate::core::{Action, StoreError};
use crate::store::{Dispatch, DispatchResult};
use std::sync::Arc;

/// A link in the dispatch chain.
///
/// `init` runs once while the enhanced store is being built; dispatching
/// from it fails with
/// [`StoreError::DispatchDuringMiddlewareConstruction`]. `handle` runs for
/// every dispatched action, with `next` being the rest of the chain.
pub trait Middleware<S>: Send + Sync {
    fn init(&self, _api: &MiddlewareApi<S>) -> Result<(), StoreError> {
        Ok(())
    }

    fn handle(&self, api: &MiddlewareApi<S>, next: &Dispatch, action: Action) -> DispatchResult;
}

impl<S, F> Middleware<S> for F
where
    F: Fn(&MiddlewareApi<S>, &Dispatch, Action) -> DispatchResult + Send + Sync,
{
    fn handle(&self, api: &MiddlewareApi<S>, next: &Dispatch, action: Action) -> DispatchResult {
        self(api, next, action)
    }
}

/// Turn a closure into middleware.
pub fn middleware<S, F>(handle: F) -> Arc<dyn Middleware<S>>
where
    S: 'static,
    F: Fn(&MiddlewareApi<S>, &Dispatch, Action) -> DispatchResult + Send + Sync + 'static,
{
    Arc::new(handle)
}
