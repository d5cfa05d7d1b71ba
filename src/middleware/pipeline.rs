//! Building the middleware chain around a store's dispatch.

use crate::core::{compose, Action, Composable, StoreError};
use crate::middleware::Middleware;
use crate::store::{Dispatch, DispatchResult, DispatchSlot, Enhancer, Reducer, Store, StoreCreator};
use std::sync::{Arc, Weak};

/// What middleware can do with the store: read state and dispatch.
///
/// `dispatch` goes through the complete middleware chain, including the
/// middleware holding this handle. The handle does not keep the store alive;
/// once every store handle is gone, dispatching fails with
/// [`StoreError::StoreDropped`].
pub struct MiddlewareApi<S> {
    store: Store<S>,
    dispatch: Weak<DispatchSlot>,
}

impl<S> Clone for MiddlewareApi<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            dispatch: Weak::clone(&self.dispatch),
        }
    }
}

impl<S: Clone + Send + Sync + 'static> MiddlewareApi<S> {
    pub fn get_state(&self) -> Result<S, StoreError> {
        self.store.get_state()
    }

    pub fn dispatch(&self, action: Action) -> DispatchResult {
        let dispatch = self
            .dispatch
            .upgrade()
            .map(|slot| slot.current())
            .ok_or(StoreError::StoreDropped)?;
        dispatch(action)
    }
}

/// Build a store enhancer running every dispatch through `middlewares`, the
/// first one outermost.
///
/// # Example
///
/// ```rust
/// use statecell::core::Action;
/// use statecell::middleware::{apply_middleware, middleware};
/// use statecell::store::{create_store_with, reducer};
///
/// let double_step = middleware(|_api, next, action: Action| {
///     if action.is("INC") {
///         next(action.clone())?;
///     }
///     next(action)
/// });
///
/// let store = create_store_with(
///     reducer(|state: Option<i64>, action: &Action| {
///         state.unwrap_or(0) + i64::from(action.is("INC"))
///     }),
///     None,
///     apply_middleware(vec![double_step]),
/// )
/// .unwrap();
///
/// store.dispatch(Action::new("INC")).unwrap();
/// assert_eq!(store.get_state().unwrap(), 2);
/// ```
pub fn apply_middleware<S>(middlewares: Vec<Arc<dyn Middleware<S>>>) -> Enhancer<S>
where
    S: Clone + Send + Sync + 'static,
{
    Arc::new(move |create: StoreCreator<S>| -> StoreCreator<S> {
        let middlewares = middlewares.clone();
        Arc::new(move |reducer: Reducer<S>, preloaded_state: Option<S>| -> Result<Store<S>, StoreError> {
            let store = create(reducer, preloaded_state)?;

            let placeholder: Dispatch = Arc::new(|_action: Action| -> DispatchResult {
                Err(StoreError::DispatchDuringMiddlewareConstruction)
            });
            let slot = Arc::new(DispatchSlot::new(placeholder));
            let api = MiddlewareApi {
                store: store.clone(),
                dispatch: Arc::downgrade(&slot),
            };

            let mut links = Vec::with_capacity(middlewares.len());
            for middleware in &middlewares {
                middleware.init(&api)?;
                links.push(link(Arc::clone(middleware), api.clone()));
            }

            slot.replace(compose(links)(store.dispatcher()));
            log::debug!("applied {} middleware to store", middlewares.len());

            Ok(store.with_dispatch_slot(slot))
        })
    })
}

fn link<S>(middleware: Arc<dyn Middleware<S>>, api: MiddlewareApi<S>) -> Composable<Dispatch>
where
    S: Clone + Send + Sync + 'static,
{
    Arc::new(move |next: Dispatch| -> Dispatch {
        let middleware = Arc::clone(&middleware);
        let api = api.clone();
        Arc::new(move |action: Action| middleware.handle(&api, &next, action))
    })
}
