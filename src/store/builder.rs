//! Fluent construction of stores.

use crate::core::StoreError;
use crate::store::machine::{create_store, create_store_with, Enhancer, Store};
use crate::store::reducer::Reducer;

/// Builder for stores with optional preloaded state and enhancer.
///
/// # Example
///
/// ```rust
/// use statecell::core::Action;
/// use statecell::store::{reducer, StoreBuilder};
///
/// let store = StoreBuilder::new(reducer(|state: Option<i64>, _action: &Action| {
///     state.unwrap_or(0)
/// }))
/// .preloaded_state(5)
/// .build()
/// .unwrap();
///
/// assert_eq!(store.get_state().unwrap(), 5);
/// ```
pub struct StoreBuilder<S> {
    reducer: Reducer<S>,
    preloaded_state: Option<S>,
    enhancers: Vec<Enhancer<S>>,
}

impl<S: Clone + Send + Sync + 'static> StoreBuilder<S> {
    pub fn new(reducer: Reducer<S>) -> Self {
        Self {
            reducer,
            preloaded_state: None,
            enhancers: Vec::new(),
        }
    }

    /// State handed to the reducer on initialization.
    pub fn preloaded_state(mut self, state: S) -> Self {
        self.preloaded_state = Some(state);
        self
    }

    /// Set the store enhancer.
    ///
    /// Only one enhancer is accepted; compose several with
    /// [`compose`](crate::core::compose) first. Setting a second one makes
    /// [`build`](Self::build) fail.
    pub fn enhancer(mut self, enhancer: Enhancer<S>) -> Self {
        self.enhancers.push(enhancer);
        self
    }

    /// Build the store.
    /// Returns an error if several enhancers were given or the reducer
    /// fails to initialize.
    pub fn build(self) -> Result<Store<S>, StoreError> {
        let mut enhancers = self.enhancers.into_iter();
        match (enhancers.next(), enhancers.next()) {
            (None, _) => create_store(self.reducer, self.preloaded_state),
            (Some(enhancer), None) => {
                create_store_with(self.reducer, self.preloaded_state, enhancer)
            }
            (Some(_), Some(_)) => Err(StoreError::MultipleEnhancers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Action;
    use crate::store::machine::StoreCreator;
    use crate::store::reducer::reducer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> Reducer<i64> {
        reducer(|state: Option<i64>, action: &Action| {
            state.unwrap_or(0) + i64::from(action.is("INC"))
        })
    }

    fn counting_enhancer(calls: &Arc<AtomicUsize>) -> Enhancer<i64> {
        let calls = Arc::clone(calls);
        Arc::new(move |create: StoreCreator<i64>| -> StoreCreator<i64> {
            let calls = Arc::clone(&calls);
            Arc::new(move |reducer, preloaded| {
                calls.fetch_add(1, Ordering::SeqCst);
                create(reducer, preloaded)
            })
        })
    }

    #[test]
    fn builds_plain_store() {
        let store = StoreBuilder::new(counter()).build().unwrap();
        store.dispatch(Action::new("INC")).unwrap();
        assert_eq!(store.get_state().unwrap(), 1);
    }

    #[test]
    fn enhancer_wraps_creation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let store = StoreBuilder::new(counter())
            .preloaded_state(3)
            .enhancer(counting_enhancer(&calls))
            .build()
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.get_state().unwrap(), 3);
    }

    #[test]
    fn rejects_several_enhancers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let result = StoreBuilder::new(counter())
            .enhancer(counting_enhancer(&calls))
            .enhancer(counting_enhancer(&calls))
            .build();

        assert!(matches!(result, Err(StoreError::MultipleEnhancers)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
