//! Type-erased state slices and the combined state mapping.

use crate::core::{Action, StoreError};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A slice reducer after its value type has been erased.
pub(crate) type SliceReducer =
    Arc<dyn Fn(Option<&Slice>, &Action) -> Result<Option<Slice>, StoreError> + Send + Sync>;

/// One reference-counted slice of combined state.
///
/// Two slices are the same value when they point at the same allocation; a
/// slice reducer signals "unchanged" by handing back the `Arc` it received.
#[derive(Clone)]
pub struct Slice(Arc<dyn Any + Send + Sync>);

impl Slice {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Wrap an existing `Arc`, keeping its identity.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self(value)
    }

    /// The slice as `Arc<T>`, sharing the allocation.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.0).downcast::<T>().ok()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    pub fn ptr_eq(&self, other: &Slice) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
    }
}

impl fmt::Debug for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Slice(..)")
    }
}

/// State of a combined reducer: slice key to slice value.
///
/// Cloning is cheap and keeps identity, which is how the combined reducer
/// reports "nothing changed".
///
/// # Example
///
/// ```rust
/// use statecell::combine::CombinedState;
///
/// let state = CombinedState::new()
///     .with("count", 3_i64)
///     .with("name", String::from("todos"));
///
/// assert_eq!(state.get::<i64>("count").as_deref(), Some(&3));
/// assert!(state.get::<i64>("name").is_none());
/// assert_eq!(state.keys().collect::<Vec<_>>(), vec!["count", "name"]);
/// ```
#[derive(Clone, Default)]
pub struct CombinedState {
    slices: Arc<BTreeMap<String, Slice>>,
}

impl CombinedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_slices(slices: BTreeMap<String, Slice>) -> Self {
        Self {
            slices: Arc::new(slices),
        }
    }

    /// Add or replace a slice. Used to build preloaded state.
    pub fn with<T: Any + Send + Sync>(self, key: impl Into<String>, value: T) -> Self {
        self.with_slice(key, Slice::new(value))
    }

    pub fn with_slice(mut self, key: impl Into<String>, slice: Slice) -> Self {
        Arc::make_mut(&mut self.slices).insert(key.into(), slice);
        self
    }

    /// Typed access to a slice; `None` when absent or of another type.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.slice(key).and_then(Slice::downcast::<T>)
    }

    pub fn slice(&self, key: &str) -> Option<&Slice> {
        self.slices.get(key)
    }

    /// State of a nested combined reducer.
    pub fn nested(&self, key: &str) -> Option<Arc<CombinedState>> {
        self.get::<CombinedState>(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.slices.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Whether both handles are the very same state value.
    pub fn ptr_eq(&self, other: &CombinedState) -> bool {
        Arc::ptr_eq(&self.slices, &other.slices)
    }
}

impl fmt::Debug for CombinedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.slices.iter()).finish()
    }
}

/// Erase a typed slice reducer. `key` is only used in error reports.
pub(crate) fn erase<T, F>(key: &str, reduce: F) -> SliceReducer
where
    T: Any + Send + Sync,
    F: Fn(Option<Arc<T>>, &Action) -> Result<Option<Arc<T>>, StoreError> + Send + Sync + 'static,
{
    let key = key.to_string();
    Arc::new(
        move |previous: Option<&Slice>, action: &Action| -> Result<Option<Slice>, StoreError> {
            let previous = match previous {
                Some(slice) => Some(slice.downcast::<T>().ok_or_else(|| {
                    StoreError::SliceTypeMismatch {
                        key: key.clone(),
                        expected: std::any::type_name::<T>(),
                    }
                })?),
                None => None,
            };
            Ok(reduce(previous, action)?.map(Slice::from_arc))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_arc_keeps_identity() {
        let value = Arc::new(5_i64);
        let first = Slice::from_arc(Arc::clone(&value));
        let second = Slice::from_arc(value);
        assert!(first.ptr_eq(&second));
        assert!(!first.ptr_eq(&Slice::new(5_i64)));
    }

    #[test]
    fn downcast_shares_allocation() {
        let slice = Slice::new(String::from("todo"));
        let value = slice.downcast::<String>().unwrap();
        assert!(slice.ptr_eq(&Slice::from_arc(value)));
        assert!(slice.downcast::<i64>().is_none());
        assert!(slice.is::<String>());
    }

    #[test]
    fn cloned_state_is_identical() {
        let state = CombinedState::new().with("a", 1_u8);
        let copy = state.clone();
        assert!(state.ptr_eq(&copy));
        assert!(!state.ptr_eq(&CombinedState::new().with("a", 1_u8)));
    }

    #[test]
    fn with_does_not_touch_shared_copies() {
        let original = CombinedState::new().with("a", 1_u8);
        let extended = original.clone().with("b", 2_u8);
        assert_eq!(original.len(), 1);
        assert_eq!(extended.len(), 2);
        assert!(!original.contains_key("b"));
    }

    #[test]
    fn erased_reducer_reports_type_mismatch() {
        let reducer = erase("count", |state: Option<Arc<i64>>, _action: &Action| {
            Ok(state.or_else(|| Some(Arc::new(0))))
        });
        let wrong = Slice::new("not a number");
        let result = reducer(Some(&wrong), &Action::new("ANY"));
        assert_eq!(
            result.map(|_| ()),
            Err(StoreError::SliceTypeMismatch {
                key: "count".to_string(),
                expected: "i64",
            })
        );
    }
}
