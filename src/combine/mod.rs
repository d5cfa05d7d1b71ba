//! Combining independent slice reducers into one root reducer.
//!
//! Each slice reducer owns one key of [`CombinedState`] and only ever sees
//! its own slice. Slices are reference counted: returning the `Arc` that was
//! passed in means "unchanged", and when no slice changed the combined
//! reducer hands back the previous state itself.
//!
//! Slice reducers are checked once when the combination is built:
//!
//! - given no state and the init action they must return an initial state
//! - given no state and an unknown action type they must do the same
//!
//! Every violation is collected, and the combination returns them as a
//! single [`StoreError::ReducerShape`](crate::core::StoreError::ReducerShape)
//! on each call.

mod builder;
mod combination;
mod shape;
mod slice;

pub use builder::{combine_reducers, CombineReducers, SliceFn};
pub use combination::Combination;
pub use slice::{CombinedState, Slice};
