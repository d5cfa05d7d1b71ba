//! Core building blocks shared by every other module.
//!
//! - Actions and the plain-record check for dynamic values
//! - Right-to-left function composition
//! - The crate's error types
//!
//! Nothing in this module holds state.

mod action;
mod compose;
mod error;

pub use action::{is_plain_record, Action, ActionType};
pub use compose::{compose, Composable};
pub use error::{ShapeViolation, StoreError};
