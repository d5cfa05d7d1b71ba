//! Error types shared by the store, the reducer combinator and the middleware pipeline.

use thiserror::Error;

/// Errors raised by store operations, combined reducers and middleware.
///
/// Every variant is raised synchronously at the call that violates the
/// contract. The store never retries and never recovers partially.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Actions must be plain objects, received {found}. Use custom middleware for async actions.")]
    ActionNotPlainObject { found: String },

    #[error("Actions may not have an undefined \"type\" property. Have you misspelled a constant?")]
    UndefinedActionType,

    #[error("Reducers may not dispatch actions.")]
    ReducerDispatch,

    #[error(
        "You may not call get_state() while the reducer is executing. \
         The reducer has already received the state as an argument. \
         Pass it down from the top reducer instead of reading it from the store."
    )]
    GetStateWhileDispatching,

    #[error(
        "You may not call subscribe() while the reducer is executing. \
         If you would like to be notified after the store has been updated, \
         subscribe and call get_state() in the listener to access the latest state."
    )]
    SubscribeWhileDispatching,

    #[error("You may not unsubscribe from a store listener while the reducer is executing.")]
    UnsubscribeWhileDispatching,

    #[error(
        "Dispatching while constructing your middleware is not allowed. \
         Other middleware would not be applied to this dispatch."
    )]
    DispatchDuringMiddlewareConstruction,

    #[error(
        "It looks like you are passing several store enhancers. This is not supported. \
         Instead, compose them together into a single enhancer."
    )]
    MultipleEnhancers,

    #[error("{}", describe_violations(.0))]
    ReducerShape(Vec<ShapeViolation>),

    #[error(
        "Given {action}, reducer \"{key}\" returned no value. \
         To ignore an action, you must explicitly return the previous state."
    )]
    SliceReturnedNothing { key: String, action: String },

    #[error("State slice \"{key}\" does not hold a value of type {expected}")]
    SliceTypeMismatch { key: String, expected: &'static str },

    #[error("The store behind this handle has been dropped")]
    StoreDropped,

    #[error("Reducer failed: {0}")]
    ReducerFailed(String),

    #[error("Middleware failed: {0}")]
    MiddlewareFailed(String),
}

/// A slice reducer that broke the reducer contract during validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeViolation {
    #[error(
        "Reducer \"{key}\" returned no value during initialization. \
         If the state passed to the reducer is empty, you must explicitly return the initial state."
    )]
    InitReturnedNothing { key: String },

    #[error(
        "Reducer \"{key}\" returned no value when probed with a random type. \
         Don't try to handle internal store actions. They are considered private. \
         Instead, you must return the current state for any unknown actions, \
         unless it is empty, in which case you must return the initial state."
    )]
    ProbeReturnedNothing { key: String },

    #[error("Reducer \"{key}\" failed during initialization: {reason}")]
    InitFailed { key: String, reason: String },
}

impl ShapeViolation {
    /// The slice key whose reducer broke the contract.
    pub fn key(&self) -> &str {
        match self {
            Self::InitReturnedNothing { key }
            | Self::ProbeReturnedNothing { key }
            | Self::InitFailed { key, .. } => key,
        }
    }
}

fn describe_violations(violations: &[ShapeViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_error_lists_every_violation() {
        let error = StoreError::ReducerShape(vec![
            ShapeViolation::InitReturnedNothing {
                key: "todos".to_string(),
            },
            ShapeViolation::ProbeReturnedNothing {
                key: "filter".to_string(),
            },
        ]);

        let message = error.to_string();
        assert!(message.contains("\"todos\""));
        assert!(message.contains("\"filter\""));
    }

    #[test]
    fn violation_exposes_its_key() {
        let violation = ShapeViolation::InitFailed {
            key: "count".to_string(),
            reason: "boom".to_string(),
        };
        assert_eq!(violation.key(), "count");
    }

    #[test]
    fn slice_error_names_key_and_action() {
        let error = StoreError::SliceReturnedNothing {
            key: "count".to_string(),
            action: "action \"INC\"".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("\"count\""));
        assert!(message.contains("action \"INC\""));
    }
}
