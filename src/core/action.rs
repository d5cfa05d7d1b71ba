//! Actions: the declarative records that drive every state change.
//!
//! An action is a plain record with a `type` and optional payload fields.
//! Actions built in Rust always carry a defined type. Actions arriving as
//! dynamic values (deserialized, or handed over by a caller as JSON) are
//! checked at that boundary with [`is_plain_record`] and [`Action::from_value`].

use super::error::StoreError;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

const TYPE_KEY: &str = "type";
const PAYLOAD_KEY: &str = "payload";
const RESERVED_PREFIX: &str = "@@statecell";

/// Reserved action tags. Only the crate can build the internal ones, so they
/// can never collide with a caller's action types.
#[derive(Clone, Debug, PartialEq)]
enum Tag {
    User(Value),
    Init,
    Replace,
    ProbeUnknown(String),
}

/// The `type` of an action.
///
/// # Example
///
/// ```rust
/// use statecell::core::Action;
///
/// let action = Action::new("INC");
/// assert_eq!(action.action_type().as_str(), Some("INC"));
/// assert!(!action.action_type().is_internal());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ActionType(Tag);

impl ActionType {
    /// The caller-supplied type, or `None` for internal store actions.
    pub fn value(&self) -> Option<&Value> {
        match &self.0 {
            Tag::User(value) => Some(value),
            _ => None,
        }
    }

    /// The caller-supplied type when it is a string.
    pub fn as_str(&self) -> Option<&str> {
        self.value().and_then(Value::as_str)
    }

    /// Whether this type belongs to the store's private namespace.
    pub fn is_internal(&self) -> bool {
        !matches!(self.0, Tag::User(_))
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Tag::User(Value::String(kind)) => f.write_str(kind),
            Tag::User(value) => write!(f, "{value}"),
            Tag::Init => write!(f, "{RESERVED_PREFIX}/INIT"),
            Tag::Replace => write!(f, "{RESERVED_PREFIX}/REPLACE"),
            Tag::ProbeUnknown(id) => write!(f, "{RESERVED_PREFIX}/PROBE_UNKNOWN_ACTION.{id}"),
        }
    }
}

impl PartialEq<&str> for ActionType {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

/// An immutable description of a state change.
///
/// # Example
///
/// ```rust
/// use statecell::core::Action;
/// use serde_json::json;
///
/// let action = Action::new("ADD_TODO").with_payload(json!({ "text": "write docs" }));
///
/// assert!(action.is("ADD_TODO"));
/// assert_eq!(action.payload(), Some(&json!({ "text": "write docs" })));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    action_type: ActionType,
    fields: Map<String, Value>,
}

impl Action {
    /// Create an action with a caller-defined type and no payload.
    pub fn new(action_type: impl Into<Value>) -> Self {
        Self::tagged(Tag::User(action_type.into()))
    }

    fn tagged(tag: Tag) -> Self {
        Self {
            action_type: ActionType(tag),
            fields: Map::new(),
        }
    }

    pub(crate) fn init() -> Self {
        Self::tagged(Tag::Init)
    }

    pub(crate) fn replace() -> Self {
        Self::tagged(Tag::Replace)
    }

    /// An action whose type no reducer can know about.
    pub(crate) fn probe_unknown() -> Self {
        Self::tagged(Tag::ProbeUnknown(Uuid::new_v4().simple().to_string()))
    }

    pub(crate) fn is_init(&self) -> bool {
        matches!(self.action_type.0, Tag::Init)
    }

    pub(crate) fn is_replace(&self) -> bool {
        matches!(self.action_type.0, Tag::Replace)
    }

    /// Attach a `payload` field.
    pub fn with_payload(self, payload: impl Into<Value>) -> Self {
        self.with_field(PAYLOAD_KEY, payload)
    }

    /// Attach an arbitrary field.
    ///
    /// The `type` key is reserved for the action's own type, so a field with
    /// that name is dropped and the action is returned unchanged.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key == TYPE_KEY {
            log::debug!("ignoring \"{TYPE_KEY}\" field on action {}", self.action_type);
            return self;
        }
        self.fields.insert(key, value.into());
        self
    }

    pub fn action_type(&self) -> &ActionType {
        &self.action_type
    }

    /// Shorthand for the string form of a caller-defined type.
    pub fn kind(&self) -> Option<&str> {
        self.action_type.as_str()
    }

    /// Check the action's type against a string constant.
    pub fn is(&self, kind: &str) -> bool {
        self.kind() == Some(kind)
    }

    pub fn payload(&self) -> Option<&Value> {
        self.field(PAYLOAD_KEY)
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Build an action from a dynamic value.
    ///
    /// Fails with [`StoreError::ActionNotPlainObject`] when the value is not a
    /// plain record and with [`StoreError::UndefinedActionType`] when the
    /// record has no `type`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statecell::core::{Action, StoreError};
    /// use serde_json::json;
    ///
    /// let action = Action::from_value(json!({ "type": "INC", "by": 2 })).unwrap();
    /// assert!(action.is("INC"));
    /// assert_eq!(action.field("by"), Some(&json!(2)));
    ///
    /// let missing = Action::from_value(json!({ "payload": 1 }));
    /// assert_eq!(missing, Err(StoreError::UndefinedActionType));
    /// ```
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(StoreError::ActionNotPlainObject {
                    found: describe_kind(&other).to_string(),
                })
            }
        };

        let action_type = fields
            .remove(TYPE_KEY)
            .ok_or(StoreError::UndefinedActionType)?;

        Ok(Self {
            action_type: ActionType(Tag::User(action_type)),
            fields,
        })
    }

    /// Render the action as a plain record.
    pub fn to_value(&self) -> Value {
        let mut record = self.fields.clone();
        let action_type = match &self.action_type.0 {
            Tag::User(value) => value.clone(),
            _ => Value::String(self.action_type.to_string()),
        };
        record.insert(TYPE_KEY.to_string(), action_type);
        Value::Object(record)
    }

    /// Human-readable description used in error messages.
    pub(crate) fn describe(&self) -> String {
        format!("action \"{}\"", self.action_type)
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Action::from_value(value).map_err(de::Error::custom)
    }
}

/// Check that a dynamic value is a plain key/value record.
///
/// Arrays, strings, numbers, booleans and null are not.
pub fn is_plain_record(value: &Value) -> bool {
    value.is_object()
}

fn describe_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_types_compare_against_strings() {
        let action = Action::new("INC");
        assert!(action.is("INC"));
        assert!(!action.is("DEC"));
        assert_eq!(*action.action_type(), "INC");
    }

    #[test]
    fn non_string_types_are_allowed() {
        let action = Action::new(42);
        assert_eq!(action.kind(), None);
        assert_eq!(action.action_type().value(), Some(&json!(42)));
        assert_eq!(action.action_type().to_string(), "42");
    }

    #[test]
    fn internal_actions_are_hidden_from_reducers() {
        let init = Action::init();
        assert!(init.action_type().is_internal());
        assert_eq!(init.kind(), None);
        assert_eq!(init.action_type().value(), None);
        assert_eq!(init.action_type().to_string(), "@@statecell/INIT");
        assert!(init.is_init());
        assert!(!init.is_replace());
    }

    #[test]
    fn internal_action_cannot_be_spoofed() {
        let spoof = Action::new("@@statecell/REPLACE");
        assert!(!spoof.is_replace());
        assert!(!spoof.action_type().is_internal());
        assert_ne!(spoof.action_type(), Action::replace().action_type());
    }

    #[test]
    fn probe_types_are_unique() {
        let first = Action::probe_unknown();
        let second = Action::probe_unknown();
        assert_ne!(first.action_type(), second.action_type());
        assert!(first
            .action_type()
            .to_string()
            .starts_with("@@statecell/PROBE_UNKNOWN_ACTION."));
    }

    #[test]
    fn from_value_rejects_non_records() {
        for value in [json!([1, 2]), json!("INC"), json!(null), json!(3), json!(true)] {
            let result = Action::from_value(value);
            assert!(matches!(
                result,
                Err(StoreError::ActionNotPlainObject { .. })
            ));
        }
    }

    #[test]
    fn from_value_requires_a_type() {
        let result = Action::from_value(json!({ "payload": 1 }));
        assert_eq!(result, Err(StoreError::UndefinedActionType));
    }

    #[test]
    fn null_type_counts_as_defined() {
        let action = Action::from_value(json!({ "type": null })).unwrap();
        assert_eq!(action.action_type().value(), Some(&Value::Null));
    }

    #[test]
    fn action_serializes_as_plain_record() {
        let action = Action::new("ADD").with_payload(json!({ "id": 1 }));
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json, json!({ "type": "ADD", "payload": { "id": 1 } }));

        let restored: Action = serde_json::from_value(json).unwrap();
        assert_eq!(restored, action);
    }

    #[test]
    fn type_field_is_not_stored() {
        let action = Action::new("REAL").with_field("type", "FAKE");
        assert_eq!(action.field("type"), None);
        assert!(action.fields().is_empty());
        assert_eq!(action.to_value(), json!({ "type": "REAL" }));
    }

    #[test]
    fn action_with_type_field_survives_a_value_trip() {
        let action = Action::new("REAL")
            .with_field("type", "FAKE")
            .with_payload(json!({ "id": 7 }));
        let restored = Action::from_value(action.to_value()).unwrap();
        assert_eq!(restored, action);
    }

    #[test]
    fn deserializing_a_non_record_fails() {
        let result: Result<Action, _> = serde_json::from_str("[1, 2, 3]");
        assert!(result.is_err());
    }

    #[test]
    fn plain_record_predicate() {
        assert!(is_plain_record(&json!({})));
        assert!(is_plain_record(&json!({ "type": "A" })));
        assert!(!is_plain_record(&json!([])));
        assert!(!is_plain_record(&json!(null)));
    }
}
