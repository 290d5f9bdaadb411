//! Request payload validation.
//!
//! Every operation has a [`Schema`] listing the fields it reads. Validation
//! checks presence, type and allowed values of each listed field, fills in
//! defaults, and drops anything else from the payload. It reports every
//! violation at once or nothing at all.

use crate::user;

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::collections;

const SCHEMA_FIELD: &str = "_schema";
const INVALID_INPUT: &str = "Invalid input type.";
const MISSING: &str = "Missing data for required field.";
const NULL: &str = "Field may not be null.";
const NOT_A_STRING: &str = "Not a valid string.";

const STATUS_VALUES: &[&str] = &["ACTIVE", "INACTIVE"];

/// Description of every field that failed validation.
///
/// Renders as a JSON object mapping field names to their messages, e.g.
/// `{"user_id":["Missing data for required field."]}`.
#[derive(Clone, Debug, Default, Eq, PartialEq, thiserror::Error)]
#[error("{}", render_messages(.messages))]
pub struct ValidationError {
    messages: collections::BTreeMap<String, Vec<String>>,
}

fn render_messages(messages: &collections::BTreeMap<String, Vec<String>>) -> String {
    serde_json::to_string(messages).unwrap_or_default()
}

impl ValidationError {
    /// A failure with a single message on `field`.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut error = Self::default();
        error.push(field, message);
        error
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.messages
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Messages keyed by field name.
    pub fn messages(&self) -> &collections::BTreeMap<String, Vec<String>> {
        &self.messages
    }

    fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// One field accepted by a [`Schema`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Field {
    /// Attribute name in the payload.
    pub name: &'static str,
    /// Whether the payload must carry the field.
    pub required: bool,
    /// Allowed values, when the field is an enumeration.
    pub one_of: Option<&'static [&'static str]>,
    /// Value used when an optional field is absent.
    pub load_default: Option<&'static str>,
}

impl Field {
    /// A required string field.
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
            one_of: None,
            load_default: None,
        }
    }

    /// Restrict the field to the user statuses.
    pub const fn status(required: bool) -> Self {
        Self {
            name: user::STATUS,
            required,
            one_of: Some(STATUS_VALUES),
            load_default: if required { None } else { Some("INACTIVE") },
        }
    }

    fn check(&self, value: Option<&Value>, errors: &mut ValidationError) -> Option<Value> {
        let value = match value {
            None if self.required => {
                errors.push(self.name, MISSING);
                return None;
            }
            None => return self.load_default.map(|value| Value::String(value.to_string())),
            Some(Value::Null) => {
                errors.push(self.name, NULL);
                return None;
            }
            Some(Value::String(value)) => value,
            Some(_) => {
                errors.push(self.name, NOT_A_STRING);
                return None;
            }
        };
        if let Some(one_of) = self.one_of
            && !one_of.contains(&value.as_str())
        {
            errors.push(self.name, format!("Must be one of: {}.", one_of.join(", ")));
            return None;
        }
        Some(Value::String(value.clone()))
    }
}

/// Accepted shape of one operation's payload.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Schema {
    /// Fields read by the operation. Other payload fields are ignored.
    pub fields: &'static [Field],
}

/// Payload of a get: the primary key.
pub const GET_USER: Schema = Schema {
    fields: &[Field::required(user::USER_ID), Field::required(user::USERNAME)],
};

/// Payload of a create: the primary key and an optional status.
pub const CREATE_USER: Schema = Schema {
    fields: &[
        Field::required(user::USER_ID),
        Field::required(user::USERNAME),
        Field::status(false),
    ],
};

/// Payload of an update: the primary key and an optional status.
pub const UPDATE_USER: Schema = Schema {
    fields: &[
        Field::required(user::USER_ID),
        Field::required(user::USERNAME),
        Field::status(false),
    ],
};

/// Payload of a delete: the primary key.
pub const DELETE_USER: Schema = Schema {
    fields: &[Field::required(user::USER_ID), Field::required(user::USERNAME)],
};

/// Payload of a status index query: a required status.
pub const STATUS_INDEX_QUERY: Schema = Schema {
    fields: &[Field::status(true)],
};

impl Schema {
    /// Validate `input`, returning only the schema's fields with defaults applied.
    pub fn validate(&self, input: &Value) -> Result<Map<String, Value>, ValidationError> {
        let Some(object) = input.as_object() else {
            return Err(ValidationError::field(SCHEMA_FIELD, INVALID_INPUT));
        };
        let mut errors = ValidationError::default();
        let mut loaded = Map::with_capacity(self.fields.len());
        for field in self.fields {
            if let Some(value) = field.check(object.get(field.name), &mut errors) {
                loaded.insert(field.name.to_string(), value);
            }
        }
        if errors.is_empty() {
            Ok(loaded)
        } else {
            Err(errors)
        }
    }

    /// Validate `input` and deserialize the result into a typed request.
    pub fn load<T: DeserializeOwned>(&self, input: &Value) -> Result<T, ValidationError> {
        let loaded = self.validate(input)?;
        serde_json::from_value(Value::Object(loaded))
            .map_err(|err| ValidationError::field(SCHEMA_FIELD, err.to_string()))
    }
}

/// A validated create or update payload.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct UserStatusRequest {
    /// Partition key.
    pub user_id: String,
    /// Sort key.
    pub username: String,
    /// Status to write.
    pub status: user::Status,
}

impl UserStatusRequest {
    /// The targeted primary key.
    pub fn key(&self) -> user::UserKey {
        user::UserKey {
            user_id: self.user_id.clone(),
            username: self.username.clone(),
        }
    }
}

/// A validated status index query payload.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
pub struct StatusQueryRequest {
    /// Status to look up.
    pub status: user::Status,
}
