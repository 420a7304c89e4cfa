use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::Attribute;

/// The data fields of a single capability, ordered by field name.
pub type CapabilityData = BTreeMap<String, Value>;

/// A scalar held in capability data.
///
/// Serializes as its native scalar, so `Value::Integer(5)` encodes as the JSON
/// number `5` and `Value::Text("eu")` as the JSON string `"eu"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A text string.
    Text(String),
    /// A boolean flag.
    Boolean(bool),
    /// A signed integer.
    Integer(i64),
}

impl Value {
    /// Decode a JSON node. Anything that is not a string, boolean or integral
    /// number yields `None`.
    pub fn from_json(node: &serde_json::Value) -> Option<Self> {
        match node {
            serde_json::Value::String(text) => Some(Value::Text(text.clone())),
            serde_json::Value::Bool(flag) => Some(Value::Boolean(*flag)),
            serde_json::Value::Number(number) => number.as_i64().map(Value::Integer),
            _ => None,
        }
    }

    /// Decode an attribute. Numbers that do not parse as an integer decode as
    /// zero; lists, maps, nulls and binary attributes yield `None`.
    pub fn from_attribute(attribute: &Attribute) -> Option<Self> {
        match attribute {
            Attribute::Text(text) => Some(Value::Text(text.clone())),
            Attribute::Boolean(flag) => Some(Value::Boolean(*flag)),
            Attribute::Number(number) => Some(Value::Integer(number.parse().unwrap_or(0))),
            _ => None,
        }
    }

    /// Encode as a JSON node.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Text(text) => serde_json::Value::String(text.clone()),
            Value::Boolean(flag) => serde_json::Value::Bool(*flag),
            Value::Integer(number) => serde_json::Value::from(*number),
        }
    }

    /// Encode as an attribute.
    pub fn to_attribute(&self) -> Attribute {
        match self {
            Value::Text(text) => Attribute::Text(text.clone()),
            Value::Boolean(flag) => Attribute::Boolean(*flag),
            Value::Integer(number) => Attribute::Number(number.to_string()),
        }
    }

    /// The text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The flag, if this is a boolean value.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    /// The number, if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(number) => Some(*number),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{text}"),
            Value::Boolean(flag) => write!(f, "{flag}"),
            Value::Integer(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Boolean(flag)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Integer(number)
    }
}

impl From<i32> for Value {
    fn from(number: i32) -> Self {
        Value::Integer(number.into())
    }
}
