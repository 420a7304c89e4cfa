use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

use crate::{Attribute, CapabilityData, Parser, Value, merge};

/// A named grant held by an API key.
///
/// Two capabilities are equal when their names and data are equal; the
/// parser a capability came from does not take part in comparisons.
#[derive(Clone)]
pub struct Capability {
    name: String,
    data: CapabilityData,
    parser: Parser,
}

impl Capability {
    /// Assemble a capability from already decoded data.
    pub fn new(name: impl Into<String>, data: CapabilityData, parser: Parser) -> Self {
        Self {
            name: name.into(),
            data,
            parser,
        }
    }

    /// The capability name, unique within a capability set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All data fields.
    pub fn data(&self) -> &CapabilityData {
        &self.data
    }

    /// The parser that produced this capability.
    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// A single data field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// A text field. `None` if absent or not text.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_text()
    }

    /// A boolean field. `None` if absent or not boolean.
    pub fn boolean(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_boolean()
    }

    /// An integer field. `None` if absent or not an integer.
    pub fn integer(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_integer()
    }

    /// Fold `from` into this capability's data. See [`merge`].
    pub fn merge(&mut self, from: &CapabilityData, overwrite: bool) {
        merge(&mut self.data, from, overwrite);
    }

    /// Encode the data as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.data
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }

    /// Encode the data as a map attribute.
    pub fn to_attribute(&self) -> Attribute {
        Attribute::Map(
            self.data
                .iter()
                .map(|(key, value)| (key.clone(), value.to_attribute()))
                .collect::<BTreeMap<_, _>>(),
        )
    }
}

impl PartialEq for Capability {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.data == other.data
    }
}

impl Eq for Capability {}

impl Debug for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name)
            .field("data", &self.data)
            .field("parser", &self.parser.name())
            .finish()
    }
}
