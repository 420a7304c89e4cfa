use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A typed document attribute, the generic tree encoding used for persisted
/// key records.
///
/// Serializes externally tagged with the conventional single letter type
/// tags, e.g. `{"M": {"rate": {"N": "5"}}}`. Numbers are carried as decimal
/// text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Attribute {
    /// A text string.
    #[serde(rename = "S")]
    Text(String),
    /// A number in decimal text form.
    #[serde(rename = "N")]
    Number(String),
    /// A boolean.
    #[serde(rename = "BOOL")]
    Boolean(bool),
    /// A nested map of attributes.
    #[serde(rename = "M")]
    Map(BTreeMap<String, Attribute>),
    /// A list of attributes.
    #[serde(rename = "L")]
    List(Vec<Attribute>),
    /// An explicit null.
    #[serde(rename = "NULL")]
    Null(bool),
    /// Opaque bytes.
    #[serde(rename = "B")]
    Binary(#[serde(with = "serde_bytes")] Vec<u8>),
}

impl Attribute {
    /// The entries of a map attribute.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Attribute>> {
        match self {
            Attribute::Map(entries) => Some(entries),
            _ => None,
        }
    }}
