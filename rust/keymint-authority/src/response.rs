use std::collections::BTreeMap;

use keymint_capability::CapabilityData;
use keymint_common::Timestamp;
use serde::{Serialize, Serializer};

use crate::Operation;

/// Reported when a key is minted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Created {
    /// Always "Created new API key"
    pub message: String,
    /// The new key's token
    pub token: String,
}

impl Created {
    pub(crate) fn new(token: String) -> Self {
        Self {
            message: "Created new API key".into(),
            token,
        }
    }
}

/// A bare status message, reported by delete and renew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    /// What happened
    pub message: String,
}

impl Status {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// What a read reveals about a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatus {
    /// When the key expires, serialized as an RFC 3339 instant
    #[serde(serialize_with = "rfc3339")]
    pub expiry: Timestamp,
    /// The key's description, if it has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The key's capabilities visible to the reader
    pub capability_set: BTreeMap<String, CapabilityData>,
}

fn rfc3339<S>(timestamp: &Timestamp, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339())
}

/// Which management operations an authority may perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permissions {
    /// Permitted operations, in [`Operation::ALL`] order
    pub operations: Vec<Operation>,
}

impl Permissions {
    /// Whether `operation` is permitted.
    pub fn allows(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }
}

/// Whether a key currently holds a named capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityStatus {
    /// The capability asked about
    pub name: String,
    /// The capability data, present exactly when the capability is held
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<CapabilityData>,
    /// Why the capability is not held
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CapabilityStatus {
    pub(crate) fn granted(name: &str, data: CapabilityData) -> Self {
        Self {
            name: name.to_string(),
            data: Some(data),
            message: None,
        }
    }

    pub(crate) fn refused(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            data: None,
            message: Some(message.into()),
        }
    }

    /// Whether the capability is held.
    pub fn is_authorized(&self) -> bool {
        self.data.is_some()
    }
}
