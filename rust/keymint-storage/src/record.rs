use std::collections::BTreeMap;

use keymint_capability::Attribute;
use keymint_common::Timestamp;
use serde::{Deserialize, Serialize};

use crate::KeyStoreError;

/// The persisted shape of one API key.
///
/// Field names are camelCase so that records stay readable by every service
/// sharing the store. Capability data is kept as [`Attribute`] trees and is
/// only interpreted when a record is loaded through a
/// [`Keyring`](crate::Keyring).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRecord {
    /// The key's token
    pub token: String,
    /// Tokens the key was delegated through, root first
    pub authority_chain: Vec<String>,
    /// When the key stops granting anything
    pub expiry: Timestamp,
    /// When the store may drop the record
    pub removal_time: Timestamp,
    /// Free-form text supplied by the creator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Encoded capability data by capability name
    #[serde(default)]
    pub capabilities: BTreeMap<String, Attribute>,
}

impl KeyRecord {
    /// Encode as DAG-CBOR.
    pub fn encode(&self) -> Result<Vec<u8>, KeyStoreError> {
        serde_ipld_dagcbor::to_vec(self).map_err(|error| KeyStoreError::Encode(format!("{error}")))
    }

    /// Decode from DAG-CBOR.
    pub fn decode(bytes: &[u8]) -> Result<Self, KeyStoreError> {
        serde_ipld_dagcbor::from_slice(bytes)
            .map_err(|error| KeyStoreError::Decode(format!("{error}")))
    }
}
