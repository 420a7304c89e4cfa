use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// The key management operations, each guarded by its own designated
/// capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Mint a delegated key
    Create,
    /// Inspect a key
    Read,
    /// Remove a key
    Delete,
    /// Move a key's expiry
    Renew,
}

impl Operation {
    /// Every operation, in a stable order.
    pub const ALL: [Operation; 4] = [
        Operation::Create,
        Operation::Read,
        Operation::Delete,
        Operation::Renew,
    ];

    /// The lowercase name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Delete => "delete",
            Operation::Renew => "renew",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
