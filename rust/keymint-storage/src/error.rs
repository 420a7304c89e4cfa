use std::time::Duration;

use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug)]
pub enum KeyStoreError {
    /// The underlying substrate failed
    #[error("Key store backend error: {0}")]
    Backend(String),

    /// A record could not be encoded for storage
    #[error("Failed to encode a key record: {0}")]
    Encode(String),

    /// Stored bytes could not be decoded as a record
    #[error("Failed to decode a key record: {0}")]
    Decode(String),

    /// A partial update addressed a record that does not exist
    #[error("No key record for '{0}'")]
    Missing(String),

    /// A store call did not complete in time
    #[error("Key store call did not complete within {0:?}")]
    Timeout(Duration),
}
