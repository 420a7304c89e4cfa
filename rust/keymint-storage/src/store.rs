use std::sync::Arc;

use async_trait::async_trait;
use keymint_common::{ConditionalSync, Timestamp};

use crate::{KeyRecord, KeyStoreError};

mod memory;
pub use memory::*;

mod measure;
pub use measure::*;

#[cfg(not(target_arch = "wasm32"))]
mod deadline;
#[cfg(not(target_arch = "wasm32"))]
pub use deadline::*;

/// A [KeyStore] is a facade over a durable key-value substrate holding one
/// [KeyRecord] per token.
///
/// Every method is a single call against the substrate; implementations do
/// not retry.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait KeyStore: ConditionalSync {
    /// Retrieve the record stored for `token`. Missing and malformed records
    /// are both reported as `None`.
    async fn get(&self, token: &str) -> Result<Option<KeyRecord>, KeyStoreError>;

    /// Store `record` under its token, replacing any previous record.
    async fn put(&self, record: KeyRecord) -> Result<(), KeyStoreError>;

    /// Move the expiry and removal time of an existing record, leaving the
    /// rest of it untouched.
    async fn update_expiry(
        &self,
        token: &str,
        expiry: Timestamp,
        removal_time: Timestamp,
    ) -> Result<(), KeyStoreError>;

    /// Remove the record for `token`. Removing an absent record succeeds.
    async fn delete(&self, token: &str) -> Result<(), KeyStoreError>;
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<T> KeyStore for Arc<T>
where
    T: KeyStore + ?Sized,
{
    async fn get(&self, token: &str) -> Result<Option<KeyRecord>, KeyStoreError> {
        (**self).get(token).await
    }

    async fn put(&self, record: KeyRecord) -> Result<(), KeyStoreError> {
        (**self).put(record).await
    }

    async fn update_expiry(
        &self,
        token: &str,
        expiry: Timestamp,
        removal_time: Timestamp,
    ) -> Result<(), KeyStoreError> {
        (**self).update_expiry(token, expiry, removal_time).await
    }

    async fn delete(&self, token: &str) -> Result<(), KeyStoreError> {
        (**self).delete(token).await
    }
}
