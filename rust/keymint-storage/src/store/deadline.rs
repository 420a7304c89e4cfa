use std::time::Duration;

use async_trait::async_trait;
use keymint_common::Timestamp;
use tokio::time::timeout;

use crate::{KeyRecord, KeyStore, KeyStoreError};

/// A [DeadlineKeyStore] fails any call to the wrapped [KeyStore] that does
/// not complete within a fixed duration.
///
/// A call that times out is abandoned, not retried. Whether the underlying
/// write took effect is unknown to the caller.
#[derive(Clone)]
pub struct DeadlineKeyStore<Store>
where
    Store: KeyStore,
{
    store: Store,
    deadline: Duration,
}

impl<Store> DeadlineKeyStore<Store>
where
    Store: KeyStore,
{
    /// Bound every call to `store` by `deadline`.
    pub fn new(store: Store, deadline: Duration) -> Self {
        Self { store, deadline }
    }

    /// The configured bound.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, KeyStoreError>
    where
        F: Future<Output = Result<T, KeyStoreError>>,
    {
        timeout(self.deadline, call)
            .await
            .map_err(|_| KeyStoreError::Timeout(self.deadline))?
    }
}

#[async_trait]
impl<Store> KeyStore for DeadlineKeyStore<Store>
where
    Store: KeyStore,
{
    async fn get(&self, token: &str) -> Result<Option<KeyRecord>, KeyStoreError> {
        self.bounded(self.store.get(token)).await
    }

    async fn put(&self, record: KeyRecord) -> Result<(), KeyStoreError> {
        self.bounded(self.store.put(record)).await
    }

    async fn update_expiry(
        &self,
        token: &str,
        expiry: Timestamp,
        removal_time: Timestamp,
    ) -> Result<(), KeyStoreError> {
        self.bounded(self.store.update_expiry(token, expiry, removal_time))
            .await
    }

    async fn delete(&self, token: &str) -> Result<(), KeyStoreError> {
        self.bounded(self.store.delete(token)).await
    }
}
