use async_trait::async_trait;
use keymint_common::Timestamp;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::{KeyRecord, KeyStore, KeyStoreError};

/// A [MeasuredKeyStore] acts as a proxy over a [KeyStore] implementation that
/// measures reads and writes.
#[derive(Clone)]
pub struct MeasuredKeyStore<Store>
where
    Store: KeyStore,
{
    reads: Arc<AtomicUsize>,
    writes: Arc<AtomicUsize>,
    store: Store,
}

impl<Store> MeasuredKeyStore<Store>
where
    Store: KeyStore,
{
    /// Wrap the provided [KeyStore] so that reads and writes to it may be
    /// measured.
    pub fn new(store: Store) -> Self {
        Self {
            reads: Arc::new(AtomicUsize::default()),
            writes: Arc::new(AtomicUsize::default()),
            store,
        }
    }

    /// The aggregate number of reads from the wrapped [KeyStore]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// The aggregate number of writes (puts, expiry updates and deletes) to
    /// the wrapped [KeyStore]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<Store> KeyStore for MeasuredKeyStore<Store>
where
    Store: KeyStore,
{
    async fn get(&self, token: &str) -> Result<Option<KeyRecord>, KeyStoreError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.store.get(token).await
    }

    async fn put(&self, record: KeyRecord) -> Result<(), KeyStoreError> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.store.put(record).await
    }

    async fn update_expiry(
        &self,
        token: &str,
        expiry: Timestamp,
        removal_time: Timestamp,
    ) -> Result<(), KeyStoreError> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.store.update_expiry(token, expiry, removal_time).await
    }

    async fn delete(&self, token: &str) -> Result<(), KeyStoreError> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.store.delete(token).await
    }
}
