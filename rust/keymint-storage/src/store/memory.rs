use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use keymint_common::{Redacted, Timestamp};
use tokio::sync::RwLock;

use crate::{KeyRecord, KeyStore, KeyStoreError};

#[derive(Clone)]
struct Entry {
    removal_time: Timestamp,
    bytes: Vec<u8>,
}

/// A [KeyStore] backed by a [HashMap] where records are kept in memory, in
/// their encoded form, and never persisted.
///
/// Records whose removal time has passed are reported absent and purged the
/// next time they are looked up, or all at once by [MemoryKeyStore::sweep].
#[derive(Clone, Default)]
pub struct MemoryKeyStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryKeyStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store already encoded record bytes under `token` as-is.
    pub async fn put_encoded(
        &self,
        token: impl Into<String>,
        bytes: Vec<u8>,
        removal_time: Timestamp,
    ) {
        self.entries.write().await.insert(
            token.into(),
            Entry {
                removal_time,
                bytes,
            },
        );
    }

    /// Purge every record whose removal time has passed at `now`, returning
    /// how many were dropped.
    pub async fn sweep_at(&self, now: Timestamp) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| now < entry.removal_time);
        before - entries.len()
    }

    /// Purge every record whose removal time has passed.
    pub async fn sweep(&self) -> usize {
        self.sweep_at(Timestamp::now()).await
    }

    /// Number of records held, including ones awaiting removal.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether no records are held.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl KeyStore for MemoryKeyStore {
    async fn get(&self, token: &str) -> Result<Option<KeyRecord>, KeyStoreError> {
        let now = Timestamp::now();
        let entry = {
            let entries = self.entries.read().await;
            match entries.get(token) {
                Some(entry) => entry.clone(),
                None => return Ok(None),
            }
        };

        if entry.removal_time <= now {
            let mut entries = self.entries.write().await;
            // The record may have been replaced since the read lock was released
            if entries
                .get(token)
                .is_some_and(|current| current.removal_time <= now)
            {
                entries.remove(token);
            }
            return Ok(None);
        }

        match KeyRecord::decode(&entry.bytes) {
            Ok(record) => Ok(Some(record)),
            Err(error) => {
                tracing::warn!(token = %Redacted(token), "Ignoring malformed key record: {error}");
                Ok(None)
            }
        }
    }

    async fn put(&self, record: KeyRecord) -> Result<(), KeyStoreError> {
        let bytes = record.encode()?;
        self.put_encoded(record.token, bytes, record.removal_time)
            .await;
        Ok(())
    }

    async fn update_expiry(
        &self,
        token: &str,
        expiry: Timestamp,
        removal_time: Timestamp,
    ) -> Result<(), KeyStoreError> {
        let now = Timestamp::now();
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(token)
            .filter(|entry| now < entry.removal_time)
            .ok_or_else(|| KeyStoreError::Missing(Redacted(token).to_string()))?;

        let mut record = KeyRecord::decode(&entry.bytes)?;
        record.expiry = expiry;
        record.removal_time = removal_time;

        entry.bytes = record.encode()?;
        entry.removal_time = removal_time;

        Ok(())
    }

    async fn delete(&self, token: &str) -> Result<(), KeyStoreError> {
        self.entries.write().await.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use testresult::TestResult;
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test;

    fn record(token: &str, removal_time: Timestamp) -> KeyRecord {
        KeyRecord {
            token: token.into(),
            authority_chain: vec![],
            expiry: removal_time.saturating_add_seconds(-60),
            removal_time,
            description: Some("test".into()),
            capabilities: BTreeMap::new(),
        }
    }

    fn later() -> Timestamp {
        Timestamp::now().saturating_add_seconds(3_600)
    }

    fn earlier() -> Timestamp {
        Timestamp::now().saturating_add_seconds(-3_600)
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_stores_and_retrieves_records() -> TestResult {
        let store = MemoryKeyStore::new();
        let record = record("alpha", later());

        store.put(record.clone()).await?;

        assert_eq!(store.get("alpha").await?, Some(record));
        assert_eq!(store.get("beta").await?, None);

        store.delete("alpha").await?;
        store.delete("alpha").await?;
        assert_eq!(store.get("alpha").await?, None);

        Ok(())
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_drops_records_past_their_removal_time() -> TestResult {
        let store = MemoryKeyStore::new();
        store.put(record("stale", earlier())).await?;
        store.put(record("fresh", later())).await?;

        assert_eq!(store.len().await, 2);
        assert_eq!(store.get("stale").await?, None);
        assert_eq!(store.len().await, 1);

        store.put(record("stale", earlier())).await?;
        assert_eq!(store.sweep().await, 1);
        assert!(store.get("fresh").await?.is_some());

        Ok(())
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_reports_malformed_records_as_absent() -> TestResult {
        let store = MemoryKeyStore::new();
        store.put_encoded("broken", vec![0xff, 0x01], later()).await;

        assert_eq!(store.get("broken").await?, None);

        Ok(())
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_updates_expiry_in_place() -> TestResult {
        let store = MemoryKeyStore::new();
        let original = record("alpha", later());
        store.put(original.clone()).await?;

        let expiry = later().saturating_add_seconds(60);
        let removal_time = expiry.saturating_add_seconds(60);
        store.update_expiry("alpha", expiry, removal_time).await?;

        let updated = store.get("alpha").await?.unwrap();
        assert_eq!(updated.expiry, expiry);
        assert_eq!(updated.removal_time, removal_time);
        assert_eq!(updated.description, original.description);

        Ok(())
    }

    #[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
    #[cfg_attr(not(target_arch = "wasm32"), tokio::test)]
    async fn it_refuses_to_update_a_missing_record() {
        let store = MemoryKeyStore::new();

        let result = store.update_expiry("ghost", later(), later()).await;

        assert!(matches!(result, Err(KeyStoreError::Missing(_))));
    }
}
