use std::time::Duration;

use keymint_capability::{CapabilitySet, ParserRegistry};
use keymint_common::{Redacted, Timestamp};

use crate::{KeyRecord, KeyStore, KeyStoreError};

/// Thirty days.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(2_592_000);

/// Loads and saves [`CapabilitySet`]s through a [`KeyStore`].
///
/// On the way in, capability data is decoded with the keyring's
/// [`ParserRegistry`]; a capability no parser accepts is dropped from the
/// loaded set. On the way out, every record is stamped with a removal time of
/// `expiry + retention`. The keyring never reads the removal time back, that
/// is left to the store.
#[derive(Debug, Clone)]
pub struct Keyring<S> {
    store: S,
    parsers: ParserRegistry,
    retention: Duration,
}

impl<S> Keyring<S>
where
    S: KeyStore,
{
    /// A keyring with the default retention period.
    pub fn new(store: S, parsers: ParserRegistry) -> Self {
        Self {
            store,
            parsers,
            retention: DEFAULT_RETENTION,
        }
    }

    /// Replace the retention period.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The registry used to decode capability data.
    pub fn parsers(&self) -> &ParserRegistry {
        &self.parsers
    }

    /// How long records outlive their expiry.
    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// When a record expiring at `expiry` may be dropped.
    pub fn removal_time(&self, expiry: Timestamp) -> Timestamp {
        expiry.saturating_add(self.retention)
    }

    /// The persisted shape of `set`.
    pub fn to_record(&self, set: &CapabilitySet) -> KeyRecord {
        KeyRecord {
            token: set.token().to_string(),
            authority_chain: set.authority_chain().to_vec(),
            expiry: set.expiry(),
            removal_time: self.removal_time(set.expiry()),
            description: set.description().map(str::to_string),
            capabilities: set
                .capabilities()
                .map(|capability| (capability.name().to_string(), capability.to_attribute()))
                .collect(),
        }
    }

    /// Rebuild a capability set from its persisted shape.
    pub fn from_record(&self, record: &KeyRecord) -> CapabilitySet {
        let mut set = CapabilitySet::new(
            record.token.clone(),
            record.authority_chain.clone(),
            record.expiry,
            record.description.clone(),
        );

        for (name, data) in &record.capabilities {
            match self.parsers.parse(name, data) {
                Some(capability) => {
                    set.insert(capability);
                }
                None => tracing::warn!(
                    token = %Redacted(&record.token),
                    capability = %name,
                    "Dropping capability that no parser accepts"
                ),
            }
        }

        set
    }

    /// Load the capability set for `token`.
    ///
    /// A record stored under a different token than the one it names is
    /// treated as malformed and reported absent.
    pub async fn load(&self, token: &str) -> Result<Option<CapabilitySet>, KeyStoreError> {
        let Some(record) = self.store.get(token).await? else {
            return Ok(None);
        };

        if record.token != token {
            tracing::warn!(
                token = %Redacted(token),
                "Ignoring key record stored under a foreign token"
            );
            return Ok(None);
        }

        Ok(Some(self.from_record(&record)))
    }

    /// Persist `set`, replacing any record with the same token.
    pub async fn save(&self, set: &CapabilitySet) -> Result<(), KeyStoreError> {
        self.store.put(self.to_record(set)).await
    }

    /// Move the expiry (and removal time) of the stored record for `token`.
    pub async fn renew(&self, token: &str, expiry: Timestamp) -> Result<(), KeyStoreError> {
        self.store
            .update_expiry(token, expiry, self.removal_time(expiry))
            .await
    }

    /// Remove the stored record for `token`.
    pub async fn remove(&self, token: &str) -> Result<(), KeyStoreError> {
        self.store.delete(token).await
    }
}
