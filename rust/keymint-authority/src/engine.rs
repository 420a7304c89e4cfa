use std::sync::Arc;

use keymint_capability::{Capability, CapabilityError, CapabilitySet, Parser};
use keymint_common::{Redacted, Timestamp};
#[cfg(not(target_arch = "wasm32"))]
use keymint_storage::DeadlineKeyStore;
use keymint_storage::{KeyStore, KeyStoreError, Keyring};
use serde_json::{Map, Value as Json, json};

use crate::{
    AuthorityError, CAPABILITY_LOCK, CapabilityStatus, CreateRequest, Created, KeyStatus,
    Operation, Permissions, RandomTokens, RenewRequest, Settings, Status, TokenSource,
    bounded_expiry, delegate, project,
};

/// The description given to root anchors.
pub const ROOT_DESCRIPTION: &str = "API key manager root capability set";

/// Decides and applies key management operations.
///
/// The engine holds no per-operation state: every call reloads the records
/// it needs from the keyring and nothing is cached between calls.
#[derive(Clone)]
pub struct Engine<S, T = RandomTokens> {
    keyring: Keyring<S>,
    tokens: T,
    settings: Settings,
}

impl Engine<Arc<dyn KeyStore>> {
    /// An engine over `store`, configured entirely from `settings`.
    ///
    /// Store calls are bounded by the configured store timeout, when there is
    /// one.
    pub fn open<S>(store: S, settings: Settings) -> Result<Self, CapabilityError>
    where
        S: KeyStore + 'static,
    {
        let store: Arc<dyn KeyStore> = match settings.store_deadline() {
            #[cfg(not(target_arch = "wasm32"))]
            Some(deadline) => Arc::new(DeadlineKeyStore::new(store, deadline)),
            _ => Arc::new(store),
        };
        let keyring = Keyring::new(store, settings.registry()?).with_retention(settings.retention());
        Ok(Self::new(keyring, settings))
    }
}

impl<S> Engine<S>
where
    S: KeyStore,
{
    /// An engine over `keyring` that mints tokens of the configured size.
    pub fn new(keyring: Keyring<S>, settings: Settings) -> Self {
        Self {
            keyring,
            tokens: RandomTokens::new(settings.token_size),
            settings,
        }
    }
}

impl<S, T> Engine<S, T>
where
    S: KeyStore,
    T: TokenSource,
{
    /// Replace the token source.
    pub fn with_tokens<U>(self, tokens: U) -> Engine<S, U>
    where
        U: TokenSource,
    {
        Engine {
            keyring: self.keyring,
            tokens,
            settings: self.settings,
        }
    }

    /// The keyring records are loaded from and saved to.
    pub fn keyring(&self) -> &Keyring<S> {
        &self.keyring
    }

    /// The engine's configuration.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mint a key delegated from `authority`. See [`delegate`] for how the
    /// new key's capabilities are decided.
    pub async fn create(
        &self,
        authority: &str,
        request: CreateRequest,
    ) -> Result<Created, AuthorityError> {
        let now = Timestamp::now();
        let loaded = self.keyring.load(authority).await?;
        let authority = self.authorize(authority, loaded, Operation::Create, now)?;

        let delegated = delegate(
            &authority,
            self.tokens.generate(),
            &request,
            self.settings.capability(Operation::Create),
            self.keyring.parsers(),
            now,
        )?;

        self.keyring.save(&delegated).await?;

        tracing::info!(
            token = %Redacted(delegated.token()),
            authority = %Redacted(authority.token()),
            capabilities = delegated.len(),
            expiry = %delegated.expiry(),
            "Minted API key"
        );

        Ok(Created::new(delegated.token().to_string()))
    }

    /// Report `target` as far as `authority` may see it. See [`project`].
    pub async fn read(&self, authority: &str, target: &str) -> Result<KeyStatus, AuthorityError> {
        let now = Timestamp::now();
        let (loaded, target) = self.fetch_pair(authority, target).await?;
        let authority = self.authorize(authority, loaded, Operation::Read, now)?;
        let target = target.ok_or(AuthorityError::NotFound)?;

        let status = project(&authority, &target, now);
        tracing::debug!(
            key = %Redacted(target.token()),
            visible = status.capability_set.len(),
            stored = target.len(),
            "Projected API key"
        );

        Ok(status)
    }

    /// Remove `target`. Keys delegated from it are left in place.
    pub async fn delete(&self, authority: &str, target: &str) -> Result<Status, AuthorityError> {
        let now = Timestamp::now();
        let (loaded, found) = self.fetch_pair(authority, target).await?;
        let authority = self.authorize(authority, loaded, Operation::Delete, now)?;
        if found.is_none() {
            return Err(AuthorityError::NotFound);
        }

        self.keyring.remove(target).await?;

        tracing::info!(
            token = %Redacted(target),
            authority = %Redacted(authority.token()),
            "Deleted API key"
        );

        Ok(Status::new("Deleted API key"))
    }

    /// Move the expiry of `target`, never past the authority's own expiry.
    /// Capability data is left untouched.
    pub async fn renew(
        &self,
        authority: &str,
        target: &str,
        request: RenewRequest,
    ) -> Result<Status, AuthorityError> {
        let now = Timestamp::now();
        let (loaded, found) = self.fetch_pair(authority, target).await?;
        let authority = self.authorize(authority, loaded, Operation::Renew, now)?;
        if found.is_none() {
            return Err(AuthorityError::NotFound);
        }

        let expiry = bounded_expiry(now, request.lifetime, authority.expiry());
        match self.keyring.renew(target, expiry).await {
            Ok(()) => {}
            Err(KeyStoreError::Missing(_)) => return Err(AuthorityError::NotFound),
            Err(error) => return Err(error.into()),
        }

        tracing::info!(
            token = %Redacted(target),
            authority = %Redacted(authority.token()),
            %expiry,
            "Renewed API key"
        );

        Ok(Status::new("Renewed API key"))
    }

    /// The management operations `authority` may currently perform.
    ///
    /// An authority that may perform none of them is refused outright.
    pub async fn permissions(&self, authority: &str) -> Result<Permissions, AuthorityError> {
        let now = Timestamp::now();
        let loaded = self.keyring.load(authority).await?;
        let authority = self.admit(authority, loaded, now)?;

        let operations: Vec<Operation> = Operation::ALL
            .into_iter()
            .filter(|operation| authority.holds(self.settings.capability(*operation), now))
            .collect();

        if operations.is_empty() {
            return Err(AuthorityError::unauthorized(
                "Required API key access capability not found",
            ));
        }

        Ok(Permissions { operations })
    }

    /// Whether `token` currently holds `capability`.
    ///
    /// Missing and expired keys produce a refusal rather than an error; only
    /// a store failure is reported as one.
    pub async fn check(
        &self,
        token: &str,
        capability: &str,
    ) -> Result<CapabilityStatus, AuthorityError> {
        let now = Timestamp::now();
        let status = match self.keyring.load(token).await? {
            None => CapabilityStatus::refused(capability, "API key not found"),
            Some(set) if set.is_expired_at(now) => {
                CapabilityStatus::refused(capability, "API key grant has expired")
            }
            Some(set) => match set.grant(capability, now) {
                Some(granted) => CapabilityStatus::granted(capability, granted.data().clone()),
                None => CapabilityStatus::refused(capability, "API key capability not found"),
            },
        };
        Ok(status)
    }

    /// Mint a root anchor: a key with no authority chain that never expires
    /// in practice.
    ///
    /// `capabilities` maps capability names to their data. Any management
    /// capability it leaves out is added with default data, so the root can
    /// always create, read, delete and renew.
    pub async fn provision_root(
        &self,
        capabilities: Map<String, Json>,
    ) -> Result<Created, AuthorityError> {
        let mut root = CapabilitySet::new(
            self.tokens.generate(),
            vec![],
            Timestamp::FAR_FUTURE,
            Some(ROOT_DESCRIPTION.to_string()),
        );

        for (name, data) in &capabilities {
            if !data.is_object() {
                return Err(AuthorityError::invalid(format!(
                    "Invalid root capability '{name}'"
                )));
            }
            match self.keyring.parsers().parse(name, data) {
                Some(capability) => {
                    root.insert(capability);
                }
                None => tracing::warn!(capability = %name, "Skipping unparseable root capability"),
            }
        }

        for operation in Operation::ALL {
            let name = self.settings.capability(operation);
            if !root.has(name) {
                let data = match operation {
                    Operation::Create => json!({ CAPABILITY_LOCK: false }),
                    _ => json!({}),
                };
                if let Some(capability) = self.management_capability(name, &data) {
                    root.insert(capability);
                }
            }
        }

        self.keyring.save(&root).await?;

        tracing::info!(
            token = %Redacted(root.token()),
            capabilities = root.len(),
            "Provisioned root API key"
        );

        Ok(Created::new(root.token().to_string()))
    }

    /// Management capabilities fall back to a basic parser of their own when
    /// the registry has none that applies.
    fn management_capability(&self, name: &str, data: &Json) -> Option<Capability> {
        self.keyring
            .parsers()
            .parse(name, data)
            .or_else(|| Parser::basic(name).parse(None, data))
    }

    /// Load the authority and the target together. The same record is only
    /// loaded once when both tokens are equal.
    async fn fetch_pair(
        &self,
        authority: &str,
        target: &str,
    ) -> Result<(Option<CapabilitySet>, Option<CapabilitySet>), AuthorityError> {
        if authority == target {
            let loaded = self.keyring.load(authority).await?;
            return Ok((loaded.clone(), loaded));
        }

        let (authority, target) =
            futures::future::try_join(self.keyring.load(authority), self.keyring.load(target))
                .await?;
        Ok((authority, target))
    }

    /// Refuse missing and expired authorities.
    fn admit(
        &self,
        token: &str,
        loaded: Option<CapabilitySet>,
        now: Timestamp,
    ) -> Result<CapabilitySet, AuthorityError> {
        let Some(authority) = loaded else {
            tracing::debug!(authority = %Redacted(token), "Authority not found");
            return Err(AuthorityError::unauthorized(
                "API authorization key not found",
            ));
        };

        if authority.is_expired_at(now) {
            tracing::debug!(authority = %Redacted(token), "Authority has expired");
            return Err(AuthorityError::unauthorized(
                "API authorization key grant has expired",
            ));
        }

        Ok(authority)
    }

    /// Refuse authorities that are missing, expired or lack the capability
    /// guarding `operation`.
    fn authorize(
        &self,
        token: &str,
        loaded: Option<CapabilitySet>,
        operation: Operation,
        now: Timestamp,
    ) -> Result<CapabilitySet, AuthorityError> {
        let authority = self.admit(token, loaded, now)?;

        if !authority.holds(self.settings.capability(operation), now) {
            tracing::debug!(authority = %Redacted(token), %operation, "Authority lacks capability");
            return Err(AuthorityError::unauthorized(format!(
                "Required API key {operation} capability not found"
            )));
        }

        tracing::debug!(authority = %Redacted(token), %operation, "Authority admitted");
        Ok(authority)
    }
}
