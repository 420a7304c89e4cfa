use std::time::Duration;

use keymint_capability::{CapabilityError, Parser, ParserRegistry};
use serde::{Deserialize, Serialize};

use crate::Operation;

/// Engine configuration.
///
/// Every field has a default, so a partial document (or none at all)
/// deserializes into usable settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Capability required to mint keys.
    pub create_capability: String,
    /// Capability required to read keys.
    pub read_capability: String,
    /// Capability required to delete keys.
    pub delete_capability: String,
    /// Capability required to renew keys.
    pub renew_capability: String,
    /// Seconds a record is retained after it expires.
    pub retention_period: u64,
    /// Random bytes per generated token.
    pub token_size: usize,
    /// Milliseconds allowed for each key store call, unbounded when unset.
    pub store_timeout: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            create_capability: "keymint.key.create".into(),
            read_capability: "keymint.key.read".into(),
            delete_capability: "keymint.key.delete".into(),
            renew_capability: "keymint.key.renew".into(),
            retention_period: 2_592_000,
            token_size: 30,
            store_timeout: None,
        }
    }
}

impl Settings {
    /// Defaults overlaid with any `KEYMINT_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each
    /// `KEYMINT_*` variable name.
    ///
    /// Numbers that do not parse keep their default. A negative retention
    /// period counts as zero.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(name) = lookup("KEYMINT_CREATE_CAPABILITY") {
            settings.create_capability = name;
        }
        if let Some(name) = lookup("KEYMINT_READ_CAPABILITY") {
            settings.read_capability = name;
        }
        if let Some(name) = lookup("KEYMINT_DELETE_CAPABILITY") {
            settings.delete_capability = name;
        }
        if let Some(name) = lookup("KEYMINT_RENEW_CAPABILITY") {
            settings.renew_capability = name;
        }

        if let Some(value) = lookup("KEYMINT_RETENTION_PERIOD") {
            match value.trim().parse::<i64>() {
                Ok(seconds) => settings.retention_period = seconds.max(0).unsigned_abs(),
                Err(error) => tracing::warn!(
                    "Ignoring KEYMINT_RETENTION_PERIOD value '{value}': {error}"
                ),
            }
        }

        if let Some(value) = lookup("KEYMINT_TOKEN_SIZE") {
            match value.trim().parse::<usize>() {
                Ok(size) if size > 0 => settings.token_size = size,
                Ok(_) => tracing::warn!("Ignoring empty KEYMINT_TOKEN_SIZE"),
                Err(error) => {
                    tracing::warn!("Ignoring KEYMINT_TOKEN_SIZE value '{value}': {error}")
                }
            }
        }

        if let Some(value) = lookup("KEYMINT_STORE_TIMEOUT") {
            match value.trim().parse::<u64>() {
                Ok(millis) => settings.store_timeout = Some(millis),
                Err(error) => {
                    tracing::warn!("Ignoring KEYMINT_STORE_TIMEOUT value '{value}': {error}")
                }
            }
        }

        settings
    }

    /// The capability that guards `operation`.
    pub fn capability(&self, operation: Operation) -> &str {
        match operation {
            Operation::Create => &self.create_capability,
            Operation::Read => &self.read_capability,
            Operation::Delete => &self.delete_capability,
            Operation::Renew => &self.renew_capability,
        }
    }

    /// The retention period as a [`Duration`].
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_period)
    }

    /// The store deadline as a [`Duration`], if one is configured.
    pub fn store_deadline(&self) -> Option<Duration> {
        self.store_timeout.map(Duration::from_millis)
    }

    /// A parser registry with basic parsers for the management capabilities
    /// and a basic fallback for everything else.
    ///
    /// Fails if two operations are configured with the same capability name.
    pub fn registry(&self) -> Result<ParserRegistry, CapabilityError> {
        let mut registry = ParserRegistry::new().with_default(Parser::basic("default"));
        for operation in Operation::ALL {
            registry.register(Parser::basic(self.capability(operation)))?;
        }
        Ok(registry)
    }
}
