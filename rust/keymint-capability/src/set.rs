use std::collections::BTreeMap;

use keymint_common::Timestamp;

use crate::Capability;

/// The full record behind one API key.
///
/// The authority chain lists every token the key was delegated through,
/// oldest first: the first entry is the root anchor and the last is the key's
/// direct parent. A root anchor has an empty chain.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilitySet {
    token: String,
    authority_chain: Vec<String>,
    expiry: Timestamp,
    description: Option<String>,
    capabilities: BTreeMap<String, Capability>,
}

impl CapabilitySet {
    /// A capability set without capabilities.
    pub fn new(
        token: impl Into<String>,
        authority_chain: Vec<String>,
        expiry: Timestamp,
        description: Option<String>,
    ) -> Self {
        Self {
            token: token.into(),
            authority_chain,
            expiry,
            description,
            capabilities: BTreeMap::new(),
        }
    }

    /// Add a capability, replacing (and returning) any previous one with the
    /// same name.
    pub fn insert(&mut self, capability: Capability) -> Option<Capability> {
        self.capabilities
            .insert(capability.name().to_string(), capability)
    }

    /// Builder form of [`CapabilitySet::insert`].
    pub fn with(mut self, capability: Capability) -> Self {
        self.insert(capability);
        self
    }

    /// The key's token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Tokens this key was delegated through, root first.
    pub fn authority_chain(&self) -> &[String] {
        &self.authority_chain
    }

    /// The direct parent, if this is not a root anchor.
    pub fn parent(&self) -> Option<&str> {
        self.authority_chain.last().map(String::as_str)
    }

    /// The root anchor this key descends from. A root anchor is its own root.
    pub fn root(&self) -> &str {
        self.authority_chain
            .first()
            .map(String::as_str)
            .unwrap_or(self.token.as_str())
    }

    /// The chain a key delegated from this one carries.
    pub fn delegated_chain(&self) -> Vec<String> {
        let mut chain = self.authority_chain.clone();
        chain.push(self.token.clone());
        chain
    }

    /// When this key stops granting anything.
    pub fn expiry(&self) -> Timestamp {
        self.expiry
    }

    /// Free-form text supplied by the creator.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// A key is usable up to and including its expiry instant.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now > self.expiry
    }

    /// The stored capability named `name`, regardless of expiry.
    pub fn get(&self, name: &str) -> Option<&Capability> {
        self.capabilities.get(name)
    }

    /// Whether a capability named `name` is stored, regardless of expiry.
    pub fn has(&self, name: &str) -> bool {
        self.capabilities.contains_key(name)
    }

    /// Every stored capability, regardless of expiry.
    pub fn capabilities(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.values()
    }

    /// The capability named `name` as granted at `now`. An expired key grants
    /// nothing.
    pub fn grant(&self, name: &str, now: Timestamp) -> Option<&Capability> {
        if self.is_expired_at(now) {
            return None;
        }
        self.capabilities.get(name)
    }

    /// Whether the key grants `name` at `now`.
    pub fn holds(&self, name: &str, now: Timestamp) -> bool {
        self.grant(name, now).is_some()
    }

    /// Every capability granted at `now`.
    pub fn grants(&self, now: Timestamp) -> impl Iterator<Item = &Capability> {
        let live = !self.is_expired_at(now);
        self.capabilities.values().filter(move |_| live)
    }

    /// Number of stored capabilities.
    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    /// Whether no capabilities are stored.
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

impl Extend<Capability> for CapabilitySet {
    fn extend<I: IntoIterator<Item = Capability>>(&mut self, capabilities: I) {
        for capability in capabilities {
            self.insert(capability);
        }
    }
}
