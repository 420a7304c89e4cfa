use std::collections::HashMap;

use crate::{Capability, CapabilityError, Parser, Tree};

/// Maps capability names to the parsers that decode them.
///
/// Names without a dedicated parser fall back to the default parser, when one
/// is configured. A registry is built once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct ParserRegistry {
    parsers: HashMap<String, Parser>,
    fallback: Option<Parser>,
}

impl ParserRegistry {
    /// An empty registry with no default parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dedicated parser under its own name.
    pub fn register(&mut self, parser: Parser) -> Result<(), CapabilityError> {
        let name = parser.name().to_string();
        if self.parsers.contains_key(&name) {
            return Err(CapabilityError::DuplicateParser(name));
        }
        self.parsers.insert(name, parser);
        Ok(())
    }

    /// Builder form of [`ParserRegistry::register`].
    pub fn with(mut self, parser: Parser) -> Result<Self, CapabilityError> {
        self.register(parser)?;
        Ok(self)
    }

    /// Set the parser used for names without a dedicated parser.
    pub fn set_default(&mut self, parser: Parser) {
        self.fallback = Some(parser);
    }

    /// Builder form of [`ParserRegistry::set_default`].
    pub fn with_default(mut self, parser: Parser) -> Self {
        self.set_default(parser);
        self
    }

    /// The fallback parser, if any.
    pub fn default_parser(&self) -> Option<&Parser> {
        self.fallback.as_ref()
    }

    /// The dedicated parser for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Parser> {
        self.parsers.get(name)
    }

    /// Parse the capability stored under `name`.
    ///
    /// Returns `None` when no parser applies or the parser declines the tree.
    pub fn parse<'a>(&self, name: &str, tree: impl Into<Tree<'a>>) -> Option<Capability> {
        match self.parsers.get(name) {
            Some(parser) => parser.parse(None, tree),
            None => self.fallback.as_ref()?.parse(Some(name), tree),
        }
    }
}
