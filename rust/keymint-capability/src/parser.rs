use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use keymint_common::ConditionalSync;

use crate::{Capability, CapabilityData, Tree};

/// Decodes the data of one kind of capability from an encoded tree.
///
/// Implementations are expected to be total: a tree they cannot make sense of
/// yields `None`, it never panics or errors. Whatever a parser yields it must
/// also be able to decode again from the capability's own
/// [`Capability::to_json`] and [`Capability::to_attribute`] encodings.
pub trait CapabilityParser: Debug + ConditionalSync {
    /// The name this parser is registered under, or a label for a fallback
    /// parser.
    fn name(&self) -> &str;

    /// Decode capability data from `tree`.
    fn decode(&self, tree: Tree<'_>) -> Option<CapabilityData>;
}

/// A shared handle to a [`CapabilityParser`].
///
/// Every [`Capability`] keeps the parser that produced it, so cloning a
/// parser must be cheap.
#[derive(Clone)]
pub struct Parser(Arc<dyn CapabilityParser>);

impl Parser {
    /// Wrap a parser implementation.
    pub fn new<P>(parser: P) -> Self
    where
        P: CapabilityParser + 'static,
    {
        Self(Arc::new(parser))
    }

    /// A [`BasicParser`] registered under `name`.
    pub fn basic(name: impl Into<String>) -> Self {
        Self::new(BasicParser::new(name))
    }

    /// The parser's registered name.
    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// Parse a capability from `tree`.
    ///
    /// Dedicated parsers are called without a name and the capability takes
    /// the parser's own name. The fallback parser is called with the map key
    /// the data was found under, and the capability takes that key.
    pub fn parse<'a>(&self, name: Option<&str>, tree: impl Into<Tree<'a>>) -> Option<Capability> {
        let data = self.0.decode(tree.into())?;
        let name = name.unwrap_or_else(|| self.name());
        Some(Capability::new(name, data, self.clone()))
    }
}

impl Debug for Parser {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Parser").field(&self.name()).finish()
    }
}

/// The stock parser: keeps the text, boolean and integer fields of an
/// object-shaped tree and ignores everything else.
#[derive(Debug, Clone)]
pub struct BasicParser {
    name: String,
}

impl BasicParser {
    /// Create a basic parser labelled `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl CapabilityParser for BasicParser {
    fn name(&self) -> &str {
        &self.name
    }

    fn decode(&self, tree: Tree<'_>) -> Option<CapabilityData> {
        tree.scalars()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use serde_json::json;

    /// Only accepts data that carries a `rate`.
    #[derive(Debug)]
    struct RateParser;

    impl CapabilityParser for RateParser {
        fn name(&self) -> &str {
            "app.rate"
        }

        fn decode(&self, tree: Tree<'_>) -> Option<CapabilityData> {
            let data = tree.scalars()?;
            data.get("rate")?.as_integer()?;
            Some(data)
        }
    }

    #[test]
    fn it_names_capabilities_after_a_dedicated_parser() {
        let parser = Parser::new(RateParser);
        let capability = parser.parse(None, &json!({ "rate": 3 })).unwrap();

        assert_eq!(capability.name(), "app.rate");
        assert_eq!(capability.get("rate"), Some(&Value::Integer(3)));
        assert_eq!(capability.parser().name(), "app.rate");
    }

    #[test]
    fn it_names_capabilities_after_the_key_for_a_fallback_parser() {
        let parser = Parser::basic("default");
        let capability = parser.parse(Some("app.other"), &json!({})).unwrap();

        assert_eq!(capability.name(), "app.other");
        assert!(capability.data().is_empty());
    }

    #[test]
    fn it_declines_trees_a_parser_rejects() {
        let parser = Parser::new(RateParser);
        assert!(parser.parse(None, &json!({ "region": "eu" })).is_none());
        assert!(parser.parse(None, &json!(7)).is_none());
    }
}
