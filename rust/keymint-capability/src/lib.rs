#![warn(missing_docs)]

//! Capability grants carried by API keys.
//!
//! Every API key names a [`CapabilitySet`]: the key's token, the chain of
//! tokens it was delegated from, an expiry and a map of named
//! [`Capability`] grants. A capability is a flat bag of scalar [`Value`]s
//! (text, boolean or integer) plus a reference to the [`Parser`] that
//! produced it.
//!
//! # Quick Example
//!
//! ```rust
//! use keymint_capability::{CapabilitySet, Parser, ParserRegistry, Value};
//! use keymint_common::Timestamp;
//! use serde_json::json;
//!
//! let registry = ParserRegistry::new()
//!     .with_default(Parser::basic("default"));
//!
//! let rate = json!({ "rate": 5, "region": "eu", "nested": { "ignored": true } });
//! let capability = registry.parse("app.limits", &rate).unwrap();
//!
//! // Unsupported shapes are dropped rather than rejected.
//! assert_eq!(capability.integer("rate"), Some(5));
//! assert_eq!(capability.get("nested"), None);
//!
//! let set = CapabilitySet::new("token", vec!["root".into()], Timestamp::FAR_FUTURE, None)
//!     .with(capability);
//! assert!(set.holds("app.limits", Timestamp::now()));
//! ```
//!
//! # Encoded trees
//!
//! Capability data arrives in one of two encodings, both described by
//! [`Tree`]:
//!
//! - a JSON tree ([`serde_json::Value`]), as found in request bodies and
//!   read responses;
//! - an [`Attribute`] tree, the typed document encoding used for persisted
//!   key records.
//!
//! Only object-shaped trees decode. Within an object, keys whose values are
//! not text, boolean or integer are skipped so that records written by a
//! newer schema remain readable.
//!
//! # Delegation merge
//!
//! When one key mints another, the authority's capability data is merged into
//! the requested data with [`merge`]. The direction is controlled by the
//! authority's capability lock; see [`merge`] for the exact rule.

mod error;
pub use error::*;

mod value;
pub use value::*;

mod attribute;
pub use attribute::*;

mod tree;
pub use tree::*;

mod merge;
pub use merge::*;

mod parser;
pub use parser::*;

mod capability;
pub use capability::*;

mod registry;
pub use registry::*;

mod set;
pub use set::*;
