#![warn(missing_docs)]

//! The authorization and delegation engine behind capability scoped API keys.
//!
//! Every operation is invoked with an *authority token*, the key the caller
//! presents to prove its own rights. Operations that address another key also
//! take a *target token*. The [`Engine`] loads the records involved, refuses
//! authorities that are missing, expired or lack the operation's designated
//! capability, and then:
//!
//! - **create** mints a new key delegated from the authority, merging the
//!   authority's capability data into the requested data according to the
//!   authority's capability lock (see [`delegate`]);
//! - **read** reports a target key's expiry, description and those of its
//!   capabilities the authority also holds (see [`project`]);
//! - **delete** removes a target key, without touching keys delegated from it;
//! - **renew** moves a target key's expiry, never past the authority's own.
//!
//! Failures are reported as an [`AuthorityError`], which classifies into one of
//! four [`ErrorKind`]s, each tied to a status code for the transport layer.
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use keymint_authority::{CreateRequest, Engine, Settings};
//! use keymint_storage::MemoryKeyStore;
//! use serde_json::json;
//!
//! let engine = Engine::open(MemoryKeyStore::new(), Settings::from_env())?;
//! let root = engine.provision_root(Default::default()).await?;
//!
//! let request = CreateRequest::from_json(&json!({
//!     "capabilitySet": { "keymint.key.read": {} },
//!     "lifetime": 3600
//! }))?;
//! let created = engine.create(&root.token, request).await?;
//!
//! let status = engine.read(&root.token, &created.token).await?;
//! assert!(status.capability_set.contains_key("keymint.key.read"));
//! # Ok(())
//! # }
//! ```

mod error;
pub use error::*;

mod operation;
pub use operation::*;

mod settings;
pub use settings::*;

mod token;
pub use token::*;

mod request;
pub use request::*;

mod response;
pub use response::*;

mod expiry;
pub use expiry::*;

mod create;
pub use create::*;

mod read;
pub use read::*;

mod engine;
pub use engine::*;
