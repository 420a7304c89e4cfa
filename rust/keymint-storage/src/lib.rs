#![warn(missing_docs)]

//! Storage for API key records.
//!
//! A [`KeyStore`] is a facade over whatever durable key-value substrate holds
//! [`KeyRecord`]s, addressed by token. Stores are expected to drop a record on
//! their own once its removal time has passed; the [`MemoryKeyStore`] emulates
//! that behaviour.
//!
//! Stores compose by wrapping: [`DeadlineKeyStore`] bounds every call by a
//! timeout and [`MeasuredKeyStore`] counts reads and writes.
//!
//! The [`Keyring`] sits on top of a store and converts between records and
//! [`keymint_capability::CapabilitySet`]s, using a
//! [`keymint_capability::ParserRegistry`] to decode capability data and a
//! retention period to derive removal times.

mod error;
pub use error::*;

mod record;
pub use record::*;

mod store;
pub use store::*;

mod keyring;
pub use keyring::*;
