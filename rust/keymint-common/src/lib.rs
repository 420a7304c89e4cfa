#![warn(missing_docs)]

//! Light weight helpers shared across the keymint crates: the millisecond
//! [`Timestamp`] used for key expiry, a cross-target [`ConditionalSync`]
//! bound, and [`Redacted`] for keeping whole tokens out of log lines.

mod sync;
pub use sync::*;

mod time;
pub use time::*;

mod redact;
pub use redact::*;
