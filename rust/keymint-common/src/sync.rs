//! Thread-safety bounds that relax on `wasm32` targets.
//!
//! Key stores, token sources and capability parsers are shared between tasks
//! on native targets and must be `Send + Sync` there. On `wasm32` everything
//! runs on a single thread and implementations may hold handles that are
//! neither, so the bound disappears.

#[cfg(not(target_arch = "wasm32"))]
mod bound {
    /// `Send + Sync` on native targets; no bound on `wasm32`.
    pub trait ConditionalSync: Send + Sync {}

    impl<T> ConditionalSync for T where T: Send + Sync + ?Sized {}
}

#[cfg(target_arch = "wasm32")]
mod bound {
    /// `Send + Sync` on native targets; no bound on `wasm32`.
    pub trait ConditionalSync {}

    impl<T> ConditionalSync for T where T: ?Sized {}
}

pub use bound::ConditionalSync;
