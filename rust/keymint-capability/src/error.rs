use thiserror::Error;

/// Errors raised while assembling capability machinery.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// Only one parser may be registered for each capability name.
    #[error("A parser is already registered for capability '{0}'")]
    DuplicateParser(String),
}
