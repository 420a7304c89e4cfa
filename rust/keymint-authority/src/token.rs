use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use keymint_common::ConditionalSync;
use rand::{RngCore, rngs::OsRng};

/// Produces the tokens that name newly minted keys.
pub trait TokenSource: ConditionalSync {
    /// A fresh token.
    fn generate(&self) -> String;
}

/// Tokens drawn from the operating system's secure random source, rendered
/// as URL-safe base64.
#[derive(Debug, Clone, Copy)]
pub struct RandomTokens {
    size: usize,
}

impl RandomTokens {
    /// Tokens of `size` random bytes.
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Random bytes per token.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Default for RandomTokens {
    fn default() -> Self {
        Self::new(30)
    }
}

impl TokenSource for RandomTokens {
    fn generate(&self) -> String {
        let mut bytes = vec![0u8; self.size];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE.encode(bytes)
    }
}
