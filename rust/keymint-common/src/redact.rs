use std::fmt::{Display, Formatter};

/// Displays only the first few characters of a token, for log lines.
///
/// ```rust
/// use keymint_common::Redacted;
///
/// assert_eq!(Redacted("abcdefghijkl").to_string(), "abcdef…");
/// assert_eq!(Redacted("abc").to_string(), "abc");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Redacted<'a>(pub &'a str);

impl Redacted<'_> {
    const VISIBLE: usize = 6;
}

impl Display for Redacted<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0.char_indices().nth(Self::VISIBLE) {
            Some((end, _)) => write!(f, "{}…", &self.0[..end]),
            None => write!(f, "{}", self.0),
        }
    }
}
