use keymint_common::Timestamp;

/// The expiry of a key minted or renewed at `now` under an authority
/// expiring at `ceiling`.
///
/// With no lifetime the key inherits `ceiling`. Otherwise it expires
/// `lifetime` seconds after `now`, but never later than `ceiling`.
pub fn bounded_expiry(now: Timestamp, lifetime: Option<i64>, ceiling: Timestamp) -> Timestamp {
    match lifetime {
        None => ceiling,
        Some(seconds) => now.saturating_add_seconds(seconds).min(ceiling),
    }
}
