use chrono::Duration;

/// Number of characters in a purchase token
pub const TOKEN_LENGTH: usize = 25;

/// Characters a purchase token is drawn from
pub const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Days a purchase token keeps authorizing downloads
pub const VALIDITY_DAYS: i64 = 60;

/// Ledger timestamp layout, e.g. `2024-01-01-00:00:00`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H:%M:%S";

/// The validity window as a duration
pub fn default_validity_window() -> Duration {
    Duration::days(VALIDITY_DAYS)
}
