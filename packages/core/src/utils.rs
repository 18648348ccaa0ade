// ABOUTME: Shared utility functions for lispbook
// ABOUTME: Token generation and ledger timestamp formatting

use chrono::{DateTime, NaiveDateTime, Utc};
use rand::Rng;

use crate::constants::{TIMESTAMP_FORMAT, TOKEN_ALPHABET, TOKEN_LENGTH};
use crate::types::CoreError;

/// Generate a purchase token: 25 lowercase letters, each drawn uniformly
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..TOKEN_ALPHABET.len());
            TOKEN_ALPHABET[idx] as char
        })
        .collect()
}

/// Checks that a string has the shape of a generated token
pub fn is_well_formed_token(token: &str) -> bool {
    token.len() == TOKEN_LENGTH && token.bytes().all(|b| b.is_ascii_lowercase())
}

/// Format a timestamp the way the ledger stores it (UTC, second precision)
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a ledger timestamp as UTC
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, CoreError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| CoreError::InvalidTimestamp(raw.to_string()))
}
