// ABOUTME: Core types, constants, and utilities shared by the lispbook packages
// ABOUTME: Purchase tokens, download formats, and ledger timestamp handling

pub mod constants;
pub mod types;
pub mod utils;

// Re-export main types
pub use types::{AssetFormat, CoreError, TokenRecord};

// Re-export constants
pub use constants::{
    default_validity_window, TIMESTAMP_FORMAT, TOKEN_ALPHABET, TOKEN_LENGTH, VALIDITY_DAYS,
};

// Re-export utilities
pub use utils::{format_timestamp, generate_token, is_well_formed_token, parse_timestamp};
