// ABOUTME: Environment variable name constants and defaults
// ABOUTME: Centralized definitions of all environment variable names used across lispbook

// Server Configuration
pub const LISPBOOK_HOST: &str = "LISPBOOK_HOST";
pub const PORT: &str = "PORT";
pub const LISPBOOK_PUBLIC_URL: &str = "LISPBOOK_PUBLIC_URL";

// Content Locations
pub const LISPBOOK_PAGES_DIR: &str = "LISPBOOK_PAGES_DIR";
pub const LISPBOOK_STATIC_DIR: &str = "LISPBOOK_STATIC_DIR";
pub const LISPBOOK_ASSETS_DIR: &str = "LISPBOOK_ASSETS_DIR";

// Page Cache
pub const LISPBOOK_PAGE_CACHE_TTL_SECS: &str = "LISPBOOK_PAGE_CACHE_TTL_SECS";

// Purchase Ledger
pub const LISPBOOK_LEDGER_BACKEND: &str = "LISPBOOK_LEDGER_BACKEND";
pub const LISPBOOK_LEDGER_PATH: &str = "LISPBOOK_LEDGER_PATH";
pub const LISPBOOK_TOKEN_VALIDITY_DAYS: &str = "LISPBOOK_TOKEN_VALIDITY_DAYS";

// Payment Verification
pub const LISPBOOK_VERIFY_URL: &str = "LISPBOOK_VERIFY_URL";
pub const LISPBOOK_VERIFY_TIMEOUT_SECS: &str = "LISPBOOK_VERIFY_TIMEOUT_SECS";
pub const LISPBOOK_REJECTION_LOG: &str = "LISPBOOK_REJECTION_LOG";

// Outbound Mail
pub const LISPBOOK_MAIL_API_URL: &str = "LISPBOOK_MAIL_API_URL";
pub const LISPBOOK_MAIL_API_KEY: &str = "LISPBOOK_MAIL_API_KEY";
pub const LISPBOOK_MAIL_FROM: &str = "LISPBOOK_MAIL_FROM";
pub const LISPBOOK_MAIL_TIMEOUT_SECS: &str = "LISPBOOK_MAIL_TIMEOUT_SECS";

// Defaults
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_PAGES_DIR: &str = ".";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_ASSETS_DIR: &str = "downloads";
pub const DEFAULT_PAGE_CACHE_TTL_SECS: u64 = 60;
pub const DEFAULT_FILE_LEDGER_PATH: &str = "purchases.txt";
pub const DEFAULT_SQLITE_LEDGER_PATH: &str = "purchases.db";
pub const DEFAULT_REJECTION_LOG: &str = "ipn_errors.txt";
pub const DEFAULT_VERIFY_URL: &str = "https://ipnpb.paypal.com/cgi-bin/webscr";
pub const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAIL_FROM: &str = "books@buildyourownlisp.com";
pub const DEFAULT_MAIL_TIMEOUT_SECS: u64 = 10;
