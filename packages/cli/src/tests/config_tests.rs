use crate::config::{Config, ConfigError};
use lispbook_config::constants::*;
use lispbook_storage::LedgerBackend;
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const ALL_VARS: &[&str] = &[
    LISPBOOK_HOST,
    PORT,
    LISPBOOK_PUBLIC_URL,
    LISPBOOK_PAGES_DIR,
    LISPBOOK_STATIC_DIR,
    LISPBOOK_ASSETS_DIR,
    LISPBOOK_PAGE_CACHE_TTL_SECS,
    LISPBOOK_LEDGER_BACKEND,
    LISPBOOK_LEDGER_PATH,
    LISPBOOK_TOKEN_VALIDITY_DAYS,
    LISPBOOK_VERIFY_URL,
    LISPBOOK_VERIFY_TIMEOUT_SECS,
    LISPBOOK_REJECTION_LOG,
    LISPBOOK_MAIL_API_URL,
    LISPBOOK_MAIL_API_KEY,
    LISPBOOK_MAIL_FROM,
    LISPBOOK_MAIL_TIMEOUT_SECS,
];

fn clear_env() {
    for var in ALL_VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_config_from_env_defaults() {
    clear_env();

    let config = Config::from_env().unwrap();

    assert_eq!(config.port, 5000);
    assert_eq!(config.host.to_string(), "127.0.0.1");
    assert_eq!(config.public_url, "http://localhost:5000");
    assert_eq!(
        config.ledger,
        LedgerBackend::File {
            path: PathBuf::from("purchases.txt")
        }
    );
    assert_eq!(config.token_validity, chrono::Duration::days(60));
    assert_eq!(config.page_cache_ttl, Duration::from_secs(60));
    assert_eq!(config.verify_url, "https://ipnpb.paypal.com/cgi-bin/webscr");
    assert_eq!(config.verify_timeout, Duration::from_secs(10));
    assert_eq!(config.rejection_log, PathBuf::from("ipn_errors.txt"));
    assert_eq!(config.mail.api_url, None);
    assert_eq!(config.mail.timeout, Duration::from_secs(10));
}

#[test]
#[serial]
fn test_config_custom_port_drives_public_url() {
    clear_env();
    env::set_var(PORT, "8080");

    let config = Config::from_env().unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.public_url, "http://localhost:8080");

    clear_env();
}

#[test]
#[serial]
fn test_config_explicit_public_url() {
    clear_env();
    env::set_var(LISPBOOK_PUBLIC_URL, "https://buildyourownlisp.com");

    let config = Config::from_env().unwrap();
    assert_eq!(config.public_url, "https://buildyourownlisp.com");

    clear_env();
}

#[test]
#[serial]
fn test_config_sqlite_backend_default_path() {
    clear_env();
    env::set_var(LISPBOOK_LEDGER_BACKEND, "sqlite");

    let config = Config::from_env().unwrap();
    assert_eq!(
        config.ledger,
        LedgerBackend::Sqlite {
            path: PathBuf::from("purchases.db")
        }
    );

    clear_env();
}

#[test]
#[serial]
fn test_config_invalid_backend() {
    clear_env();
    env::set_var(LISPBOOK_LEDGER_BACKEND, "postgres");

    let result = Config::from_env();
    assert!(matches!(
        result,
        Err(ConfigError::InvalidLedgerBackend(name)) if name == "postgres"
    ));

    clear_env();
}

#[test]
#[serial]
fn test_config_invalid_port() {
    clear_env();
    env::set_var(PORT, "not-a-number");

    let result = Config::from_env();
    assert!(matches!(result, Err(ConfigError::InvalidPort(_))));

    clear_env();
}

#[test]
#[serial]
fn test_config_port_zero() {
    clear_env();
    env::set_var(PORT, "0");

    let result = Config::from_env();
    assert!(matches!(result, Err(ConfigError::PortOutOfRange(0))));

    clear_env();
}

#[test]
#[serial]
fn test_config_invalid_numbers() {
    clear_env();
    env::set_var(LISPBOOK_VERIFY_TIMEOUT_SECS, "soon");
    assert!(matches!(
        Config::from_env(),
        Err(ConfigError::InvalidNumber { var, .. }) if var == LISPBOOK_VERIFY_TIMEOUT_SECS
    ));

    env::set_var(LISPBOOK_VERIFY_TIMEOUT_SECS, "0");
    assert!(Config::from_env().is_err());

    env::remove_var(LISPBOOK_VERIFY_TIMEOUT_SECS);
    env::set_var(LISPBOOK_TOKEN_VALIDITY_DAYS, "0");
    assert!(Config::from_env().is_err());

    clear_env();
}

#[test]
#[serial]
fn test_config_mail_settings() {
    clear_env();
    env::set_var(LISPBOOK_MAIL_API_URL, "https://mail.example.com/send");
    env::set_var(LISPBOOK_MAIL_API_KEY, "key");
    env::set_var(LISPBOOK_MAIL_FROM, "orders@example.com");

    let config = Config::from_env().unwrap();
    assert_eq!(
        config.mail.api_url.as_deref(),
        Some("https://mail.example.com/send")
    );
    assert_eq!(config.mail.api_key.as_deref(), Some("key"));
    assert_eq!(config.mail.from, "orders@example.com");

    clear_env();
}

#[test]
#[serial]
fn test_config_invalid_host() {
    clear_env();
    env::set_var(LISPBOOK_HOST, "localhost");

    assert!(matches!(
        Config::from_env(),
        Err(ConfigError::InvalidHost(_))
    ));

    clear_env();
}

#[test]
#[serial]
fn test_config_validity_days_out_of_range() {
    clear_env();

    for value in ["999999999999999", "18446744073709551615"] {
        env::set_var(LISPBOOK_TOKEN_VALIDITY_DAYS, value);
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidNumber { var, .. }) if var == LISPBOOK_TOKEN_VALIDITY_DAYS
        ));
    }

    env::set_var(LISPBOOK_TOKEN_VALIDITY_DAYS, "365");
    let config = Config::from_env().unwrap();
    assert_eq!(config.token_validity, chrono::Duration::days(365));

    clear_env();
}

#[test]
#[serial]
fn test_config_mail_timeout() {
    clear_env();
    env::set_var(LISPBOOK_MAIL_TIMEOUT_SECS, "3");
    assert_eq!(
        Config::from_env().unwrap().mail.timeout,
        Duration::from_secs(3)
    );

    env::set_var(LISPBOOK_MAIL_TIMEOUT_SECS, "0");
    assert!(matches!(
        Config::from_env(),
        Err(ConfigError::InvalidNumber { var, .. }) if var == LISPBOOK_MAIL_TIMEOUT_SECS
    ));

    clear_env();
}
