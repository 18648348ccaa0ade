use std::env;
use std::net::IpAddr;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use lispbook_config::constants::*;
use lispbook_storage::{LedgerBackend, LedgerKind};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(String),
    #[error("Invalid value for {var}: {value}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("Invalid ledger backend: {0}")]
    InvalidLedgerBackend(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MailConfig {
    /// Transactional mail endpoint; `None` logs messages instead of sending
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub from: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub public_url: String,
    pub pages_dir: PathBuf,
    pub static_dir: PathBuf,
    pub assets_dir: PathBuf,
    pub page_cache_ttl: Duration,
    pub ledger: LedgerBackend,
    pub token_validity: chrono::Duration,
    pub rejection_log: PathBuf,
    pub verify_url: String,
    pub verify_timeout: Duration,
    pub mail: MailConfig,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn number_var(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(value) => value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
            var: name,
            value,
        }),
        Err(_) => Ok(default),
    }
}

/// Timeout in whole seconds; zero would disable the bound
fn positive_secs(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    match number_var(name, default)? {
        0 => Err(ConfigError::InvalidNumber {
            var: name,
            value: "0".to_string(),
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = var_or(PORT, &DEFAULT_PORT.to_string()).parse::<u16>()?;

        // Validate port is in valid range
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let host_str = var_or(LISPBOOK_HOST, DEFAULT_HOST);
        let host = host_str
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidHost(host_str.clone()))?;

        let public_url = optional_var(LISPBOOK_PUBLIC_URL)
            .unwrap_or_else(|| format!("http://localhost:{}", port));

        let backend_str = var_or(LISPBOOK_LEDGER_BACKEND, "file");
        let kind = backend_str
            .parse::<LedgerKind>()
            .map_err(|_| ConfigError::InvalidLedgerBackend(backend_str.clone()))?;
        let ledger = match kind {
            LedgerKind::File => LedgerBackend::File {
                path: PathBuf::from(var_or(LISPBOOK_LEDGER_PATH, DEFAULT_FILE_LEDGER_PATH)),
            },
            LedgerKind::Sqlite => LedgerBackend::Sqlite {
                path: PathBuf::from(var_or(LISPBOOK_LEDGER_PATH, DEFAULT_SQLITE_LEDGER_PATH)),
            },
        };

        let validity_days = number_var(
            LISPBOOK_TOKEN_VALIDITY_DAYS,
            lispbook_core::VALIDITY_DAYS as u64,
        )?;
        let token_validity = i64::try_from(validity_days)
            .ok()
            .filter(|days| *days > 0)
            .and_then(chrono::Duration::try_days)
            .ok_or_else(|| ConfigError::InvalidNumber {
                var: LISPBOOK_TOKEN_VALIDITY_DAYS,
                value: validity_days.to_string(),
            })?;

        let verify_timeout = positive_secs(LISPBOOK_VERIFY_TIMEOUT_SECS, DEFAULT_VERIFY_TIMEOUT_SECS)?;
        let mail_timeout = positive_secs(LISPBOOK_MAIL_TIMEOUT_SECS, DEFAULT_MAIL_TIMEOUT_SECS)?;

        Ok(Config {
            host,
            port,
            public_url,
            pages_dir: PathBuf::from(var_or(LISPBOOK_PAGES_DIR, DEFAULT_PAGES_DIR)),
            static_dir: PathBuf::from(var_or(LISPBOOK_STATIC_DIR, DEFAULT_STATIC_DIR)),
            assets_dir: PathBuf::from(var_or(LISPBOOK_ASSETS_DIR, DEFAULT_ASSETS_DIR)),
            page_cache_ttl: Duration::from_secs(number_var(
                LISPBOOK_PAGE_CACHE_TTL_SECS,
                DEFAULT_PAGE_CACHE_TTL_SECS,
            )?),
            ledger,
            token_validity,
            rejection_log: PathBuf::from(var_or(LISPBOOK_REJECTION_LOG, DEFAULT_REJECTION_LOG)),
            verify_url: var_or(LISPBOOK_VERIFY_URL, DEFAULT_VERIFY_URL),
            verify_timeout,
            mail: MailConfig {
                api_url: optional_var(LISPBOOK_MAIL_API_URL),
                api_key: optional_var(LISPBOOK_MAIL_API_KEY),
                from: var_or(LISPBOOK_MAIL_FROM, DEFAULT_MAIL_FROM),
                timeout: mail_timeout,
            },
        })
    }
}
