// ABOUTME: Type definitions for purchase tokens and downloadable assets
// ABOUTME: Ledger record line format and the fixed set of e-book formats

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::utils::{format_timestamp, parse_timestamp};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Malformed ledger record: {0}")]
    MalformedRecord(String),

    #[error("Unknown download format: {0}")]
    UnknownFormat(String),
}

/// One issued purchase token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub issued_at: DateTime<Utc>,
    pub token: String,
}

impl TokenRecord {
    /// Build a record, dropping sub-second precision from `issued_at`
    pub fn new(token: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        let subsec = Duration::nanoseconds(i64::from(issued_at.timestamp_subsec_nanos()));
        Self {
            issued_at: issued_at - subsec,
            token: token.into(),
        }
    }

    /// True while `now - issued_at` is strictly less than `window`
    pub fn is_valid_at(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now.signed_duration_since(self.issued_at) < window
    }

    /// Render as a ledger line without the trailing newline
    pub fn to_line(&self) -> String {
        format!("{} {}", format_timestamp(self.issued_at), self.token)
    }

    /// Parse a ledger line of the form `<timestamp> <token>`
    pub fn parse_line(line: &str) -> Result<Self, CoreError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (stamp, token) = line
            .split_once(' ')
            .ok_or_else(|| CoreError::MalformedRecord(line.to_string()))?;

        let token = token.trim();
        if token.is_empty() || token.contains(' ') {
            return Err(CoreError::MalformedRecord(line.to_string()));
        }

        Ok(Self {
            issued_at: parse_timestamp(stamp)?,
            token: token.to_string(),
        })
    }
}

/// Downloadable e-book formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetFormat {
    Epub,
    Mobi,
    Pdf,
    /// Legacy source bundle, served but never emailed
    Tar,
}

impl AssetFormat {
    /// Formats linked in the purchase email, in link order
    pub const EMAILED: [AssetFormat; 3] = [AssetFormat::Epub, AssetFormat::Mobi, AssetFormat::Pdf];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetFormat::Epub => "epub",
            AssetFormat::Mobi => "mobi",
            AssetFormat::Pdf => "pdf",
            AssetFormat::Tar => "tar",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            AssetFormat::Epub => "application/epub+zip",
            AssetFormat::Mobi => "application/x-mobipocket-ebook",
            AssetFormat::Pdf => "application/pdf",
            AssetFormat::Tar => "application/x-tar",
        }
    }

    /// File name of the asset inside the assets directory
    pub fn file_name(&self) -> String {
        format!("BuildYourOwnLisp.{}", self.as_str())
    }
}

impl fmt::Display for AssetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "epub" => Ok(AssetFormat::Epub),
            "mobi" => Ok(AssetFormat::Mobi),
            "pdf" => Ok(AssetFormat::Pdf),
            "tar" => Ok(AssetFormat::Tar),
            _ => Err(CoreError::UnknownFormat(s.to_string())),
        }
    }
}
