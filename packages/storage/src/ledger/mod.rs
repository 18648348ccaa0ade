use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use lispbook_core::TokenRecord;

use crate::{StorageError, StorageResult};

pub mod file;
pub mod sqlite;

pub use file::FileLedger;
pub use sqlite::SqliteLedger;

/// Append-only record of issued purchase tokens
///
/// `issue` is the only mutation. Implementations must serialize concurrent
/// appends so no record is lost or interleaved; readers may miss an append
/// that completes while they are reading.
#[async_trait]
pub trait PurchaseLedger: Send + Sync {
    /// Durably append a token. Returns only after the record is persisted.
    async fn issue(&self, token: &str, issued_at: DateTime<Utc>) -> StorageResult<TokenRecord>;

    /// Every record in issuance order
    async fn records(&self) -> StorageResult<Vec<TokenRecord>>;

    /// Tokens whose `issued_at` lies within `window` of `now`
    async fn all_valid(
        &self,
        now: DateTime<Utc>,
        window: Duration,
    ) -> StorageResult<HashSet<String>> {
        Ok(self
            .records()
            .await?
            .into_iter()
            .filter(|record| record.is_valid_at(now, window))
            .map(|record| record.token)
            .collect())
    }

    fn backend_name(&self) -> &'static str;
}

/// Where the ledger lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerBackend {
    /// Flat file, one `<timestamp> <token>` line per purchase
    File { path: PathBuf },
    /// SQLite database file
    Sqlite { path: PathBuf },
}

impl LedgerBackend {
    pub fn path(&self) -> &PathBuf {
        match self {
            LedgerBackend::File { path } | LedgerBackend::Sqlite { path } => path,
        }
    }
}

/// Backend kinds accepted in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    File,
    Sqlite,
}

impl FromStr for LedgerKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(LedgerKind::File),
            "sqlite" => Ok(LedgerKind::Sqlite),
            _ => Err(StorageError::UnknownBackend(s.to_string())),
        }
    }
}

/// Open the configured ledger backend
pub async fn open_ledger(backend: &LedgerBackend) -> StorageResult<Arc<dyn PurchaseLedger>> {
    match backend {
        LedgerBackend::File { path } => Ok(Arc::new(FileLedger::new(path.clone()))),
        LedgerBackend::Sqlite { path } => Ok(Arc::new(SqliteLedger::open(path).await?)),
    }
}
