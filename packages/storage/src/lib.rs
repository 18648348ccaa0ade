// ABOUTME: Data layer for lispbook purchases
// ABOUTME: Append-only purchase ledger backends and the download token validator

use thiserror::Error;

pub mod ledger;
pub mod validator;

pub use ledger::{
    open_ledger, FileLedger, LedgerBackend, LedgerKind, PurchaseLedger, SqliteLedger,
};
pub use validator::TokenValidator;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Failed to lock ledger file: {0}")]
    Lock(#[source] std::io::Error),

    #[error("Ledger task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Unknown ledger backend: {0}")]
    UnknownBackend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
