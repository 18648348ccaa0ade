// ABOUTME: Flat-file purchase ledger
// ABOUTME: Appends `<timestamp> <token>` lines under an in-process mutex and an advisory file lock

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use lispbook_core::TokenRecord;

use super::PurchaseLedger;
use crate::{StorageError, StorageResult};

pub struct FileLedger {
    path: PathBuf,
    // Serializes appends within this process; the file lock covers other processes.
    append_lock: Mutex<()>,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write one complete line with `O_APPEND` while holding an exclusive lock
fn append_line(path: &Path, line: &str) -> StorageResult<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    FileExt::lock_exclusive(&file).map_err(StorageError::Lock)?;
    let written = file
        .write_all(line.as_bytes())
        .and_then(|_| file.sync_data());
    let unlocked = FileExt::unlock(&file);

    written?;
    unlocked.map_err(StorageError::Lock)?;
    Ok(())
}

#[async_trait]
impl PurchaseLedger for FileLedger {
    async fn issue(&self, token: &str, issued_at: DateTime<Utc>) -> StorageResult<TokenRecord> {
        let record = TokenRecord::new(token, issued_at);
        let line = format!("{}\n", record.to_line());

        let _guard = self.append_lock.lock().await;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || append_line(&path, &line)).await??;

        debug!(path = %self.path.display(), "Appended purchase token to ledger");
        Ok(record)
    }

    async fn records(&self) -> StorageResult<Vec<TokenRecord>> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            // No purchases yet
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        // Decoded per line so one corrupt line cannot hide the rest of the ledger
        for (index, bytes) in contents.split(|b| *b == b'\n').enumerate() {
            let line = match std::str::from_utf8(bytes) {
                Ok(line) => line.trim_end_matches('\r'),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        line = index + 1,
                        error = %e,
                        "Skipping ledger line that is not valid UTF-8"
                    );
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match TokenRecord::parse_line(line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    path = %self.path.display(),
                    line = index + 1,
                    error = %e,
                    "Skipping malformed ledger line"
                ),
            }
        }

        Ok(records)
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
