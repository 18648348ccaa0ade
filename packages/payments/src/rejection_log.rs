// ABOUTME: Append-only log of payment notifications that failed verification
// ABOUTME: One timestamped line per rejection, kept for manual follow-up

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use lispbook_core::format_timestamp;

use crate::PaymentResult;

pub struct RejectionLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl RejectionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `<timestamp> <verification message>`
    pub async fn record(&self, at: DateTime<Utc>, message: &str) -> PaymentResult<()> {
        // Keep it to one line even if a caller hands us something unencoded
        let message = message.replace(['\r', '\n'], " ");
        let line = format!("{} {}\n", format_timestamp(at), message);

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
