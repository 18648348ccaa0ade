// ABOUTME: Download token validation against the purchase ledger
// ABOUTME: Re-reads the ledger on every check so new and expired tokens take effect immediately

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use lispbook_core::default_validity_window;

use crate::ledger::PurchaseLedger;
use crate::StorageResult;

/// Decides whether a presented token currently authorizes a download
///
/// Unknown and expired tokens both yield `false`; callers cannot tell them apart.
#[derive(Clone)]
pub struct TokenValidator {
    ledger: Arc<dyn PurchaseLedger>,
    window: Duration,
}

impl TokenValidator {
    pub fn new(ledger: Arc<dyn PurchaseLedger>) -> Self {
        Self {
            ledger,
            window: default_validity_window(),
        }
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn ledger(&self) -> &Arc<dyn PurchaseLedger> {
        &self.ledger
    }

    pub async fn is_valid(&self, token: &str, now: DateTime<Utc>) -> StorageResult<bool> {
        let valid = self.ledger.all_valid(now, self.window).await?;
        Ok(valid.contains(token))
    }

    pub async fn is_valid_now(&self, token: &str) -> StorageResult<bool> {
        self.is_valid(token, Utc::now()).await
    }
}
