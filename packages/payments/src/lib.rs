// ABOUTME: Purchase pipeline for lispbook: payment notification in, download token out
// ABOUTME: Verifies notifications with the processor, mints tokens, and emails download links

use thiserror::Error;

pub mod fields;
pub mod mailer;
pub mod rejection_log;
pub mod verifier;
pub mod webhook;

// Re-export main types
pub use fields::FormFields;
pub use mailer::{download_links, purchase_email, EmailMessage, HttpMailer, LogMailer, Mailer};
pub use rejection_log::RejectionLog;
pub use verifier::{IpnVerifier, PaymentVerifier, VerificationOutcome, VERIFIED};
pub use webhook::{WebhookConfig, WebhookHandler, WebhookOutcome};

pub type PaymentResult<T> = Result<T, PaymentError>;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Ledger write failed: {0}")]
    Ledger(#[from] lispbook_storage::StorageError),

    #[error("Mail delivery failed: {0}")]
    Mail(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rejection log write failed: {0}")]
    RejectionLog(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}
