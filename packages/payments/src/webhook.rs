// ABOUTME: Payment webhook orchestration
// ABOUTME: Verify notification, mint and record a token, email the buyer; one pass, no retries

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

use lispbook_core::generate_token;
use lispbook_storage::PurchaseLedger;

use crate::fields::FormFields;
use crate::mailer::{purchase_email, Mailer};
use crate::rejection_log::RejectionLog;
use crate::verifier::{PaymentVerifier, VerificationOutcome};
use crate::PaymentResult;

/// Field carrying the buyer's address
pub const PAYER_EMAIL_FIELD: &str = "payer_email";

/// Processor transaction id, logged for reconciliation
pub const TXN_ID_FIELD: &str = "txn_id";

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Absolute base URL used in emailed download links
    pub public_url: String,
    pub mail_from: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Issued { token: String, emailed: bool },
    Rejected,
}

pub struct WebhookHandler {
    ledger: Arc<dyn PurchaseLedger>,
    verifier: Arc<dyn PaymentVerifier>,
    mailer: Arc<dyn Mailer>,
    rejections: Arc<RejectionLog>,
    config: WebhookConfig,
}

impl WebhookHandler {
    pub fn new(
        ledger: Arc<dyn PurchaseLedger>,
        verifier: Arc<dyn PaymentVerifier>,
        mailer: Arc<dyn Mailer>,
        rejections: Arc<RejectionLog>,
        config: WebhookConfig,
    ) -> Self {
        Self {
            ledger,
            verifier,
            mailer,
            rejections,
            config,
        }
    }

    /// Process one notification
    ///
    /// Only a ledger write failure is an error; rejections and mail failures
    /// still complete so the processor does not redeliver.
    pub async fn handle(&self, fields: &FormFields) -> PaymentResult<WebhookOutcome> {
        let message = fields.verification_message();
        let txn_id = fields.get(TXN_ID_FIELD).unwrap_or("-");

        match self.verifier.verify(&message).await {
            VerificationOutcome::Verified => {}
            VerificationOutcome::Rejected { response } => {
                error!(
                    txn_id = %txn_id,
                    response = %response,
                    verification = %message,
                    audit = true,
                    "Payment notification rejected by processor"
                );
                self.record_rejection(&message).await;
                return Ok(WebhookOutcome::Rejected);
            }
            VerificationOutcome::Unreachable { reason } => {
                error!(
                    txn_id = %txn_id,
                    reason = %reason,
                    verification = %message,
                    audit = true,
                    "Payment notification could not be verified"
                );
                self.record_rejection(&message).await;
                return Ok(WebhookOutcome::Rejected);
            }
        }

        let token = generate_token();
        let record = self.ledger.issue(&token, Utc::now()).await?;
        info!(
            txn_id = %txn_id,
            issued_at = %record.issued_at,
            "Issued download token for verified payment"
        );

        let emailed = match fields.get(PAYER_EMAIL_FIELD).filter(|e| !e.is_empty()) {
            Some(to) => self.send_links(to, &token).await,
            None => {
                error!(
                    txn_id = %txn_id,
                    token = %token,
                    "Verified payment has no payer email; links must be sent manually"
                );
                false
            }
        };

        Ok(WebhookOutcome::Issued { token, emailed })
    }

    async fn send_links(&self, to: &str, token: &str) -> bool {
        let message = purchase_email(&self.config.mail_from, to, &self.config.public_url, token);
        match self.mailer.send(&message).await {
            Ok(()) => true,
            Err(e) => {
                // Token is already durable; support can resend the links
                error!(to = %to, token = %token, error = %e, "Failed to send purchase email");
                false
            }
        }
    }

    async fn record_rejection(&self, message: &str) {
        if let Err(e) = self.rejections.record(Utc::now(), message).await {
            error!(
                path = %self.rejections.path().display(),
                error = %e,
                "Failed to write rejection log"
            );
        }
    }
}
