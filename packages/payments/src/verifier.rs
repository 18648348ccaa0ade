// ABOUTME: Out-of-band verification of payment notifications
// ABOUTME: Echoes the notification back to the processor and checks for the literal confirmation

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{PaymentError, PaymentResult};

/// Response body the processor returns for a genuine notification
pub const VERIFIED: &str = "VERIFIED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified,
    /// Processor answered with anything other than `VERIFIED`
    Rejected { response: String },
    /// Network error or timeout; treated as unverified
    Unreachable { reason: String },
}

impl VerificationOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationOutcome::Verified)
    }
}

#[async_trait]
pub trait PaymentVerifier: Send + Sync {
    /// Send `message` (echoed fields plus directive) to the processor
    async fn verify(&self, message: &str) -> VerificationOutcome;
}

/// Verifier for IPN-style notifications over HTTP
pub struct IpnVerifier {
    client: reqwest::Client,
    endpoint: String,
}

impl IpnVerifier {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> PaymentResult<Self> {
        let endpoint = endpoint.into();
        if endpoint.is_empty() {
            return Err(PaymentError::Configuration(
                "verification endpoint is empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PaymentVerifier for IpnVerifier {
    async fn verify(&self, message: &str) -> VerificationOutcome {
        debug!(endpoint = %self.endpoint, "Verifying payment notification");

        let response = match self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(message.to_string())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "Verification request failed");
                return VerificationOutcome::Unreachable {
                    reason: e.to_string(),
                };
            }
        };

        match response.text().await {
            Ok(body) if body == VERIFIED => VerificationOutcome::Verified,
            Ok(body) => VerificationOutcome::Rejected { response: body },
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "Failed to read verification response");
                VerificationOutcome::Unreachable {
                    reason: e.to_string(),
                }
            }
        }
    }
}
