// ABOUTME: Purchase email composition and delivery
// ABOUTME: Sends download links through a transactional mail HTTP API, or logs them when none is configured

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

use lispbook_core::{AssetFormat, VALIDITY_DAYS};

use crate::{PaymentError, PaymentResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> PaymentResult<()>;
}

/// Absolute download URLs for every emailed format, in link order
pub fn download_links(public_url: &str, token: &str) -> Vec<String> {
    let base = public_url.trim_end_matches('/');
    AssetFormat::EMAILED
        .iter()
        .map(|format| format!("{}/download/{}/{}", base, token, format))
        .collect()
}

/// Plain-text email carrying the buyer's download links
pub fn purchase_email(from: &str, to: &str, public_url: &str, token: &str) -> EmailMessage {
    let links = download_links(public_url, token);
    let text = format!(
        "Thank you for purchasing Build Your Own Lisp!\n\
         \n\
         You can download your copy in the following formats:\n\
         \n\
         ePub: {}\n\
         Mobi: {}\n\
         PDF:  {}\n\
         \n\
         These links will stay active for {} days. If you have any trouble\n\
         downloading, reply to this email and we will sort it out.\n",
        links[0], links[1], links[2], VALIDITY_DAYS
    );

    EmailMessage {
        from: from.to_string(),
        to: to.to_string(),
        subject: "Build Your Own Lisp - Download Links".to_string(),
        text,
    }
}

/// Delivers mail by POSTing JSON to a transactional email API
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpMailer {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> PaymentResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> PaymentResult<()> {
        let mut request = self.client.post(&self.endpoint).json(message);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(PaymentError::Mail(format!(
                "mail API returned {}",
                response.status()
            )));
        }

        info!(to = %message.to, "Sent purchase email");
        Ok(())
    }
}

/// Writes messages to the log instead of sending them
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> PaymentResult<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.text,
            "No mail API configured; logging purchase email"
        );
        Ok(())
    }
}
