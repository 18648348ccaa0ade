// ABOUTME: Server assembly for lispbook
// ABOUTME: Builds shared state from configuration and runs the axum server

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use lispbook_api::{cache_for_ttl, create_router, AppState, PageRenderer};
use lispbook_payments::{
    HttpMailer, IpnVerifier, LogMailer, Mailer, PaymentResult, PaymentVerifier, RejectionLog,
    WebhookConfig, WebhookHandler,
};
use lispbook_storage::{open_ledger, PurchaseLedger, TokenValidator};

use crate::config::{Config, MailConfig};
use crate::middleware::create_panic_handler;

pub fn build_mailer(mail: &MailConfig) -> PaymentResult<Arc<dyn Mailer>> {
    let mailer: Arc<dyn Mailer> = match &mail.api_url {
        Some(url) => Arc::new(HttpMailer::new(
            url.clone(),
            mail.api_key.clone(),
            mail.timeout,
        )?),
        None => {
            warn!("No mail API configured; purchase emails will only be logged");
            Arc::new(LogMailer)
        }
    };
    Ok(mailer)
}

pub async fn open_configured_ledger(
    config: &Config,
) -> Result<Arc<dyn PurchaseLedger>, Box<dyn std::error::Error>> {
    let ledger = open_ledger(&config.ledger).await?;
    info!(
        backend = ledger.backend_name(),
        path = %config.ledger.path().display(),
        "Opened purchase ledger"
    );
    Ok(ledger)
}

pub fn build_webhook(
    config: &Config,
    ledger: Arc<dyn PurchaseLedger>,
    verifier: Arc<dyn PaymentVerifier>,
) -> PaymentResult<WebhookHandler> {
    Ok(WebhookHandler::new(
        ledger,
        verifier,
        build_mailer(&config.mail)?,
        Arc::new(RejectionLog::new(config.rejection_log.clone())),
        WebhookConfig {
            public_url: config.public_url.clone(),
            mail_from: config.mail.from.clone(),
        },
    ))
}

pub async fn build_state(config: &Config) -> Result<AppState, Box<dyn std::error::Error>> {
    let ledger = open_configured_ledger(config).await?;
    let verifier = Arc::new(IpnVerifier::new(
        config.verify_url.clone(),
        config.verify_timeout,
    )?);

    Ok(AppState {
        pages: Arc::new(PageRenderer::new(
            config.pages_dir.clone(),
            cache_for_ttl(config.page_cache_ttl),
        )),
        validator: TokenValidator::new(ledger.clone()).with_window(config.token_validity),
        webhook: Arc::new(build_webhook(config, ledger, verifier)?),
        assets_dir: config.assets_dir.clone(),
        static_dir: config.static_dir.clone(),
    })
}

/// Site router with tracing and panic recovery layers
pub fn build_app(state: AppState) -> Router {
    create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_panic_handler())
}

pub async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(&config).await?;
    let app = build_app(state);

    let addr = SocketAddr::new(config.host, config.port);
    info!(
        address = %addr,
        public_url = %config.public_url,
        verify_url = %config.verify_url,
        "Server listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
