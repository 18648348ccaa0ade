// ABOUTME: HTTP API layer for the Build Your Own Lisp site
// ABOUTME: Chapter pages, static files, purchase downloads, and the payment webhook

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

pub mod cache;
pub mod download_handlers;
pub mod error;
pub mod health;
pub mod pages;
pub mod pages_handlers;
pub mod state;
pub mod webhook_handlers;

pub use cache::{cache_for_ttl, MemoryCache, NoopCache, PageCache};
pub use error::{ApiResult, AppError};
pub use pages::PageRenderer;
pub use state::AppState;

/// Creates the payment webhook router
pub fn create_webhook_router() -> Router<AppState> {
    Router::new()
        .route("/ipn", post(webhook_handlers::payment_notification))
        .route(
            "/webhook/payment",
            post(webhook_handlers::payment_notification),
        )
}

/// Creates the download router
pub fn create_download_router() -> Router<AppState> {
    Router::new().route(
        "/download/{token}/{format}",
        get(download_handlers::download),
    )
}

/// Creates the full site router
pub fn create_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(pages_handlers::route_index))
        .route("/api/health", get(health::health_check))
        .route("/{page}", get(pages_handlers::route_page))
        .merge(create_webhook_router())
        .merge(create_download_router())
        .nest_service("/static", static_files)
        .with_state(state)
}
