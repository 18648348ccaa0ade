//! Panic recovery for the site router

use axum::response::{IntoResponse, Response};
use lispbook_api::AppError;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;

type PanicPayload = Box<dyn Any + Send + 'static>;

/// Turn handler panics into the regular internal-error envelope
pub fn create_panic_handler() -> CatchPanicLayer<fn(PanicPayload) -> Response> {
    CatchPanicLayer::custom(handle_panic)
}

fn handle_panic(payload: PanicPayload) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");

    // Detail reaches the log only; the body stays generic
    AppError::internal(PanicError(detail.to_string())).into_response()
}

#[derive(Debug, thiserror::Error)]
#[error("handler panicked: {0}")]
struct PanicError(String);
