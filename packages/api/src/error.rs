// ABOUTME: HTTP-facing error type for lispbook handlers
// ABOUTME: Maps domain errors to status codes and a sanitized JSON error envelope

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use lispbook_payments::PaymentError;
use lispbook_storage::StorageError;

/// Main application error type that all handlers should return
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Resource not found")]
    NotFound,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    /// Ledger read or write failed
    #[error("Storage error")]
    Storage(#[from] StorageError),

    /// Ledger write failed after a payment was verified
    #[error("Payment processing error")]
    Payment(#[from] PaymentError),
}

/// Structured error response format for API consistency
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
    request_id: String,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl AppError {
    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            // The webhook only fails on ledger writes
            AppError::Payment(_) => (StatusCode::INTERNAL_SERVER_ERROR, "LEDGER_ERROR"),
        }
    }

    /// User-facing message, never containing internal details
    fn to_user_message(&self) -> String {
        match self {
            AppError::NotFound => "The requested resource was not found".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            AppError::Storage(_) => "Data storage error".to_string(),
            AppError::Payment(_) => "Payment could not be processed".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status_code, error_code) = self.to_status_and_code();
        let user_message = self.to_user_message();

        // Log internal errors with full context but don't expose details
        match &self {
            AppError::Internal(err) => {
                error!(
                    request_id = %request_id,
                    error = %err,
                    "Internal server error occurred"
                );
            }
            AppError::Storage(storage_err) => {
                error!(
                    request_id = %request_id,
                    storage_error = %storage_err,
                    "Storage system error"
                );
            }
            AppError::Payment(payment_err) => {
                error!(
                    request_id = %request_id,
                    payment_error = %payment_err,
                    audit = true,
                    "Purchase could not be completed; manual reconciliation needed"
                );
            }
            _ => {
                tracing::info!(
                    request_id = %request_id,
                    error_code = %error_code,
                    error = %self,
                    "API error response"
                );
            }
        }

        let error_response = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: error_code.to_string(),
                message: user_message,
            },
            request_id,
        };

        let mut response = Json(error_response).into_response();
        *response.status_mut() = status_code;
        response
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

/// Helper functions for common error scenarios
impl AppError {
    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}
