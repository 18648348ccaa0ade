// ABOUTME: HTTP request handler for payment processor notifications
// ABOUTME: Always acknowledges with `{"status": "complete"}` unless the ledger write fails

use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use lispbook_payments::{FormFields, WebhookOutcome};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn payment_notification(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    // Raw body keeps the processor's field order
    let fields = FormFields::parse(&body);
    info!(fields = fields.len(), "Received payment notification");

    match state.webhook.handle(&fields).await? {
        WebhookOutcome::Issued { emailed, .. } => {
            info!(emailed = emailed, "Payment notification completed with new token");
        }
        WebhookOutcome::Rejected => info!("Payment notification not verified"),
    }

    Ok(Json(json!({ "status": "complete" })))
}
