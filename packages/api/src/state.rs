// ABOUTME: Shared application state for lispbook handlers
// ABOUTME: Page renderer, token validator, and purchase pipeline handed to every route

use std::path::PathBuf;
use std::sync::Arc;

use lispbook_payments::WebhookHandler;
use lispbook_storage::TokenValidator;

use crate::pages::PageRenderer;

#[derive(Clone)]
pub struct AppState {
    pub pages: Arc<PageRenderer>,
    pub validator: TokenValidator,
    pub webhook: Arc<WebhookHandler>,
    /// Directory holding `BuildYourOwnLisp.<format>` files
    pub assets_dir: PathBuf,
    pub static_dir: PathBuf,
}
