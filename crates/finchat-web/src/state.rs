//! Shared application state

use std::sync::Arc;

use finchat_core::{ChatEngine, PromptRunner, Settings, ToolAdapter};

/// State shared by every request handler.
///
/// One registry connection (behind its worker queue) serves the whole
/// process; conversations are per-request, with history supplied by the
/// client.
#[derive(Clone)]
pub struct AppState {
    pub adapter: Arc<ToolAdapter>,
    pub prompts: Arc<PromptRunner>,
    pub engine: Arc<ChatEngine>,
    pub settings: Arc<Settings>,
}
