//! Mock provider for testing
//!
//! Provides deterministic, configurable model turns without network
//! dependencies. The `Script` mode replays a fixed sequence of turns, which
//! is how the round-loop tests drive tool calling.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::logging::Logger;
use crate::types::{ConversationTurn, ModelTurn, Transcript};

use super::error::{ProviderError, ProviderResult};
use super::traits::{ChatOptions, Provider, ProviderModelConfig};

/// Mock response mode
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Echo back the last user turn
    Echo,
    /// Return a fixed text turn
    Fixed(String),
    /// Replay these turns in order; once exhausted, keep returning the last
    /// one (a trailing tool-call turn therefore never terminates a loop)
    Script(Vec<ModelTurn>),
    /// Fail every call
    Error(String),
}

impl Default for MockMode {
    fn default() -> Self {
        MockMode::Echo
    }
}

/// Mock LLM provider for testing
pub struct MockProvider {
    mode: MockMode,
    calls: AtomicUsize,
    logger: Arc<dyn Logger>,
}

impl MockProvider {
    /// Create a new mock provider
    pub fn new(mode: MockMode, logger: Arc<dyn Logger>) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
            logger,
        }
    }

    /// Create an echo provider (echoes back the last user turn)
    pub fn echo(logger: Arc<dyn Logger>) -> Self {
        Self::new(MockMode::Echo, logger)
    }

    /// Create a fixed response provider
    pub fn fixed(response: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::new(MockMode::Fixed(response.into()), logger)
    }

    /// Create a provider that replays scripted turns
    pub fn scripted(turns: Vec<ModelTurn>, logger: Arc<dyn Logger>) -> Self {
        Self::new(MockMode::Script(turns), logger)
    }

    /// Create an error-producing provider
    pub fn error(message: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self::new(MockMode::Error(message.into()), logger)
    }

    /// Number of chat calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_user_text(transcript: &Transcript) -> String {
        transcript
            .turns()
            .iter()
            .rev()
            .find_map(|turn| match turn {
                ConversationTurn::User { text } => Some(text.clone()),
                _ => None,
            })
            .unwrap_or_else(|| "Hello from MockProvider!".to_string())
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn chat(
        &self,
        transcript: &Transcript,
        _model: &ProviderModelConfig,
        _options: &ChatOptions,
    ) -> ProviderResult<ModelTurn> {
        let call_index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.logger
            .debug(&format!("MockProvider: chat call {}", call_index));

        match &self.mode {
            MockMode::Echo => Ok(ModelTurn::text(format!(
                "Echo: {}",
                Self::last_user_text(transcript)
            ))),
            MockMode::Fixed(response) => Ok(ModelTurn::text(response.clone())),
            MockMode::Script(turns) => {
                let turn = turns
                    .get(call_index.min(turns.len().saturating_sub(1)))
                    .cloned()
                    .unwrap_or_default();
                Ok(turn)
            }
            MockMode::Error(message) => Err(ProviderError::Other(format!("Mock error: {message}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::types::ToolCall;
    use serde_json::json;

    fn test_logger() -> Arc<dyn Logger> {
        Arc::new(NoOpLogger::new())
    }

    fn transcript_with(content: &str) -> Transcript {
        let mut transcript = Transcript::new();
        transcript.push_user(content);
        transcript
    }

    fn config() -> ProviderModelConfig {
        ProviderModelConfig::new("mock")
    }

    #[tokio::test]
    async fn test_echo_mode() {
        let provider = MockProvider::echo(test_logger());
        let turn = provider
            .chat(&transcript_with("Hello, world!"), &config(), &ChatOptions::new())
            .await
            .unwrap();
        assert!(turn.text.contains("Hello, world!"));
        assert!(!turn.has_tool_calls());
    }

    #[tokio::test]
    async fn test_script_mode_repeats_last_turn() {
        let tool_turn = ModelTurn {
            text: String::new(),
            tool_calls: vec![ToolCall::new("c1", "get_all_hierarchies", json!({}))],
        };
        let provider = MockProvider::scripted(vec![tool_turn], test_logger());

        for _ in 0..3 {
            let turn = provider
                .chat(&transcript_with("go"), &config(), &ChatOptions::new())
                .await
                .unwrap();
            assert!(turn.has_tool_calls());
        }
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_error_mode() {
        let provider = MockProvider::error("boom", test_logger());
        let result = provider
            .chat(&transcript_with("x"), &config(), &ChatOptions::new())
            .await;
        assert!(result.is_err());
    }
}
