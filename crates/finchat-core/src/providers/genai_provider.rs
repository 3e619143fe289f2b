//! GenaiProvider - Unified provider using the genai crate
//!
//! One provider handles all genai-supported model APIs (Anthropic, OpenAI,
//! Gemini, Ollama, ...). The model string selects the backend, e.g.
//! "anthropic/claude-sonnet-4-5" or a bare model name genai can resolve.

use std::sync::Arc;

use async_trait::async_trait;
use genai::chat::ChatRequest;

use crate::logging::Logger;
use crate::secrets::SecretStore;
use crate::types::{ModelTurn, Transcript};

use super::error::{ProviderError, ProviderResult};
use super::genai_adapter::{
    create_client, from_genai_response, to_genai_messages, to_genai_options, to_genai_tools,
};
use super::traits::{ChatOptions, Provider, ProviderModelConfig};

/// Unified provider using genai for all supported LLM APIs
pub struct GenaiProvider {
    /// API keys are resolved through this store at request time
    secrets: Arc<dyn SecretStore>,
    /// Logger for debug output
    logger: Arc<dyn Logger>,
}

impl GenaiProvider {
    /// Create a new GenaiProvider
    pub fn new(secrets: Arc<dyn SecretStore>, logger: Arc<dyn Logger>) -> Self {
        Self { secrets, logger }
    }

    /// Extract the model name from a model string (e.g. "anthropic/claude-3" -> "claude-3")
    pub fn extract_model_name(model: &str) -> &str {
        model.split('/').nth(1).unwrap_or(model)
    }
}

#[async_trait]
impl Provider for GenaiProvider {
    fn name(&self) -> &str {
        "genai"
    }

    async fn chat(
        &self,
        transcript: &Transcript,
        model: &ProviderModelConfig,
        options: &ChatOptions,
    ) -> ProviderResult<ModelTurn> {
        self.logger.debug(&format!(
            "[provider] chat called: model={}, turns={}, tools={}",
            model.model,
            transcript.len(),
            options.tools.len()
        ));

        let client = create_client(model.api_key.clone(), Arc::clone(&self.secrets));

        let mut chat_req = ChatRequest::new(to_genai_messages(transcript));

        if let Some(system) = &options.system {
            chat_req = chat_req.with_system(system);
        }

        if !options.tools.is_empty() {
            chat_req = chat_req.with_tools(to_genai_tools(&options.tools));
        }

        let genai_options = to_genai_options(options);
        let model_name = Self::extract_model_name(&model.model);

        let response = client
            .exec_chat(model_name, chat_req, Some(&genai_options))
            .await
            .map_err(|e| ProviderError::api_error(&model.model, e.to_string()))?;

        let turn = from_genai_response(response);

        self.logger.debug(&format!(
            "[provider] model answered with {} chars and {} tool call(s)",
            turn.text.len(),
            turn.tool_calls.len()
        ));

        Ok(turn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_model_name() {
        assert_eq!(
            GenaiProvider::extract_model_name("anthropic/claude-sonnet-4-5"),
            "claude-sonnet-4-5"
        );
        assert_eq!(GenaiProvider::extract_model_name("gpt-4"), "gpt-4");
    }
}
