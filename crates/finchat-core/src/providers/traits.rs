//! Provider trait definition

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{ModelTurn, Transcript};

use super::error::ProviderResult;

/// Model configuration for provider requests
#[derive(Debug, Clone)]
pub struct ProviderModelConfig {
    /// Model identifier, optionally provider-prefixed (e.g. "anthropic/claude-sonnet-4-5")
    pub model: String,
    /// Explicit API key; when absent, the provider resolves one from its secret store
    pub api_key: Option<String>,
}

impl ProviderModelConfig {
    /// Create a new model config
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
        }
    }

    /// Set an explicit API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// A tool definition in the shape model providers expect.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    /// Tool name (function name)
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// JSON Schema for the input parameters
    pub input_schema: Value,
}

/// Options for one chat completion
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// System instruction prepended to the conversation
    pub system: Option<String>,
    /// Temperature for response generation
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Tools available for the model to use
    pub tools: Vec<ToolDefinition>,
}

impl ChatOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the system instruction
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    /// Set tools
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }
}

/// Provider trait for LLM implementations
///
/// A provider takes the full transcript and returns one complete model
/// decision - text plus any requested tool calls. Waiting on the model is a
/// plain blocking await; there is no streaming in this layer and no internal
/// timeout, matching how the presentation shells consume responses.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider name (e.g. "genai", "mock")
    fn name(&self) -> &str;

    /// Ask the model for its next action given the transcript so far
    async fn chat(
        &self,
        transcript: &Transcript,
        model: &ProviderModelConfig,
        options: &ChatOptions,
    ) -> ProviderResult<ModelTurn>;
}
