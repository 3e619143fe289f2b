//! LLM provider implementations
//!
//! All real model access goes through the `genai` crate, which handles the
//! provider-specific protocols (Anthropic, OpenAI, Gemini, Ollama, ...) and
//! tool calling. Auth flows through our `SecretStore`, not genai's env var
//! lookup. The `MockProvider` is kept for testing.

mod error;
mod genai_adapter;
mod genai_provider;
mod mock;
mod traits;

// Core traits and types
pub use error::{ProviderError, ProviderResult};
pub use traits::{ChatOptions, Provider, ProviderModelConfig, ToolDefinition};

// The main provider - handles all LLM providers via genai
pub use genai_provider::GenaiProvider;

// Mock provider for testing
pub use mock::{MockMode, MockProvider};
