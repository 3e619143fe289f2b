//! Finchat Core
//!
//! A thin orchestration layer wiring an LLM chat client to a set of
//! remotely-hosted finance tools exposed over MCP. The hard parts - tool
//! execution, financial calculation, LLM reasoning - live in external
//! systems; this crate owns the bridging:
//!
//! - `registry`: the channel to the tool registry, owned by one worker task
//! - `adapter`: remote tool declarations as locally callable, schema-checked
//!   operations
//! - `prompts`: prompt template discovery and multi-round workflows
//! - `session`: the chat state machine and the model/tool round loop
//! - `providers`: model access via genai, plus a mock for tests
//!
//! ```rust,ignore
//! use finchat_core::{adapter::ToolAdapter, registry, session::{ChatEngine, ChatSession}};
//!
//! let handle = registry::connect_stdio("uv", &args, logger.clone()).await?;
//! let adapter = Arc::new(ToolAdapter::new(handle, logger.clone()));
//! adapter.discover().await?;
//!
//! let engine = Arc::new(ChatEngine::new(provider, adapter, model, logger));
//! let mut session = ChatSession::new(engine);
//! let outcome = session.send("What hierarchies are available?").await?;
//! ```

pub mod adapter;
pub mod config;
pub mod error;
pub mod logging;
pub mod prompts;
pub mod providers;
pub mod registry;
pub mod secrets;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use adapter::{ParamSpec, ParamType, ToolAdapter, ToolDescriptor, ToolOutput};
pub use config::{ConfigError, RegistryEndpoint, Settings};
pub use error::{RegistryError, RegistryResult};
pub use logging::{ConsoleLogger, Logger, NoOpLogger};
pub use prompts::{PromptDescriptor, PromptRunner, WorkflowError, WorkflowOutcome};
pub use providers::{
    ChatOptions, GenaiProvider, MockMode, MockProvider, Provider, ProviderError,
    ProviderModelConfig, ProviderResult, ToolDefinition,
};
pub use registry::{McpTransport, RegistryHandle, RegistryTransport};
pub use secrets::{EnvSecretStore, MemorySecretStore, SecretStore};
pub use session::{ChatEngine, ChatSession, DriveOutcome};
pub use types::{
    ChatMessage, ConversationTurn, MessageRole, ModelTurn, ToolCall, ToolResult, Transcript,
};
