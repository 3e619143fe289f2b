//! Transport seam for the registry channel
//!
//! The registry worker owns a `RegistryTransport` and serves requests from a
//! queue. Production code uses the MCP-backed transport; tests use a scripted
//! stub. The wire types here are deliberately free of any protocol SDK types
//! so the rest of the crate never sees the framing.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::RegistryResult;
use crate::types::ChatMessage;

/// A tool as enumerated by the registry, before schema validation.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Tool name (unique within the registry)
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema for the tool's keyword arguments
    pub input_schema: Value,
}

/// One declared argument of a prompt template.
#[derive(Debug, Clone, Serialize)]
pub struct PromptArgSpec {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// A prompt template as enumerated by the registry.
#[derive(Debug, Clone)]
pub struct PromptSpec {
    /// Prompt name (unique within the registry)
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Declared arguments
    pub arguments: Vec<PromptArgSpec>,
}

/// Raw output of one tool invocation.
///
/// `is_error` reflects the registry's own failure response; channel failures
/// surface as `RegistryError::Transport` instead.
#[derive(Debug, Clone)]
pub struct RawToolOutput {
    /// Concatenated textual content of the result
    pub text: String,
    /// Whether the registry reported the invocation as failed
    pub is_error: bool,
}

/// The four operations this repository needs from the registry channel:
/// enumerate tools, enumerate prompts, invoke by name, and disconnect.
#[async_trait]
pub trait RegistryTransport: Send + Sync {
    /// Enumerate the registry's tools
    async fn list_tools(&self) -> RegistryResult<Vec<ToolSpec>>;

    /// Invoke a tool by name with keyword arguments
    async fn call_tool(&self, name: &str, arguments: Value) -> RegistryResult<RawToolOutput>;

    /// Enumerate the registry's prompt templates
    async fn list_prompts(&self) -> RegistryResult<Vec<PromptSpec>>;

    /// Materialize a prompt template into a message sequence
    async fn get_prompt(&self, name: &str, arguments: Value) -> RegistryResult<Vec<ChatMessage>>;

    /// Close the connection
    async fn shutdown(self: Box<Self>) -> RegistryResult<()>;
}
