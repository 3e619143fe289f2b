//! Core types for the chat bridge
//!
//! Shared message, tool, and transcript types used across the registry
//! adapter, prompt runner, and chat session.

mod message;
mod tool;
mod transcript;

pub use message::{ChatMessage, MessageRole};
pub use tool::{ToolCall, ToolResult};
pub use transcript::{ConversationTurn, ModelTurn, Transcript};
