//! Registry channel
//!
//! The registry is an external process exposing named finance tools and
//! prompt templates over MCP. This module provides the channel to it:
//!
//! ```text
//! ToolAdapter / PromptRunner
//!         │  RegistryHandle (mpsc request, oneshot reply)
//!         ▼
//! worker task ── owns ──> RegistryTransport (McpTransport in production)
//!         │  stdio child process or streamable HTTP
//!         ▼
//! finance MCP server
//! ```
//!
//! The worker serializes all channel access; callers never touch the
//! connection directly.

mod mcp;
mod transport;
mod worker;

pub use mcp::McpTransport;
pub use transport::{PromptArgSpec, PromptSpec, RawToolOutput, RegistryTransport, ToolSpec};
pub use worker::RegistryHandle;

use std::sync::Arc;

use crate::error::RegistryResult;
use crate::logging::Logger;

/// Spawn the registry as a stdio child process and return a worker handle
pub async fn connect_stdio(
    command: &str,
    args: &[String],
    logger: Arc<dyn Logger>,
) -> RegistryResult<RegistryHandle> {
    let transport = McpTransport::connect_stdio(command, args, Arc::clone(&logger)).await?;
    Ok(RegistryHandle::spawn(Box::new(transport), logger))
}

/// Connect to a registry over streamable HTTP and return a worker handle
pub async fn connect_http(url: &str, logger: Arc<dyn Logger>) -> RegistryResult<RegistryHandle> {
    let transport = McpTransport::connect_http(url, Arc::clone(&logger)).await?;
    Ok(RegistryHandle::spawn(Box::new(transport), logger))
}
