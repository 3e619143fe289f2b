//! MCP-backed registry transport using the official rmcp SDK
//!
//! The finance registry is an MCP server. It is usually spawned as a stdio
//! child process (the same way the original deployment launches it via
//! `uv run mcp run <script>`); a streamable-HTTP endpoint is also supported.

use std::sync::Arc;

use async_trait::async_trait;
use rmcp::{
    model::{
        CallToolRequestParams, ClientCapabilities, ClientInfo, GetPromptRequestParams,
        Implementation, PromptMessageContent, PromptMessageRole, RawContent,
    },
    service::RunningService,
    transport::TokioChildProcess,
    RoleClient, ServiceExt,
};
use serde_json::Value;
use tokio::process::Command;

use crate::error::{RegistryError, RegistryResult};
use crate::logging::Logger;
use crate::types::ChatMessage;

use super::transport::{PromptArgSpec, PromptSpec, RawToolOutput, RegistryTransport, ToolSpec};

/// Registry transport speaking MCP over stdio or streamable HTTP.
pub struct McpTransport {
    /// The underlying rmcp running service
    client: RunningService<RoleClient, ClientInfo>,
    /// Logger
    logger: Arc<dyn Logger>,
}

fn client_info() -> ClientInfo {
    ClientInfo {
        meta: None,
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "finchat-core".to_string(),
            title: Some("Finchat".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            website_url: None,
            icons: None,
        },
    }
}

impl McpTransport {
    /// Spawn the registry as a child process and connect over stdio
    pub async fn connect_stdio(
        command: &str,
        args: &[String],
        logger: Arc<dyn Logger>,
    ) -> RegistryResult<Self> {
        logger.info(&format!(
            "[registry] Spawning registry process: {} {}",
            command,
            args.join(" ")
        ));

        let mut cmd = Command::new(command);
        cmd.args(args);

        let transport = TokioChildProcess::new(cmd)
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;

        let client = client_info()
            .serve(transport)
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;

        logger.info("[registry] Connected and initialized successfully");

        Ok(Self { client, logger })
    }

    /// Connect to a registry over HTTP (Streamable HTTP transport)
    pub async fn connect_http(url: &str, logger: Arc<dyn Logger>) -> RegistryResult<Self> {
        use rmcp::transport::StreamableHttpClientTransport;

        logger.info(&format!("[registry] Connecting to HTTP: {}", url));

        let transport = StreamableHttpClientTransport::from_uri(url);

        let client = client_info()
            .serve(transport)
            .await
            .map_err(|e| RegistryError::Unavailable(e.to_string()))?;

        logger.info("[registry] Connected and initialized successfully");

        Ok(Self { client, logger })
    }
}

#[async_trait]
impl RegistryTransport for McpTransport {
    async fn list_tools(&self) -> RegistryResult<Vec<ToolSpec>> {
        let result = self
            .client
            .list_tools(Default::default())
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        self.logger
            .info(&format!("[registry] Listed {} tools", result.tools.len()));

        Ok(result
            .tools
            .into_iter()
            .map(|tool| ToolSpec {
                name: tool.name.to_string(),
                description: tool.description.map(|s| s.to_string()).unwrap_or_default(),
                // input_schema is Arc<JsonObject>, convert to Value
                input_schema: serde_json::to_value(tool.input_schema.as_ref())
                    .unwrap_or_default(),
            })
            .collect())
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> RegistryResult<RawToolOutput> {
        self.logger
            .debug(&format!("[registry] Calling tool: {}", name));

        let params = CallToolRequestParams {
            meta: None,
            name: name.to_owned().into(),
            arguments: arguments.as_object().cloned(),
            task: None,
        };

        let result = self
            .client
            .call_tool(params)
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        // Content is Annotated<RawContent>; only textual content is forwarded
        let text = result
            .content
            .iter()
            .filter_map(|c| match &c.raw {
                RawContent::Text(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(RawToolOutput {
            text,
            is_error: result.is_error.unwrap_or(false),
        })
    }

    async fn list_prompts(&self) -> RegistryResult<Vec<PromptSpec>> {
        let result = self
            .client
            .list_prompts(Default::default())
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        self.logger
            .info(&format!("[registry] Listed {} prompts", result.prompts.len()));

        Ok(result
            .prompts
            .into_iter()
            .map(|prompt| PromptSpec {
                name: prompt.name.to_string(),
                description: prompt.description.map(|s| s.to_string()).unwrap_or_default(),
                arguments: prompt
                    .arguments
                    .unwrap_or_default()
                    .into_iter()
                    .map(|arg| PromptArgSpec {
                        name: arg.name.to_string(),
                        description: arg.description.map(|s| s.to_string()).unwrap_or_default(),
                        required: arg.required.unwrap_or(false),
                    })
                    .collect(),
            })
            .collect())
    }

    async fn get_prompt(&self, name: &str, arguments: Value) -> RegistryResult<Vec<ChatMessage>> {
        self.logger
            .debug(&format!("[registry] Fetching prompt: {}", name));

        let params = GetPromptRequestParams {
            meta: None,
            name: name.to_owned().into(),
            arguments: arguments.as_object().cloned(),
        };

        let result = self
            .client
            .get_prompt(params)
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;

        let mut messages = Vec::new();
        for msg in result.messages {
            let text = match msg.content {
                PromptMessageContent::Text { text } => text,
                other => {
                    self.logger.warn(&format!(
                        "[registry] Skipping non-text prompt content in '{}': {:?}",
                        name, other
                    ));
                    continue;
                }
            };
            let message = match msg.role {
                PromptMessageRole::User => ChatMessage::user(text),
                PromptMessageRole::Assistant => ChatMessage::assistant(text),
            };
            messages.push(message);
        }

        Ok(messages)
    }

    async fn shutdown(self: Box<Self>) -> RegistryResult<()> {
        self.logger.info("[registry] Closing connection");
        self.client
            .cancel()
            .await
            .map_err(|e| RegistryError::Transport(e.to_string()))?;
        Ok(())
    }
}
