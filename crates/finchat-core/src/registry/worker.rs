//! Worker-owned registry connection
//!
//! One long-lived task owns the transport and serves requests from a queue;
//! callers hold a cheaply clonable `RegistryHandle` and receive results over
//! a per-request oneshot channel. Requests are served one at a time, so the
//! duplex connection is never used concurrently. A caller that gives up on a
//! request simply drops its receiver; the eventual result is discarded, never
//! raced against a newer request.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::error::{RegistryError, RegistryResult};
use crate::logging::Logger;
use crate::types::ChatMessage;

use super::transport::{PromptSpec, RawToolOutput, RegistryTransport, ToolSpec};

/// Requests served by the registry worker
enum Request {
    ListTools {
        reply: oneshot::Sender<RegistryResult<Vec<ToolSpec>>>,
    },
    CallTool {
        name: String,
        arguments: Value,
        reply: oneshot::Sender<RegistryResult<RawToolOutput>>,
    },
    ListPrompts {
        reply: oneshot::Sender<RegistryResult<Vec<PromptSpec>>>,
    },
    GetPrompt {
        name: String,
        arguments: Value,
        reply: oneshot::Sender<RegistryResult<Vec<ChatMessage>>>,
    },
    Shutdown {
        reply: oneshot::Sender<RegistryResult<()>>,
    },
}

/// Handle to the worker that owns the registry connection.
///
/// Clones share the same worker (and therefore the same connection). Use one
/// handle-tree per registry process; the queue serializes channel access.
#[derive(Clone)]
pub struct RegistryHandle {
    tx: mpsc::Sender<Request>,
}

impl RegistryHandle {
    /// Spawn a worker task owning the given transport
    pub fn spawn(transport: Box<dyn RegistryTransport>, logger: Arc<dyn Logger>) -> Self {
        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(run_worker(transport, rx, logger));
        Self { tx }
    }

    /// Enumerate the registry's tools
    pub async fn list_tools(&self) -> RegistryResult<Vec<ToolSpec>> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::ListTools { reply }).await?;
        Self::recv(rx).await
    }

    /// Invoke a tool by name with keyword arguments
    pub async fn call_tool(&self, name: &str, arguments: Value) -> RegistryResult<RawToolOutput> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::CallTool {
            name: name.to_string(),
            arguments,
            reply,
        })
        .await?;
        Self::recv(rx).await
    }

    /// Enumerate the registry's prompt templates
    pub async fn list_prompts(&self) -> RegistryResult<Vec<PromptSpec>> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::ListPrompts { reply }).await?;
        Self::recv(rx).await
    }

    /// Materialize a prompt template into a message sequence
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Value,
    ) -> RegistryResult<Vec<ChatMessage>> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::GetPrompt {
            name: name.to_string(),
            arguments,
            reply,
        })
        .await?;
        Self::recv(rx).await
    }

    /// Close the connection and stop the worker
    pub async fn shutdown(&self) -> RegistryResult<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Shutdown { reply }).await?;
        Self::recv(rx).await
    }

    async fn send(&self, request: Request) -> RegistryResult<()> {
        self.tx
            .send(request)
            .await
            .map_err(|_| RegistryError::Unavailable("registry worker has stopped".to_string()))
    }

    async fn recv<T>(rx: oneshot::Receiver<RegistryResult<T>>) -> RegistryResult<T> {
        rx.await
            .map_err(|_| RegistryError::Transport("registry worker dropped the request".to_string()))?
    }
}

async fn run_worker(
    transport: Box<dyn RegistryTransport>,
    mut rx: mpsc::Receiver<Request>,
    logger: Arc<dyn Logger>,
) {
    while let Some(request) = rx.recv().await {
        match request {
            Request::ListTools { reply } => {
                let _ = reply.send(transport.list_tools().await);
            }
            Request::CallTool {
                name,
                arguments,
                reply,
            } => {
                let _ = reply.send(transport.call_tool(&name, arguments).await);
            }
            Request::ListPrompts { reply } => {
                let _ = reply.send(transport.list_prompts().await);
            }
            Request::GetPrompt {
                name,
                arguments,
                reply,
            } => {
                let _ = reply.send(transport.get_prompt(&name, arguments).await);
            }
            Request::Shutdown { reply } => {
                let _ = reply.send(transport.shutdown().await);
                logger.debug("[registry] worker stopped");
                return;
            }
        }
    }

    logger.debug("[registry] worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::testing::StubRegistry;
    use serde_json::json;

    #[tokio::test]
    async fn test_worker_serves_requests() {
        let stub = StubRegistry::finance();
        let counts = stub.counts();
        let handle = RegistryHandle::spawn(Box::new(stub), Arc::new(NoOpLogger));

        let tools = handle.list_tools().await.unwrap();
        assert_eq!(tools.len(), 3);

        let output = handle
            .call_tool("get_all_hierarchies", json!({}))
            .await
            .unwrap();
        assert_eq!(output.text, "FHC, PRA");
        assert_eq!(counts.call_tool(), 1);
    }

    #[tokio::test]
    async fn test_worker_shutdown_then_unavailable() {
        let handle = RegistryHandle::spawn(Box::new(StubRegistry::finance()), Arc::new(NoOpLogger));
        handle.shutdown().await.unwrap();

        // The worker is gone; further requests fail without hanging.
        let err = handle.list_tools().await.unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Unavailable(_) | RegistryError::Transport(_)
        ));
    }
}
