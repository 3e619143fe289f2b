//! Shared test fixtures
//!
//! A scripted registry transport with call counters, plus the finance tool
//! set used throughout the tests. Compiled only for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::error::{RegistryError, RegistryResult};
use crate::registry::{PromptArgSpec, PromptSpec, RawToolOutput, RegistryTransport, ToolSpec};
use crate::types::ChatMessage;

/// Per-operation round-trip counters for a stub registry.
#[derive(Debug, Default)]
pub struct CallCounts {
    list_tools: AtomicUsize,
    call_tool: AtomicUsize,
    list_prompts: AtomicUsize,
    get_prompt: AtomicUsize,
}

impl CallCounts {
    pub fn list_tools(&self) -> usize {
        self.list_tools.load(Ordering::SeqCst)
    }

    pub fn call_tool(&self) -> usize {
        self.call_tool.load(Ordering::SeqCst)
    }

    pub fn list_prompts(&self) -> usize {
        self.list_prompts.load(Ordering::SeqCst)
    }

    pub fn get_prompt(&self) -> usize {
        self.get_prompt.load(Ordering::SeqCst)
    }
}

/// Scripted registry transport.
///
/// Serves canned tool and prompt descriptors, canned outputs keyed by tool
/// name, and records every invocation so tests can assert on round trips and
/// forwarded arguments.
pub struct StubRegistry {
    tools: Vec<ToolSpec>,
    prompts: Vec<PromptSpec>,
    tool_outputs: HashMap<String, RawToolOutput>,
    prompt_messages: HashMap<String, Vec<ChatMessage>>,
    counts: Arc<CallCounts>,
    invocations: Arc<Mutex<Vec<(String, Value)>>>,
}

impl StubRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            prompts: Vec::new(),
            tool_outputs: HashMap::new(),
            prompt_messages: HashMap::new(),
            counts: Arc::new(CallCounts::default()),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The finance registry the original deployment exposes: a parameterless
    /// enumeration tool, a one-argument formula lookup, a two-argument
    /// calculation, and a guided analysis prompt.
    pub fn finance() -> Self {
        Self::new()
            .with_tool(
                ToolSpec {
                    name: "get_all_hierarchies".to_string(),
                    description: "Get all available hierarchies".to_string(),
                    input_schema: json!({ "type": "object", "properties": {} }),
                },
                RawToolOutput {
                    text: "FHC, PRA".to_string(),
                    is_error: false,
                },
            )
            .with_tool(
                ToolSpec {
                    name: "get_hpl_formula".to_string(),
                    description: "Get the HPL formula for a hierarchy".to_string(),
                    input_schema: json!({
                        "type": "object",
                        "properties": {
                            "hierarchy": { "type": "string", "description": "Hierarchy name" }
                        },
                        "required": ["hierarchy"]
                    }),
                },
                RawToolOutput {
                    text: "HPL = sum(position * price_delta)".to_string(),
                    is_error: false,
                },
            )
            .with_tool(
                ToolSpec {
                    name: "calculate_hypothetical_pnl".to_string(),
                    description: "Calculate hypothetical P&L for an account".to_string(),
                    input_schema: json!({
                        "type": "object",
                        "properties": {
                            "hierarchy": { "type": "string" },
                            "account_number": { "type": "string" }
                        },
                        "required": ["hierarchy", "account_number"]
                    }),
                },
                RawToolOutput {
                    text: "1234.56".to_string(),
                    is_error: false,
                },
            )
            .with_prompt(
                PromptSpec {
                    name: "finance_complete_analysis".to_string(),
                    description: "Guided multi-step HPL analysis".to_string(),
                    arguments: vec![PromptArgSpec {
                        name: "hierarchy".to_string(),
                        description: "Hierarchy to analyze".to_string(),
                        required: true,
                    }],
                },
                vec![
                    ChatMessage::user("Get the HPL formula for the FHC hierarchy."),
                    ChatMessage::user("Pick an account and calculate its hypothetical P&L."),
                ],
            )
    }

    pub fn with_tool(mut self, spec: ToolSpec, output: RawToolOutput) -> Self {
        self.tool_outputs.insert(spec.name.clone(), output);
        self.tools.push(spec);
        self
    }

    pub fn with_prompt(mut self, spec: PromptSpec, messages: Vec<ChatMessage>) -> Self {
        self.prompt_messages.insert(spec.name.clone(), messages);
        self.prompts.push(spec);
        self
    }

    /// Shared round-trip counters (survive handing the stub to a worker)
    pub fn counts(&self) -> Arc<CallCounts> {
        Arc::clone(&self.counts)
    }

    /// Recorded `(tool_name, arguments)` pairs, in invocation order
    pub fn invocations(&self) -> Arc<Mutex<Vec<(String, Value)>>> {
        Arc::clone(&self.invocations)
    }
}

#[async_trait]
impl RegistryTransport for StubRegistry {
    async fn list_tools(&self) -> RegistryResult<Vec<ToolSpec>> {
        self.counts.list_tools.fetch_add(1, Ordering::SeqCst);
        Ok(self.tools.clone())
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> RegistryResult<RawToolOutput> {
        self.counts.call_tool.fetch_add(1, Ordering::SeqCst);
        self.invocations
            .lock()
            .push((name.to_string(), arguments));
        self.tool_outputs
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::Transport(format!("stub has no output for '{name}'")))
    }

    async fn list_prompts(&self) -> RegistryResult<Vec<PromptSpec>> {
        self.counts.list_prompts.fetch_add(1, Ordering::SeqCst);
        Ok(self.prompts.clone())
    }

    async fn get_prompt(&self, name: &str, _arguments: Value) -> RegistryResult<Vec<ChatMessage>> {
        self.counts.get_prompt.fetch_add(1, Ordering::SeqCst);
        self.prompt_messages
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::Transport(format!("stub has no prompt '{name}'")))
    }

    async fn shutdown(self: Box<Self>) -> RegistryResult<()> {
        Ok(())
    }
}
