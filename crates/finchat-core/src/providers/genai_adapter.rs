//! Adapter between finchat-core types and genai types
//!
//! Conversion functions between our transcript/tool types and genai's chat
//! types, plus client construction. Auth flows through our `SecretStore`,
//! not genai's default env var lookup, so key resolution stays in one place
//! and keys never leak into logs.

use std::sync::Arc;

use genai::adapter::AdapterKind;
use genai::chat::{
    ChatMessage as GenaiMessage, ChatOptions as GenaiOptions, ChatResponse,
    Tool as GenaiTool, ToolCall as GenaiToolCall, ToolResponse as GenaiToolResponse,
};
use genai::resolver::{AuthData, AuthResolver};
use genai::{Client, ModelIden};

use crate::secrets::SecretStore;
use crate::types::{ConversationTurn, ModelTurn, ToolCall, Transcript};

use super::traits::{ChatOptions, ToolDefinition};

// ============================================================================
// Transcript Conversion: finchat -> genai
// ============================================================================

/// Convert a transcript into the genai message sequence.
///
/// Consecutive tool-call turns are folded into a single assistant tool-call
/// message, mirroring how the model emitted them; tool-result turns become
/// tool-response messages correlated by call id.
pub fn to_genai_messages(transcript: &Transcript) -> Vec<GenaiMessage> {
    let mut messages = Vec::new();
    let mut pending_calls: Vec<GenaiToolCall> = Vec::new();

    for turn in transcript.turns() {
        if !matches!(turn, ConversationTurn::ToolCall { .. }) && !pending_calls.is_empty() {
            messages.push(GenaiMessage::from(std::mem::take(&mut pending_calls)));
        }

        match turn {
            ConversationTurn::User { text } => {
                messages.push(GenaiMessage::user(text.clone()));
            }
            ConversationTurn::Assistant { text } => {
                // The model may answer with tool calls only; skip the empty
                // text message those turns would produce.
                if !text.is_empty() {
                    messages.push(GenaiMessage::assistant(text.clone()));
                }
            }
            ConversationTurn::ToolCall { call } => {
                pending_calls.push(to_genai_tool_call(call));
            }
            ConversationTurn::ToolResult { result } => {
                messages.push(GenaiMessage::from(GenaiToolResponse::new(
                    result.call_id.clone(),
                    result.content.clone(),
                )));
            }
        }
    }

    if !pending_calls.is_empty() {
        messages.push(GenaiMessage::from(pending_calls));
    }

    messages
}

/// Convert a finchat ToolCall to a genai ToolCall
pub fn to_genai_tool_call(call: &ToolCall) -> GenaiToolCall {
    GenaiToolCall {
        call_id: call.id.clone(),
        fn_name: call.name.clone(),
        fn_arguments: call.arguments.clone(),
        thought_signatures: None,
    }
}

// ============================================================================
// Tool Conversion: finchat -> genai
// ============================================================================

/// Convert a tool definition to a genai Tool
pub fn to_genai_tool(tool: &ToolDefinition) -> GenaiTool {
    GenaiTool::new(&tool.name)
        .with_description(&tool.description)
        .with_schema(tool.input_schema.clone())
}

/// Convert tool definitions to genai tools
pub fn to_genai_tools(tools: &[ToolDefinition]) -> Vec<GenaiTool> {
    tools.iter().map(to_genai_tool).collect()
}

// ============================================================================
// Options Conversion: finchat -> genai
// ============================================================================

/// Convert finchat ChatOptions to genai ChatOptions
pub fn to_genai_options(options: &ChatOptions) -> GenaiOptions {
    let mut genai_opts = GenaiOptions::default();

    if let Some(temp) = options.temperature {
        genai_opts = genai_opts.with_temperature(temp as f64);
    }

    if let Some(max_tokens) = options.max_tokens {
        genai_opts = genai_opts.with_max_tokens(max_tokens);
    }

    genai_opts
}

// ============================================================================
// Response Conversion: genai -> finchat
// ============================================================================

/// Convert a genai ChatResponse into one complete model turn
pub fn from_genai_response(response: ChatResponse) -> ModelTurn {
    let text = response
        .first_text()
        .map(|s| s.to_string())
        .unwrap_or_default();

    let tool_calls = response
        .into_tool_calls()
        .into_iter()
        .map(|tc| ToolCall {
            id: tc.call_id,
            name: tc.fn_name,
            arguments: tc.fn_arguments,
        })
        .collect();

    ModelTurn { text, tool_calls }
}

// ============================================================================
// Client Creation with Custom Auth
// ============================================================================

/// Map a genai AdapterKind to the secret store lookup key
pub fn adapter_kind_to_provider(adapter: AdapterKind) -> String {
    match adapter {
        AdapterKind::OpenAI => "openai".to_string(),
        AdapterKind::Anthropic => "anthropic".to_string(),
        AdapterKind::Gemini => "gemini".to_string(),
        AdapterKind::Groq => "groq".to_string(),
        AdapterKind::Ollama => "ollama".to_string(),
        other => format!("{other:?}").to_lowercase(),
    }
}

/// Create a genai Client whose auth resolves through the given secret store.
///
/// An explicit key in the model config wins; otherwise the key is looked up
/// by provider name at request time.
pub fn create_client(explicit_api_key: Option<String>, secrets: Arc<dyn SecretStore>) -> Client {
    let auth_resolver = AuthResolver::from_resolver_fn(
        move |model_iden: ModelIden| -> Result<Option<AuthData>, genai::resolver::Error> {
            if let Some(key) = explicit_api_key.clone() {
                return Ok(Some(AuthData::from_single(key)));
            }

            let provider = adapter_kind_to_provider(model_iden.adapter_kind);
            Ok(secrets.get(&provider).map(AuthData::from_single))
        },
    );

    Client::builder().with_auth_resolver(auth_resolver).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolResult;
    use serde_json::json;

    #[test]
    fn test_transcript_conversion_folds_tool_calls() {
        let mut transcript = Transcript::new();
        transcript.push_user("Calculate HPL for ACCT-001 using FHC");
        transcript.push_assistant("");
        transcript.push_tool_call(ToolCall::new("c1", "get_hpl_formula", json!({"hierarchy": "FHC"})));
        transcript.push_tool_call(ToolCall::new(
            "c2",
            "calculate_hypothetical_pnl",
            json!({"hierarchy": "FHC", "account_number": "ACCT-001"}),
        ));
        transcript.push_tool_result(ToolResult::success("c1", "get_hpl_formula", "formula"));
        transcript.push_tool_result(ToolResult::success("c2", "calculate_hypothetical_pnl", "42"));

        let messages = to_genai_messages(&transcript);
        // user, one folded tool-call message, two tool responses
        assert_eq!(messages.len(), 4);
    }

    #[test]
    fn test_empty_assistant_text_is_skipped() {
        let mut transcript = Transcript::new();
        transcript.push_user("hi");
        transcript.push_assistant("");
        let messages = to_genai_messages(&transcript);
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_tool_conversion() {
        let tool = ToolDefinition {
            name: "get_hpl_formula".to_string(),
            description: "Get the HPL formula for a hierarchy".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": { "hierarchy": { "type": "string" } },
                "required": ["hierarchy"]
            }),
        };

        let genai_tool = to_genai_tool(&tool);
        assert_eq!(genai_tool.name, "get_hpl_formula");
    }

    #[test]
    fn test_adapter_kind_mapping() {
        assert_eq!(adapter_kind_to_provider(AdapterKind::Anthropic), "anthropic");
        assert_eq!(adapter_kind_to_provider(AdapterKind::OpenAI), "openai");
    }

    #[test]
    fn test_create_client_with_memory_store() {
        let store = Arc::new(crate::secrets::MemorySecretStore::with_secret(
            "anthropic",
            "sk-ant-test",
        ));
        // Construction must not touch the network or panic; the resolver runs
        // lazily at request time.
        let _client = create_client(None, store);
        let _client_with_key = create_client(
            Some("sk-explicit".to_string()),
            Arc::new(crate::secrets::MemorySecretStore::new()),
        );
    }
}
