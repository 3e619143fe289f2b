//! Conversation transcript types
//!
//! A transcript is the ordered, append-only sequence of turns for one
//! session. Every tool-call turn must eventually be followed by a matching
//! tool-result turn (same correlation id) before the round is complete.

use serde::{Deserialize, Serialize};

use super::message::{ChatMessage, MessageRole};
use super::tool::{ToolCall, ToolResult};

/// One entry in a conversation transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationTurn {
    /// Something the user said
    User { text: String },
    /// Something the model said (may be empty when the model only calls tools)
    Assistant { text: String },
    /// A tool call the model requested
    ToolCall { call: ToolCall },
    /// The result of an executed tool call
    ToolResult { result: ToolResult },
}

/// One complete model decision: text plus zero or more tool calls.
///
/// Providers return whole turns; there is no streaming in this layer.
#[derive(Debug, Clone, Default)]
pub struct ModelTurn {
    /// Text content of the response
    pub text: String,
    /// Tool calls the model wants executed, in model order
    pub tool_calls: Vec<ToolCall>,
}

impl ModelTurn {
    /// A plain text turn with no tool calls
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    /// True when the model requested at least one tool call
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// The ordered, append-only conversation history for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a transcript from a sequence of plain messages.
    ///
    /// System messages are folded into user turns; the registry only ever
    /// materializes user and assistant roles, but web clients may send either.
    pub fn from_messages(messages: &[ChatMessage]) -> Self {
        let mut transcript = Self::new();
        for msg in messages {
            match msg.role {
                MessageRole::Assistant => transcript.push_assistant(&msg.content),
                MessageRole::User | MessageRole::System => transcript.push_user(&msg.content),
            }
        }
        transcript
    }

    /// Append a user turn
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(ConversationTurn::User { text: text.into() });
    }

    /// Append an assistant turn
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(ConversationTurn::Assistant { text: text.into() });
    }

    /// Append a tool-call turn
    pub fn push_tool_call(&mut self, call: ToolCall) {
        self.turns.push(ConversationTurn::ToolCall { call });
    }

    /// Append a tool-result turn
    pub fn push_tool_result(&mut self, result: ToolResult) {
        self.turns.push(ConversationTurn::ToolResult { result });
    }

    /// All turns, in order
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when no turns have been recorded
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The text of the most recent assistant turn, if any
    pub fn last_assistant_text(&self) -> Option<&str> {
        self.turns.iter().rev().find_map(|turn| match turn {
            ConversationTurn::Assistant { text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Correlation ids of tool calls that have no matching result yet.
    ///
    /// The transcript for a round is complete only when this is empty.
    pub fn unresolved_calls(&self) -> Vec<&str> {
        let mut pending: Vec<&str> = Vec::new();
        for turn in &self.turns {
            match turn {
                ConversationTurn::ToolCall { call } => pending.push(call.id.as_str()),
                ConversationTurn::ToolResult { result } => {
                    pending.retain(|id| *id != result.call_id);
                }
                _ => {}
            }
        }
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transcript_ordering() {
        let mut transcript = Transcript::new();
        transcript.push_user("Calculate HPL for ACCT-001");
        transcript.push_assistant("");
        transcript.push_tool_call(ToolCall::new("c1", "calculate_hypothetical_pnl", json!({})));
        assert_eq!(transcript.unresolved_calls(), vec!["c1"]);

        transcript.push_tool_result(ToolResult::success("c1", "calculate_hypothetical_pnl", "42"));
        assert!(transcript.unresolved_calls().is_empty());
    }

    #[test]
    fn test_from_messages_folds_system_into_user() {
        let messages = vec![
            ChatMessage::system("You are a financial analyst"),
            ChatMessage::user("Which hierarchy?"),
            ChatMessage::assistant("Please pick FHC or PRA."),
        ];
        let transcript = Transcript::from_messages(&messages);
        assert_eq!(transcript.len(), 3);
        assert!(matches!(transcript.turns()[0], ConversationTurn::User { .. }));
        assert!(matches!(transcript.turns()[2], ConversationTurn::Assistant { .. }));
    }

    #[test]
    fn test_last_assistant_text() {
        let mut transcript = Transcript::new();
        assert!(transcript.last_assistant_text().is_none());
        transcript.push_user("hi");
        transcript.push_assistant("first");
        transcript.push_tool_call(ToolCall::new("c1", "t", json!({})));
        transcript.push_tool_result(ToolResult::success("c1", "t", "ok"));
        transcript.push_assistant("second");
        assert_eq!(transcript.last_assistant_text(), Some("second"));
    }

    #[test]
    fn test_turn_serialization_is_tagged() {
        let turn = ConversationTurn::User { text: "hi".into() };
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains("\"type\":\"user\""));
    }
}
