//! Chat session and the model/tool round loop
//!
//! A session is a state machine over a single, exclusively-owned transcript:
//!
//! ```text
//! AwaitingUserInput -> ModelThinking -> {ToolExecuting -> ModelThinking}* -> AwaitingUserInput
//! ```
//!
//! Each round asks the model for its next action. A response with tool calls
//! moves to `ToolExecuting`: every requested call runs, one at a time, in
//! model order, and the results are appended before asking the model again.
//! A response with no tool calls is the user-visible answer and ends the
//! round - the model, not this component, decides termination, so a bounded
//! round count guards against a model that never stops requesting tools.
//! Hitting the bound yields the last model output as a degraded partial
//! answer, not an error.

use std::sync::Arc;

use crate::adapter::ToolAdapter;
use crate::logging::Logger;
use crate::providers::{ChatOptions, Provider, ProviderModelConfig, ProviderResult};
use crate::types::{ChatMessage, Transcript};

/// The user-visible outcome of driving one round loop.
#[derive(Debug, Clone)]
pub struct DriveOutcome {
    /// The final (or, when `limit_hit`, best-effort partial) answer
    pub answer: String,
    /// Model round trips actually used
    pub rounds_used: usize,
    /// True when the round limit cut the loop short
    pub limit_hit: bool,
}

/// Everything needed to drive a conversation: the model provider, the tool
/// adapter, and the per-conversation policy (model id, options, round limit).
///
/// The engine is stateless across calls; transcripts are owned by their
/// sessions and borrowed for the duration of one drive.
pub struct ChatEngine {
    provider: Arc<dyn Provider>,
    adapter: Arc<ToolAdapter>,
    model: ProviderModelConfig,
    options: ChatOptions,
    max_rounds: usize,
    logger: Arc<dyn Logger>,
}

impl ChatEngine {
    /// Create an engine with the default round limit
    pub fn new(
        provider: Arc<dyn Provider>,
        adapter: Arc<ToolAdapter>,
        model: ProviderModelConfig,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            provider,
            adapter,
            model,
            options: ChatOptions::new(),
            max_rounds: 10,
            logger,
        }
    }

    /// Set the base chat options (system instruction, temperature, ...)
    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the maximum number of model/tool rounds per drive
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// The configured round limit
    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    /// The tool adapter behind this engine
    pub fn adapter(&self) -> &Arc<ToolAdapter> {
        &self.adapter
    }

    /// Drive the model/tool round loop over a transcript until the model
    /// produces a tool-call-free answer or `max_rounds` is exhausted.
    pub async fn drive(
        &self,
        transcript: &mut Transcript,
        max_rounds: usize,
    ) -> ProviderResult<DriveOutcome> {
        let options = self
            .options
            .clone()
            .with_tools(self.adapter.tool_definitions());

        let mut rounds_used = 0;

        while rounds_used < max_rounds {
            rounds_used += 1;

            // ModelThinking
            let turn = self
                .provider
                .chat(transcript, &self.model, &options)
                .await?;

            transcript.push_assistant(&turn.text);

            // No tool calls ends the round: this is the answer.
            if !turn.has_tool_calls() {
                return Ok(DriveOutcome {
                    answer: turn.text,
                    rounds_used,
                    limit_hit: false,
                });
            }

            self.logger.debug(&format!(
                "[session] round {}: executing {} tool call(s)",
                rounds_used,
                turn.tool_calls.len()
            ));

            // ToolExecuting: one at a time, in model order
            for call in turn.tool_calls {
                transcript.push_tool_call(call.clone());
                let result = self.adapter.execute_tool_call(&call).await;
                transcript.push_tool_result(result);
            }
        }

        self.logger.warn(&format!(
            "[session] round limit ({max_rounds}) reached; returning partial answer"
        ));

        Ok(DriveOutcome {
            answer: transcript
                .last_assistant_text()
                .unwrap_or_default()
                .to_string(),
            rounds_used,
            limit_hit: true,
        })
    }
}

/// One conversation: holds the transcript and turns user messages into
/// answers through the engine's round loop.
pub struct ChatSession {
    engine: Arc<ChatEngine>,
    transcript: Transcript,
}

impl ChatSession {
    /// Start an empty conversation
    pub fn new(engine: Arc<ChatEngine>) -> Self {
        Self {
            engine,
            transcript: Transcript::new(),
        }
    }

    /// Start a conversation seeded from prior plain-text history
    pub fn with_history(engine: Arc<ChatEngine>, history: &[ChatMessage]) -> Self {
        Self {
            engine,
            transcript: Transcript::from_messages(history),
        }
    }

    /// Send a user message and run rounds until the model answers
    pub async fn send(&mut self, message: &str) -> ProviderResult<DriveOutcome> {
        self.transcript.push_user(message);
        let max_rounds = self.engine.max_rounds();
        self.engine.drive(&mut self.transcript, max_rounds).await
    }

    /// The transcript so far
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}
