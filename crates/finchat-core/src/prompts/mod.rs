//! Prompt runner
//!
//! Discovers the registry's prompt templates, materializes them with
//! caller-supplied arguments, and feeds the result into the model/tool round
//! loop. Required arguments are checked locally before the registry is ever
//! contacted.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::error::{RegistryError, RegistryResult};
use crate::logging::Logger;
use crate::providers::ProviderError;
use crate::registry::{PromptArgSpec, PromptSpec, RegistryHandle};
use crate::session::ChatEngine;
use crate::types::{ChatMessage, Transcript};

/// A validated prompt template descriptor.
///
/// Same lifecycle as tool descriptors: built once per registry connection,
/// immutable thereafter.
#[derive(Debug, Clone, Serialize)]
pub struct PromptDescriptor {
    /// Prompt name (unique within the registry)
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Declared arguments
    pub arguments: Vec<PromptArgSpec>,
}

impl PromptDescriptor {
    /// Validate a raw prompt spec into a descriptor
    pub fn from_spec(spec: &PromptSpec) -> RegistryResult<Self> {
        if spec.name.is_empty() {
            return Err(RegistryError::schema("<unnamed>", "prompt has no name"));
        }
        Ok(Self {
            name: spec.name.clone(),
            description: spec.description.clone(),
            arguments: spec.arguments.clone(),
        })
    }

    /// Names of the arguments that must be supplied
    pub fn required_arguments(&self) -> Vec<&str> {
        self.arguments
            .iter()
            .filter(|arg| arg.required)
            .map(|arg| arg.name.as_str())
            .collect()
    }
}

/// Errors from a prompt-driven workflow: either side of the bridge can fail.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("model provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Outcome of one complete workflow run.
#[derive(Debug, Clone)]
pub struct WorkflowOutcome {
    /// The full transcript, including the seeded prompt messages
    pub transcript: Transcript,
    /// Final (or partial, when `limit_hit`) answer text
    pub answer: String,
    /// Model round trips used
    pub rounds_used: usize,
    /// True when `max_rounds` cut the workflow short
    pub limit_hit: bool,
}

/// Discovers prompt templates and runs them as multi-round workflows.
pub struct PromptRunner {
    registry: RegistryHandle,
    descriptors: RwLock<Vec<PromptDescriptor>>,
    logger: Arc<dyn Logger>,
}

impl PromptRunner {
    /// Create a runner over a registry handle
    pub fn new(registry: RegistryHandle, logger: Arc<dyn Logger>) -> Self {
        Self {
            registry,
            descriptors: RwLock::new(Vec::new()),
            logger,
        }
    }

    /// Query the registry once and validate every prompt descriptor
    pub async fn discover(&self) -> RegistryResult<Vec<PromptDescriptor>> {
        let specs = self.registry.list_prompts().await?;

        let mut descriptors = Vec::with_capacity(specs.len());
        for spec in &specs {
            descriptors.push(PromptDescriptor::from_spec(spec)?);
        }

        self.logger.info(&format!(
            "[prompts] Discovered {} prompts",
            descriptors.len()
        ));

        *self.descriptors.write() = descriptors.clone();
        Ok(descriptors)
    }

    /// The validated descriptor set from the last discovery
    pub fn prompts(&self) -> Vec<PromptDescriptor> {
        self.descriptors.read().clone()
    }

    /// Look up a descriptor by name
    pub fn descriptor(&self, name: &str) -> Option<PromptDescriptor> {
        self.descriptors
            .read()
            .iter()
            .find(|d| d.name == name)
            .cloned()
    }

    /// Materialize a prompt template into its message sequence.
    ///
    /// Fails with `MissingArgument` - before contacting the registry - if any
    /// required argument is absent. The registry's message sequence is
    /// returned unchanged.
    pub async fn render(&self, name: &str, arguments: &Value) -> RegistryResult<Vec<ChatMessage>> {
        let descriptor = self
            .descriptor(name)
            .ok_or_else(|| RegistryError::UnknownPrompt(name.to_string()))?;

        for required in descriptor.required_arguments() {
            if arguments.get(required).is_none() {
                return Err(RegistryError::missing_argument(name, required));
            }
        }

        self.registry.get_prompt(name, arguments.clone()).await
    }

    /// Render a prompt and drive it through the model/tool round loop.
    ///
    /// Stops when the model emits a tool-call-free answer or after
    /// `max_rounds` rounds, in which case the last model output is returned
    /// as a partial result - a policy choice, not a failure.
    pub async fn run_workflow(
        &self,
        name: &str,
        arguments: &Value,
        engine: &ChatEngine,
        max_rounds: usize,
    ) -> Result<WorkflowOutcome, WorkflowError> {
        let messages = self.render(name, arguments).await?;

        self.logger.info(&format!(
            "[prompts] Running workflow '{}' with {} seeded message(s)",
            name,
            messages.len()
        ));

        let mut transcript = Transcript::from_messages(&messages);
        let outcome = engine.drive(&mut transcript, max_rounds).await?;

        Ok(WorkflowOutcome {
            transcript,
            answer: outcome.answer,
            rounds_used: outcome.rounds_used,
            limit_hit: outcome.limit_hit,
        })
    }
}
