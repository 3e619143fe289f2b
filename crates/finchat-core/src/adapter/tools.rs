//! Tool adapter
//!
//! Discovers the registry's tools at startup and exposes each as a locally
//! callable, schema-checked operation. Arguments are validated against the
//! descriptor before any channel round trip; a call that fails validation
//! never reaches the registry.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::error::{RegistryError, RegistryResult};
use crate::logging::Logger;
use crate::providers::ToolDefinition;
use crate::registry::RegistryHandle;
use crate::types::{ToolCall, ToolResult};

use super::schema::ToolDescriptor;

/// Outcome of one adapter-level invocation.
///
/// `error` carries the registry's own failure response; validation and
/// channel failures surface as `RegistryError` instead.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Name of the invoked tool
    pub tool_name: String,
    /// Raw textual result, exactly as the registry returned it
    pub raw_output: String,
    /// The registry's failure response, if the invocation failed remotely
    pub error: Option<String>,
}

/// Adapter from registry tools to locally callable operations.
///
/// Owns no state beyond the immutable descriptor set fetched at discovery.
/// One adapter per registry connection; the underlying handle serializes
/// channel access.
pub struct ToolAdapter {
    registry: RegistryHandle,
    descriptors: RwLock<Vec<ToolDescriptor>>,
    logger: Arc<dyn Logger>,
}

impl ToolAdapter {
    /// Create an adapter over a registry handle
    pub fn new(registry: RegistryHandle, logger: Arc<dyn Logger>) -> Self {
        Self {
            registry,
            descriptors: RwLock::new(Vec::new()),
            logger,
        }
    }

    /// Query the registry once and validate every descriptor.
    ///
    /// Fails with `RegistryError::Unavailable` if the channel cannot be
    /// established and `RegistryError::Schema` if any descriptor is
    /// malformed.
    pub async fn discover(&self) -> RegistryResult<Vec<ToolDescriptor>> {
        let specs = self.registry.list_tools().await?;

        let mut descriptors = Vec::with_capacity(specs.len());
        for spec in &specs {
            descriptors.push(ToolDescriptor::from_spec(spec)?);
        }

        self.logger.info(&format!(
            "[adapter] Discovered {} tools: {}",
            descriptors.len(),
            descriptors
                .iter()
                .map(|d| d.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));

        *self.descriptors.write() = descriptors.clone();
        Ok(descriptors)
    }

    /// The validated descriptor set from the last discovery
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.descriptors.read().clone()
    }

    /// Look up a descriptor by name
    pub fn descriptor(&self, name: &str) -> Option<ToolDescriptor> {
        self.descriptors
            .read()
            .iter()
            .find(|d| d.name == name)
            .cloned()
    }

    /// Tool definitions in the shape the model provider expects
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.descriptors
            .read()
            .iter()
            .map(|d| ToolDefinition {
                name: d.name.clone(),
                description: d.description.clone(),
                input_schema: d.raw_schema.clone(),
            })
            .collect()
    }

    /// Invoke a tool by name with keyword arguments.
    ///
    /// Validates the name and arguments against the discovered descriptor
    /// before forwarding; a validation failure issues zero channel round
    /// trips. The registry's raw textual result is returned unmodified.
    pub async fn invoke(&self, name: &str, arguments: Value) -> RegistryResult<ToolOutput> {
        let descriptor = self
            .descriptor(name)
            .ok_or_else(|| RegistryError::UnknownTool(name.to_string()))?;

        let checked = validate_arguments(&descriptor, &arguments)?;

        let output = self
            .registry
            .call_tool(name, Value::Object(checked))
            .await?;

        Ok(ToolOutput {
            tool_name: name.to_string(),
            raw_output: if output.is_error {
                String::new()
            } else {
                output.text.clone()
            },
            error: output.is_error.then_some(output.text),
        })
    }

    /// Execute one model-requested tool call, mapping every recoverable
    /// failure into an error result the model can see.
    pub async fn execute_tool_call(&self, call: &ToolCall) -> ToolResult {
        match self.invoke(&call.name, call.arguments.clone()).await {
            Ok(output) => match output.error {
                None => ToolResult::success(&call.id, &call.name, output.raw_output),
                Some(error) => {
                    self.logger
                        .warn(&format!("[adapter] Tool '{}' failed: {}", call.name, error));
                    ToolResult::error(&call.id, &call.name, error)
                }
            },
            Err(err) => {
                self.logger
                    .warn(&format!("[adapter] Tool '{}' rejected: {}", call.name, err));
                ToolResult::error(&call.id, &call.name, err.to_string())
            }
        }
    }

    /// Execute several tool calls from one model response, one at a time,
    /// in model order. Sequential execution keeps transcript ordering
    /// deterministic.
    pub async fn execute_tool_calls(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.execute_tool_call(call).await);
        }
        results
    }

    /// Number of discovered tools
    pub fn tool_count(&self) -> usize {
        self.descriptors.read().len()
    }
}

/// Check arguments against a validated descriptor and fill declared defaults.
fn validate_arguments(
    descriptor: &ToolDescriptor,
    arguments: &Value,
) -> RegistryResult<Map<String, Value>> {
    let mut map = match arguments {
        Value::Object(m) => m.clone(),
        Value::Null => Map::new(),
        other => {
            return Err(RegistryError::invalid_argument(
                &descriptor.name,
                "<arguments>",
                format!("expected an argument object, got {other}"),
            ))
        }
    };

    for (param_name, spec) in &descriptor.params {
        match map.get(param_name) {
            None => {
                if let Some(default) = &spec.default {
                    map.insert(param_name.clone(), default.clone());
                } else if spec.required {
                    return Err(RegistryError::missing_argument(&descriptor.name, param_name));
                }
            }
            Some(value) => {
                if !spec.ty.matches(value) {
                    return Err(RegistryError::invalid_argument(
                        &descriptor.name,
                        param_name,
                        format!("expected {}, got {value}", spec.ty),
                    ));
                }
            }
        }
    }

    Ok(map)
}
