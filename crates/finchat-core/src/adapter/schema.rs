//! Validated tool descriptors
//!
//! Remote-declared parameter metadata is turned into an explicit
//! parameter-type enumeration once, at discovery time. Invocation-time
//! checking then reduces to presence and type matching against the
//! already-validated schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RegistryError, RegistryResult};
use crate::registry::ToolSpec;

/// The parameter types a registry tool may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

impl ParamType {
    /// Parse a JSON-schema property node into a parameter type.
    ///
    /// A property without a `type` keyword is treated as a string, matching
    /// what the registry's own tooling assumes; an unknown type name is a
    /// schema error.
    pub fn from_schema(property: &Value) -> Result<Self, String> {
        let ty = match property.get("type") {
            None => return Ok(ParamType::String),
            Some(Value::String(s)) => s.as_str(),
            Some(other) => return Err(format!("non-string type keyword: {other}")),
        };

        match ty {
            "string" => Ok(ParamType::String),
            "number" => Ok(ParamType::Number),
            "integer" => Ok(ParamType::Integer),
            "boolean" => Ok(ParamType::Boolean),
            "array" => Ok(ParamType::Array),
            "object" => Ok(ParamType::Object),
            other => Err(format!("unsupported parameter type '{other}'")),
        }
    }

    /// Check whether a JSON value matches this type
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Number => value.is_number(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Array => value.is_array(),
            ParamType::Object => value.is_object(),
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Object => "object",
        };
        write!(f, "{name}")
    }
}

/// One validated parameter of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Validated parameter type
    pub ty: ParamType,
    /// Whether the parameter must be supplied
    pub required: bool,
    /// Declared default, filled in for absent optional parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
}

/// A validated, immutable tool descriptor.
///
/// Built once per registry connection at discovery time and discarded on
/// disconnect. `raw_schema` keeps the registry's original JSON Schema for
/// handing to the model provider; `params` is the validated form used for
/// invocation-time checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name (unique within the registry)
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Ordered parameter list: (name, validated spec)
    pub params: Vec<(String, ParamSpec)>,
    /// The registry's original input schema, forwarded to the model
    pub raw_schema: Value,
}

impl ToolDescriptor {
    /// Validate a raw tool spec into a descriptor.
    ///
    /// Fails with `RegistryError::Schema` when the name is missing or a
    /// parameter type cannot be parsed.
    pub fn from_spec(spec: &ToolSpec) -> RegistryResult<Self> {
        if spec.name.is_empty() {
            return Err(RegistryError::schema("<unnamed>", "tool has no name"));
        }

        let mut params = Vec::new();

        if !spec.input_schema.is_null() {
            let schema = spec
                .input_schema
                .as_object()
                .ok_or_else(|| RegistryError::schema(&spec.name, "input schema is not an object"))?;

            let required: Vec<&str> = schema
                .get("required")
                .and_then(|r| r.as_array())
                .map(|items| items.iter().filter_map(|v| v.as_str()).collect())
                .unwrap_or_default();

            if let Some(properties) = schema.get("properties") {
                let properties = properties.as_object().ok_or_else(|| {
                    RegistryError::schema(&spec.name, "properties is not an object")
                })?;

                for (param_name, property) in properties {
                    let ty = ParamType::from_schema(property).map_err(|reason| {
                        RegistryError::schema(
                            &spec.name,
                            format!("parameter '{param_name}': {reason}"),
                        )
                    })?;

                    params.push((
                        param_name.clone(),
                        ParamSpec {
                            ty,
                            required: required.contains(&param_name.as_str()),
                            default: property.get("default").cloned(),
                            description: property
                                .get("description")
                                .and_then(|d| d.as_str())
                                .unwrap_or_default()
                                .to_string(),
                        },
                    ));
                }
            }
        }

        Ok(Self {
            name: spec.name.clone(),
            description: spec.description.clone(),
            params,
            raw_schema: spec.input_schema.clone(),
        })
    }

    /// Look up a parameter spec by name
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params
            .iter()
            .find(|(param_name, _)| param_name == name)
            .map(|(_, spec)| spec)
    }
}
