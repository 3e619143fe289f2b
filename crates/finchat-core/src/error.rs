//! Error taxonomy for the registry bridge
//!
//! `Unavailable` and `Schema` are startup-fatal: nothing can proceed without
//! a connected registry and valid descriptors. `UnknownTool`,
//! `MissingArgument`, and `InvalidArgument` are caller errors, reported back
//! to the model as tool errors so it can retry or apologize. `Transport` is
//! recoverable per-call and never retried automatically by this layer.

use thiserror::Error;

/// Errors surfaced by the registry channel, tool adapter, and prompt runner
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The registry channel could not be established
    #[error("registry unavailable: {0}")]
    Unavailable(String),

    /// A discovered descriptor is malformed
    #[error("invalid schema for '{name}': {reason}")]
    Schema { name: String, reason: String },

    /// The requested tool is not in the descriptor set
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The requested prompt template is not in the descriptor set
    #[error("unknown prompt: {0}")]
    UnknownPrompt(String),

    /// A required argument was not supplied
    #[error("missing required argument '{argument}' for '{name}'")]
    MissingArgument { name: String, argument: String },

    /// An argument did not match the declared parameter type
    #[error("invalid argument '{argument}' for '{name}': {reason}")]
    InvalidArgument {
        name: String,
        argument: String,
        reason: String,
    },

    /// The channel failed mid-call
    #[error("transport error: {0}")]
    Transport(String),
}

impl RegistryError {
    /// Create a schema error
    pub fn schema(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing-argument error
    pub fn missing_argument(name: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            name: name.into(),
            argument: argument.into(),
        }
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(
        name: impl Into<String>,
        argument: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// True for caller errors the model can recover from.
    ///
    /// These are fed back to the model as tool error messages rather than
    /// aborting the round.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RegistryError::UnknownTool(_)
                | RegistryError::UnknownPrompt(_)
                | RegistryError::MissingArgument { .. }
                | RegistryError::InvalidArgument { .. }
                | RegistryError::Transport(_)
        )
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability() {
        assert!(RegistryError::UnknownTool("x".into()).is_recoverable());
        assert!(RegistryError::missing_argument("t", "a").is_recoverable());
        assert!(RegistryError::Transport("broken pipe".into()).is_recoverable());
        assert!(!RegistryError::Unavailable("no socket".into()).is_recoverable());
        assert!(!RegistryError::schema("t", "bad type").is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = RegistryError::missing_argument("get_hpl_formula", "hierarchy");
        assert_eq!(
            err.to_string(),
            "missing required argument 'hierarchy' for 'get_hpl_formula'"
        );
    }
}
