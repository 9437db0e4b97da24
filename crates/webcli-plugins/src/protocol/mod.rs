//! Boundary request and response types.
//!
//! These are the transport-agnostic shapes of the submission call and of
//! the failures every call can return. Field names follow the established
//! wire format:
//!
//! ```json
//! { "operationBranch": ["net", "ping"], "command": ["ping", "-c", "1"], "servers": ["localhost"] }
//! ```


use serde::{Deserialize, Serialize};

use crate::error::{ErrorCategory, PluginError};

/// Asks for an operation to be executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    /// Library name followed by the path to the operation.
    pub operation_branch: Vec<String>,
    /// Ordered argument tokens to run.
    pub command: Vec<String>,
    /// Targets to run against, in order.
    #[serde(default)]
    pub servers: Vec<String>,
}

impl SubmissionRequest {
    /// Creates a submission with no targets.
    #[must_use]
    pub const fn new(operation_branch: Vec<String>, command: Vec<String>) -> Self {
        Self {
            operation_branch,
            command,
            servers: Vec::new(),
        }
    }

    /// Sets the targets.
    #[must_use]
    pub fn with_servers(mut self, servers: Vec<String>) -> Self {
        self.servers = servers;
        self
    }
}

/// Structured failure returned to callers.
///
/// # Example
///
/// ```
/// use webcli_plugins::protocol::ErrorResponse;
/// use webcli_plugins::PluginError;
///
/// let response = ErrorResponse::from(&PluginError::UnknownLibrary { name: "nope".into() });
/// assert_eq!(response.kind, "unknown_library");
/// assert!(response.message.contains("nope"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error identifier.
    pub kind: String,
    /// Coarse classification.
    pub category: ErrorCategory,
    /// Human-readable description, including any captured diagnostics.
    pub message: String,
}

impl ErrorResponse {
    /// Creates a response for a failure raised outside the engine.
    #[must_use]
    pub fn new(kind: impl Into<String>, category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            category,
            message: message.into(),
        }
    }
}

impl From<&PluginError> for ErrorResponse {
    fn from(error: &PluginError) -> Self {
        Self {
            kind: error.kind().to_owned(),
            category: error.category(),
            message: error.to_string(),
        }
    }
}
