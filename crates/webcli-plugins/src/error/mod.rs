//! Domain errors raised while resolving and executing library operations.
//!
//! All errors use `thiserror`-derived enums with structured context so callers
//! can inspect the failure programmatically. I/O errors are wrapped in `Arc`
//! to satisfy the `result_large_err` Clippy lint.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors arising from registry, resolution, and submission operations.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The operation branch did not name a library.
    #[error("operation branch is empty; expected a library name")]
    EmptyBranch,

    /// The first branch segment does not name a registered library.
    #[error("library '{name}' is not registered")]
    UnknownLibrary {
        /// Library name that was looked up.
        name: String,
    },

    /// The remaining branch segments do not resolve in the library's tree.
    #[error("no node at '{branch}' in library '{library}' (stopped at '{segment}')")]
    PathNotFound {
        /// Library whose tree was walked.
        library: String,
        /// Dotted branch below the library root.
        branch: String,
        /// Segment that failed to resolve.
        segment: String,
    },

    /// The branch resolved to a folder where an operation was required.
    #[error("'{branch}' in library '{library}' is a folder, not an operation")]
    NotAnOperation {
        /// Library whose tree was walked.
        library: String,
        /// Dotted branch below the library root.
        branch: String,
    },

    /// A library could not be instantiated while populating the registry.
    #[error("library '{name}' failed to load: {message}")]
    LoadFailure {
        /// Declared library name.
        name: String,
        /// Human-readable failure description.
        message: String,
    },

    /// The registry rejected a declaration.
    #[error("registry error: {message}")]
    Registry {
        /// Description of the rejected declaration.
        message: String,
    },

    /// A library rejected the submitted command or parameter selections.
    #[error("library '{library}' rejected the submission: {message}")]
    InvalidSubmission {
        /// Library that rejected the submission.
        library: String,
        /// Reason reported by the library.
        message: String,
    },

    /// A library returned a malformed parameter schema.
    #[error("library '{library}' returned an invalid schema for '{branch}': {message}")]
    InvalidSchema {
        /// Library that produced the schema.
        library: String,
        /// Dotted branch below the library root.
        branch: String,
        /// Structural problem found in the schema.
        message: String,
    },

    /// The command process could not be spawned.
    #[error("failed to start '{program}': {message}")]
    Spawn {
        /// Program that was spawned.
        program: String,
        /// Human-readable failure description.
        message: String,
        /// Optional underlying I/O error.
        #[source]
        source: Option<Arc<std::io::Error>>,
    },

    /// An I/O error occurred while supervising a command process.
    #[error("I/O error running command against '{target}': {source}")]
    Io {
        /// Target the command was running against.
        target: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The command did not complete within the configured timeout.
    #[error("command against '{target}' timed out after {timeout_secs}s")]
    Timeout {
        /// Target the command was running against.
        target: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },

    /// The command completed abnormally against a target.
    #[error("command against '{target}' exited with status {status}: {output}")]
    ExecutionFailure {
        /// Target the command was running against.
        target: String,
        /// Process exit status, or -1 when terminated by a signal.
        status: i32,
        /// Captured diagnostic output.
        output: String,
    },

    /// The success payload could not be serialized.
    #[error("failed to serialise result payload: {0}")]
    SerializePayload(#[source] serde_json::Error),
}

/// Coarse classification used at the boundary to pick a response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A stale or invalid branch or submission supplied by the caller.
    ClientInput,
    /// A server-side declaration or loading problem.
    Configuration,
    /// The external action failed or could not be supervised.
    Execution,
}

impl PluginError {
    /// Returns the boundary classification for this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyBranch
            | Self::UnknownLibrary { .. }
            | Self::PathNotFound { .. }
            | Self::NotAnOperation { .. }
            | Self::InvalidSubmission { .. } => ErrorCategory::ClientInput,
            Self::LoadFailure { .. } | Self::Registry { .. } | Self::InvalidSchema { .. } => {
                ErrorCategory::Configuration
            }
            Self::Spawn { .. }
            | Self::Io { .. }
            | Self::Timeout { .. }
            | Self::ExecutionFailure { .. }
            | Self::SerializePayload(_) => ErrorCategory::Execution,
        }
    }

    /// Returns the stable wire identifier of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EmptyBranch => "empty_branch",
            Self::UnknownLibrary { .. } => "unknown_library",
            Self::PathNotFound { .. } => "path_not_found",
            Self::NotAnOperation { .. } => "not_an_operation",
            Self::LoadFailure { .. } => "load_failure",
            Self::Registry { .. } => "registry",
            Self::InvalidSubmission { .. } => "invalid_submission",
            Self::InvalidSchema { .. } => "invalid_schema",
            Self::Spawn { .. } => "spawn",
            Self::Io { .. } => "io",
            Self::Timeout { .. } => "timeout",
            Self::ExecutionFailure { .. } => "execution_failure",
            Self::SerializePayload(_) => "serialize_payload",
        }
    }

    /// Returns `true` when the caller supplied an invalid branch or submission.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self.category(), ErrorCategory::ClientInput)
    }
}
