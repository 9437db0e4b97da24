//! Error types and exit-code mapping for the CLI runtime.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use thiserror::Error;
use webcli_config::DeclarationError;
use webcli_plugins::parameter::ParameterError;
use webcli_plugins::protocol::ErrorResponse;
use webcli_plugins::{ErrorCategory, PluginError};

use crate::telemetry::TelemetryError;

/// Exit status for client-input errors.
const EXIT_CLIENT_INPUT: u8 = 2;
/// Exit status for configuration and library loading errors.
const EXIT_CONFIGURATION: u8 = 3;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("invalid library declarations: {0}")]
    Declarations(#[from] DeclarationError),
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Plugin(#[from] PluginError),
    #[error("failed to read schema from stdin: {0}")]
    ReadSchema(io::Error),
    #[error("stdin is not a parameter schema: {0}")]
    ParseSchema(serde_json::Error),
    #[error("schema for '{branch}' is not ready: {source}")]
    IncompleteSchema {
        branch: String,
        #[source]
        source: ParameterError,
    },
    #[error("operation '{branch}' declares no module to run")]
    MissingModule { branch: String },
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(serde_json::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
}

impl AppError {
    /// Returns the boundary classification for this error.
    pub(crate) const fn category(&self) -> ErrorCategory {
        match self {
            Self::CliUsage(_)
            | Self::ParseSchema(_)
            | Self::IncompleteSchema { .. }
            | Self::MissingModule { .. } => ErrorCategory::ClientInput,
            Self::LoadConfiguration(_) | Self::Declarations(_) | Self::Telemetry(_) => {
                ErrorCategory::Configuration
            }
            Self::Plugin(error) => error.category(),
            Self::ReadSchema(_) | Self::SerialiseOutput(_) | Self::WriteOutput(_) => {
                ErrorCategory::Execution
            }
        }
    }

    /// Returns the stable identifier written in the error payload.
    pub(crate) const fn kind(&self) -> &'static str {
        match self {
            Self::LoadConfiguration(_) => "configuration",
            Self::CliUsage(_) => "usage",
            Self::Declarations(_) => "invalid_declarations",
            Self::Telemetry(_) => "telemetry",
            Self::Plugin(error) => error.kind(),
            Self::ReadSchema(_) => "read_schema",
            Self::ParseSchema(_) => "parse_schema",
            Self::IncompleteSchema { .. } => "incomplete_schema",
            Self::MissingModule { .. } => "missing_module",
            Self::SerialiseOutput(_) | Self::WriteOutput(_) => "output",
        }
    }

    pub(crate) fn exit_code(&self) -> ExitCode {
        match self.category() {
            ErrorCategory::ClientInput => ExitCode::from(EXIT_CLIENT_INPUT),
            ErrorCategory::Configuration => ExitCode::from(EXIT_CONFIGURATION),
            ErrorCategory::Execution => ExitCode::FAILURE,
        }
    }

    pub(crate) fn to_response(&self) -> ErrorResponse {
        match self {
            Self::Plugin(error) => ErrorResponse::from(error),
            other => ErrorResponse::new(other.kind(), other.category(), other.to_string()),
        }
    }
}
