//! Shared configuration for the `webcli` binary and its libraries.
//!
//! Values are layered by `ortho_config`: built-in defaults, then a
//! configuration file (`--config-path` or `WEBCLI_CONFIG_PATH`), then
//! `WEBCLI_*` environment variables, then command-line flags. Library
//! declarations are structured and may only come from the file or the
//! environment.

mod declaration;
mod defaults;
mod logging;

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use declaration::{DeclarationError, LibraryDeclaration, validate_declarations};
pub use defaults::{
    DEFAULT_LOG_FILTER, default_log_filter, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved `webcli` configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "WEBCLI")]
pub struct Config {
    /// `tracing` filter directive, e.g. `info` or `webcli_plugins=debug`.
    #[serde(default = "defaults::default_log_filter_string")]
    #[ortho_config(default = defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[serde(default = "defaults::default_log_format")]
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
    /// Ordered library declarations.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub libraries: Vec<LibraryDeclaration>,
    /// Per-target time limit for spawned commands, in seconds. Zero or
    /// absent means no limit.
    #[serde(default)]
    pub execution_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            libraries: Vec::new(),
            execution_timeout_secs: None,
        }
    }
}

impl Config {
    /// Returns the configured log filter.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the library declarations in configured order.
    #[must_use]
    pub fn libraries(&self) -> &[LibraryDeclaration] {
        self.libraries.as_slice()
    }

    /// Returns the per-target execution limit, if one is configured.
    #[must_use]
    pub const fn execution_timeout(&self) -> Option<Duration> {
        defaults::timeout_from_secs(self.execution_timeout_secs)
    }

    /// Checks the declaration list for blank fields and repeated library
    /// names or loader targets.
    ///
    /// # Errors
    ///
    /// Returns the first [`DeclarationError`] in declaration order.
    pub fn validate_declarations(&self) -> Result<(), DeclarationError> {
        validate_declarations(&self.libraries)
    }
}
