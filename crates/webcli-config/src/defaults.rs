//! Built-in configuration defaults.

use std::time::Duration;

use crate::logging::LogFormat;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Converts a configured timeout in whole seconds. Zero disables the limit.
#[must_use]
pub const fn timeout_from_secs(secs: Option<u64>) -> Option<Duration> {
    match secs {
        Some(0) | None => None,
        Some(value) => Some(Duration::from_secs(value)),
    }
}
