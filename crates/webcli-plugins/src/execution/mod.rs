//! The execution collaborator boundary.
//!
//! Libraries hand a finished argument list and a target list to a
//! [`CommandExecutor`]. The production implementation is
//! [`ProcessExecutor`](crate::process::ProcessExecutor); tests substitute
//! doubles that return canned reports.


use serde::{Deserialize, Serialize};

use crate::error::PluginError;

/// Outcome of running a command against one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRun {
    /// Target the command ran against, or `None` when no targets were
    /// supplied.
    pub target: Option<String>,
    /// Process exit status.
    pub status: i32,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl TargetRun {
    /// Returns `true` when the run exited with status zero.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.status == 0
    }
}

/// Per-target results of a successful execution, in target order.
///
/// # Example
///
/// ```
/// use webcli_plugins::execution::{ExecutionReport, TargetRun};
///
/// let report = ExecutionReport::new(vec![TargetRun {
///     target: Some("localhost".into()),
///     status: 0,
///     stdout: "pong".into(),
///     stderr: String::new(),
/// }]);
/// assert_eq!(report.runs().len(), 1);
/// assert_eq!(report.combined_stdout(), "pong");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    runs: Vec<TargetRun>,
}

impl ExecutionReport {
    /// Creates a report from completed runs.
    #[must_use]
    pub const fn new(runs: Vec<TargetRun>) -> Self {
        Self { runs }
    }

    /// Returns the runs in target order.
    #[must_use]
    pub fn runs(&self) -> &[TargetRun] {
        &self.runs
    }

    /// Concatenates the standard output of every run.
    #[must_use]
    pub fn combined_stdout(&self) -> String {
        self.runs.iter().map(|run| run.stdout.as_str()).collect()
    }
}

/// Performs the external invocation of a finished command.
///
/// # Example
///
/// ```
/// use webcli_plugins::execution::{CommandExecutor, ExecutionReport};
/// use webcli_plugins::PluginError;
///
/// struct DryRun;
///
/// impl CommandExecutor for DryRun {
///     fn execute(
///         &self,
///         _arguments: &[String],
///         _servers: &[String],
///     ) -> Result<ExecutionReport, PluginError> {
///         Ok(ExecutionReport::default())
///     }
/// }
///
/// assert!(DryRun.execute(&["true".into()], &[]).is_ok());
/// ```
pub trait CommandExecutor: Send + Sync {
    /// Runs `arguments` once per entry in `servers`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::ExecutionFailure`] carrying the target's
    /// diagnostics on abnormal completion, or a spawn, I/O or timeout error.
    fn execute(
        &self,
        arguments: &[String],
        servers: &[String],
    ) -> Result<ExecutionReport, PluginError>;
}
