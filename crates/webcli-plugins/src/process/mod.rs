//! Process-based command execution.
//!
//! [`ProcessExecutor`] implements [`CommandExecutor`] by spawning the command
//! once per target, appending the target as the final argument, capturing
//! stdout and stderr, and optionally enforcing a per-target timeout. The
//! first abnormal completion stops the sequence; nothing is retried.


use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::PluginError;
use crate::execution::{CommandExecutor, ExecutionReport, TargetRun};

/// Tracing target for command process operations.
const PROCESS_TARGET: &str = "webcli_plugins::process";

/// Interval between exit checks while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Executes commands by spawning child processes.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use webcli_plugins::execution::CommandExecutor;
/// use webcli_plugins::process::ProcessExecutor;
///
/// let executor = ProcessExecutor::new().with_timeout(Duration::from_secs(10));
/// let command = vec!["ping".to_owned(), "-c".to_owned(), "1".to_owned()];
/// let report = executor
///     .execute(&command, &["localhost".to_owned()])
///     .expect("ping succeeds");
/// assert_eq!(report.runs().len(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessExecutor {
    timeout: Option<Duration>,
}

impl ProcessExecutor {
    /// Creates an executor that waits indefinitely for each target.
    #[must_use]
    pub const fn new() -> Self {
        Self { timeout: None }
    }

    /// Limits how long each target's process may run.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the per-target timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl CommandExecutor for ProcessExecutor {
    fn execute(
        &self,
        arguments: &[String],
        servers: &[String],
    ) -> Result<ExecutionReport, PluginError> {
        let (program, fixed) = arguments
            .split_first()
            .ok_or_else(|| PluginError::Spawn {
                program: String::new(),
                message: String::from("command is empty"),
                source: None,
            })?;

        if servers.is_empty() {
            let run = self.run_target(program, fixed, None)?;
            return Ok(ExecutionReport::new(vec![run]));
        }

        let mut runs = Vec::with_capacity(servers.len());
        for server in servers {
            runs.push(self.run_target(program, fixed, Some(server))?);
        }
        Ok(ExecutionReport::new(runs))
    }
}

impl ProcessExecutor {
    /// Runs the command against one target and checks its exit status.
    fn run_target(
        &self,
        program: &str,
        fixed: &[String],
        target: Option<&str>,
    ) -> Result<TargetRun, PluginError> {
        let label = target.unwrap_or(program);

        let mut command = Command::new(program);
        command.args(fixed);
        command.args(target);
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        debug!(
            target: PROCESS_TARGET,
            program,
            server = target,
            argc = fixed.len(),
            "spawning command process"
        );

        let mut child = command.spawn().map_err(|err| PluginError::Spawn {
            program: program.to_owned(),
            message: err.to_string(),
            source: Some(Arc::new(err)),
        })?;

        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());
        let status = self.wait_for_exit(label, &mut child)?;
        let stdout = join_reader(label, stdout_reader)?;
        let stderr = join_reader(label, stderr_reader)?;
        let code = status.code().unwrap_or(-1);

        debug!(
            target: PROCESS_TARGET,
            program,
            server = target,
            status = code,
            "command process exited"
        );

        if !status.success() {
            return Err(PluginError::ExecutionFailure {
                target: label.to_owned(),
                status: code,
                output: diagnostics(&stdout, &stderr),
            });
        }

        Ok(TargetRun {
            target: target.map(str::to_owned),
            status: code,
            stdout,
            stderr,
        })
    }

    /// Waits for the child to exit, killing it once the timeout elapses.
    fn wait_for_exit(&self, label: &str, child: &mut Child) -> Result<ExitStatus, PluginError> {
        let io_error = |err: io::Error| PluginError::Io {
            target: label.to_owned(),
            source: Arc::new(err),
        };
        let Some(timeout) = self.timeout else {
            return child.wait().map_err(io_error);
        };

        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait().map_err(io_error)? {
                return Ok(status);
            }
            if start.elapsed() > timeout {
                warn!(
                    target: PROCESS_TARGET,
                    server = label,
                    timeout_secs = timeout.as_secs(),
                    "command timed out, killing process"
                );
                drop(child.kill());
                drop(child.wait());
                return Err(PluginError::Timeout {
                    target: label.to_owned(),
                    timeout_secs: timeout.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Drains a pipe on its own thread so the child never blocks on a full
/// buffer.
fn spawn_reader<R>(pipe: Option<R>) -> JoinHandle<io::Result<String>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut bytes = Vec::new();
        if let Some(mut reader) = pipe {
            reader.read_to_end(&mut bytes)?;
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    })
}

fn join_reader(label: &str, handle: JoinHandle<io::Result<String>>) -> Result<String, PluginError> {
    let outcome = handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("output reader panicked")));
    outcome.map_err(|err| PluginError::Io {
        target: label.to_owned(),
        source: Arc::new(err),
    })
}

/// Picks the diagnostic text reported for a failed run: stderr when the
/// process wrote any, stdout otherwise.
fn diagnostics(stdout: &str, stderr: &str) -> String {
    let errors = stderr.trim();
    if errors.is_empty() {
        stdout.trim().to_owned()
    } else {
        errors.to_owned()
    }
}
