//! CLI entrypoint for `webcli`.
//!
//! The binary delegates to [`webcli_cli::run`], which loads configuration,
//! installs telemetry, builds the operation broker from the configured
//! libraries and performs one boundary call.

use std::io::{self, StderrLock, StdinLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdin: StdinLock<'_> = io::stdin().lock();
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    webcli_cli::run(std::env::args_os(), &mut stdin, &mut stdout, &mut stderr)
}
