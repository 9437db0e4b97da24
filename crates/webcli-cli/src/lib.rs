//! Command-line runtime for the `webcli` operation broker.
//!
//! The runtime splits configuration flags from the subcommand, loads the
//! layered configuration, installs telemetry, builds the broker over the
//! configured libraries and performs one boundary call. Success payloads are
//! printed to stdout as JSON. Failures are printed to stderr as a structured
//! `{ "kind", "category", "message" }` object and mapped to an exit code:
//! 2 for client-input errors, 3 for configuration and loading errors and 1
//! for everything else.

use std::ffi::OsString;
use std::io::{Read, Write};
use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod config;
mod errors;
mod libraries;
mod telemetry;

use cli::Cli;
use config::{ConfigLoader, OrthoConfigLoader, split_config_arguments};
pub(crate) use errors::AppError;

/// Tracing target for runtime events.
const CLI_TARGET: &str = "webcli_cli";

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, R: Read, W: Write, E: Write> {
    pub(crate) stdin: &'a mut R,
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, R: Read, W: Write, E: Write> IoStreams<'a, R, W, E> {
    pub(crate) const fn new(stdin: &'a mut R, stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
        }
    }
}

struct CliRunner<'a, 'io, R: Read, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'io, R, W, E>,
    loader: &'a L,
}

impl<'a, 'io, R, W, E, L> CliRunner<'a, 'io, R, W, E, L>
where
    R: Read,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    const fn new(io: &'a mut IoStreams<'io, R, W, E>, loader: &'a L) -> Self {
        Self { io, loader }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);

        let cli = match Cli::try_parse_from(&split.command_arguments) {
            Ok(cli) => cli,
            Err(error) if !error.use_stderr() => {
                // `--help` and `--version` render to stdout and succeed.
                drop(write!(self.io.stdout, "{error}"));
                return ExitCode::SUCCESS;
            }
            Err(error) => return self.report_usage(&AppError::CliUsage(error)),
        };

        let result = self
            .loader
            .load(&split.config_arguments)
            .and_then(|config| {
                telemetry::initialise(&config)?;
                libraries::build_broker(&config)
            })
            .and_then(|broker| commands::execute(&broker, cli.command, self.io.stdin))
            .and_then(|payload| self.emit(&payload));

        match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => self.report(&error),
        }
    }

    fn emit(&mut self, payload: &serde_json::Value) -> Result<(), AppError> {
        serde_json::to_writer_pretty(&mut *self.io.stdout, payload)
            .map_err(AppError::SerialiseOutput)?;
        self.io
            .stdout
            .write_all(b"\n")
            .map_err(AppError::WriteOutput)?;
        self.io.stdout.flush().map_err(AppError::WriteOutput)
    }

    fn report(&mut self, error: &AppError) -> ExitCode {
        tracing::debug!(
            target: CLI_TARGET,
            kind = error.kind(),
            error = %error,
            "command failed"
        );
        match serde_json::to_string(&error.to_response()) {
            Ok(line) => drop(writeln!(self.io.stderr, "{line}")),
            Err(_) => drop(writeln!(self.io.stderr, "{error}")),
        }
        error.exit_code()
    }

    fn report_usage(&mut self, error: &AppError) -> ExitCode {
        drop(write!(self.io.stderr, "{error}"));
        error.exit_code()
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, R, W, E>(args: I, stdin: &mut R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdin, stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
pub(crate) fn run_with_loader<I, R, W, E, L>(
    args: I,
    io: &mut IoStreams<'_, R, W, E>,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}

#[cfg(test)]
mod tests;
