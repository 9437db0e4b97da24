//! Command-line argument definitions for `webcli`.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use clap::{Parser, Subcommand};

/// Command-line interface for the operation broker.
#[derive(Parser, Debug)]
#[command(name = "webcli", disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// The boundary call to perform.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Boundary calls exposed as subcommands.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Prints the operation tree of every configured library.
    Hierarchy,
    /// Prints the description of a folder or operation.
    Describe {
        /// Dotted branch, e.g. `net.dns`.
        branch: Branch,
    },
    /// Prints the parameter schema of an operation.
    Parameters {
        /// Dotted branch, e.g. `net.ping`.
        branch: Branch,
    },
    /// Reads a filled-in schema from stdin and prints a submission request.
    Command {
        /// Dotted branch of the operation the schema belongs to.
        branch: Branch,
    },
    /// Runs an operation against the given servers.
    Submit {
        /// Dotted branch of the operation.
        branch: Branch,
        /// Server to run against; repeat for several, in order.
        #[arg(long = "server", value_name = "HOST")]
        servers: Vec<String>,
        /// Command tokens, starting with the program.
        #[arg(
            value_name = "TOKEN",
            num_args = 0..,
            last = true,
            allow_hyphen_values = true
        )]
        command: Vec<String>,
    },
}

/// An operation branch written as dotted segments.
///
/// The empty string parses to an empty branch so the broker can report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Branch(Vec<String>);

impl Branch {
    pub(crate) fn segments(&self) -> &[String] {
        &self.0
    }

    pub(crate) fn into_segments(self) -> Vec<String> {
        self.0
    }
}

impl FromStr for Branch {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.is_empty() {
            return Ok(Self(Vec::new()));
        }
        Ok(Self(raw.split('.').map(str::to_owned).collect()))
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}
