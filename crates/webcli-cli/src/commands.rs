//! Executes one subcommand against the broker.

use std::io::Read;

use serde::Serialize;
use webcli_plugins::OperationBroker;
use webcli_plugins::parameter::ParameterData;
use webcli_plugins::protocol::SubmissionRequest;

use crate::AppError;
use crate::cli::{Branch, CliCommand};

/// Runs `command` and returns the JSON value to print on success.
pub(crate) fn execute<R: Read>(
    broker: &OperationBroker,
    command: CliCommand,
    stdin: &mut R,
) -> Result<serde_json::Value, AppError> {
    match command {
        CliCommand::Hierarchy => to_json(&broker.operation_hierarchy()?),
        CliCommand::Describe { branch } => {
            Ok(serde_json::Value::String(broker.description(branch.segments())?))
        }
        CliCommand::Parameters { branch } => to_json(&broker.parameters(branch.segments())?),
        CliCommand::Command { branch } => to_json(&build_submission(broker, branch, stdin)?),
        CliCommand::Submit {
            branch,
            servers,
            command,
        } => Ok(broker.submit(branch.segments(), &command, &servers)?),
    }
}

/// Turns a filled-in schema read from `stdin` into a submission request for
/// the operation at `branch`. The command is the operation's module followed
/// by the selected arguments; servers are left for the caller to add.
fn build_submission<R: Read>(
    broker: &OperationBroker,
    branch: Branch,
    stdin: &mut R,
) -> Result<SubmissionRequest, AppError> {
    let operation = broker.operation(branch.segments())?;
    let module = operation
        .operation_module()
        .ok_or_else(|| AppError::MissingModule {
            branch: branch.to_string(),
        })?
        .to_owned();

    let mut raw = String::new();
    stdin.read_to_string(&mut raw).map_err(AppError::ReadSchema)?;
    let schema: ParameterData = serde_json::from_str(&raw).map_err(AppError::ParseSchema)?;
    schema
        .check_structure()
        .and_then(|()| schema.validate())
        .map_err(|source| AppError::IncompleteSchema {
            branch: branch.to_string(),
            source,
        })?;

    let mut command = vec![module];
    command.extend(schema.to_arguments());
    Ok(SubmissionRequest::new(branch.into_segments(), command))
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(value).map_err(AppError::SerialiseOutput)
}
