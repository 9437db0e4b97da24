//! The `net` operation library.
//!
//! `net` groups network diagnostics (`ping`, `dns.lookup`, `dns.trace` and
//! `http.check`) behind the [`LibraryApi`] contract. Its tree, descriptions
//! and parameter schemas are static. Submissions are checked against the
//! addressed operation and then handed to a [`CommandExecutor`], which runs
//! the command once per server; the resulting [`ExecutionReport`] is the
//! success payload.
//!
//! [`ExecutionReport`]: webcli_plugins::ExecutionReport

mod catalogue;

#[cfg(test)]
mod tests;

use tracing::debug;
use webcli_plugins::library::{LibraryApi, LoadError, StaticLoader};
use webcli_plugins::operation::OperationFolder;
use webcli_plugins::parameter::ParameterData;
use webcli_plugins::resolver::{ResolvedNode, resolve};
use webcli_plugins::{CommandExecutor, LibraryDeclaration, PluginError};

pub use catalogue::LIBRARY_NAME;

/// Module half of the loader key this library registers under.
pub const MODULE_PATH: &str = "webcli_library_net";

/// Class half of the loader key this library registers under.
pub const CLASS_NAME: &str = "NetLibrary";

/// Tracing target for submissions handled by this library.
const NET_TARGET: &str = "webcli_library_net";

/// Network diagnostics library running its commands through `E`.
#[derive(Debug, Clone)]
pub struct NetLibrary<E> {
    executor: E,
}

impl<E> NetLibrary<E> {
    /// Creates the library over `executor`.
    #[must_use]
    pub const fn new(executor: E) -> Self {
        Self { executor }
    }
}

/// Adds the `net` constructor to `loader`.
///
/// Every instance built by the loader gets its own clone of `executor`.
///
/// # Example
///
/// ```
/// use webcli_library_net::{CLASS_NAME, MODULE_PATH, register};
/// use webcli_plugins::process::ProcessExecutor;
/// use webcli_plugins::{LibraryDeclaration, LibraryRegistry, OperationBroker, StaticLoader};
///
/// let loader = register(StaticLoader::new(), ProcessExecutor::new());
/// let mut registry = LibraryRegistry::new(loader);
/// registry
///     .register(LibraryDeclaration::new("net", MODULE_PATH, CLASS_NAME))
///     .expect("declared");
/// let broker = OperationBroker::new(registry);
///
/// let forest = broker.operation_hierarchy().expect("loaded");
/// assert_eq!(forest.first().map(|tree| tree.name()), Some("net"));
/// ```
#[must_use]
pub fn register<E>(loader: StaticLoader, executor: E) -> StaticLoader
where
    E: CommandExecutor + Clone + 'static,
{
    loader.with_constructor(MODULE_PATH, CLASS_NAME, move |declaration| {
        construct(declaration, executor.clone())
    })
}

fn construct<E>(
    declaration: &LibraryDeclaration,
    executor: E,
) -> Result<Box<dyn LibraryApi>, LoadError>
where
    E: CommandExecutor + 'static,
{
    if declaration.library_name() != LIBRARY_NAME {
        return Err(LoadError::Construction {
            message: format!(
                "{MODULE_PATH}.{CLASS_NAME} serves library '{LIBRARY_NAME}', not '{}'",
                declaration.library_name()
            ),
        });
    }
    Ok(Box::new(NetLibrary::new(executor)))
}

impl<E: CommandExecutor> LibraryApi for NetLibrary<E> {
    fn operation_hierarchy(&self) -> OperationFolder {
        catalogue::tree()
    }

    fn description(&self, branch: &[String]) -> Result<String, PluginError> {
        let path = branch.join(".");
        catalogue::describe(&path)
            .map(str::to_owned)
            .ok_or_else(|| path_not_found(branch))
    }

    fn parameters(&self, branch: &[String]) -> Result<ParameterData, PluginError> {
        let path = branch.join(".");
        catalogue::schema(&path).ok_or_else(|| {
            if catalogue::describe(&path).is_some() {
                PluginError::NotAnOperation {
                    library: LIBRARY_NAME.to_owned(),
                    branch: path,
                }
            } else {
                path_not_found(branch)
            }
        })
    }

    fn submit_operation(
        &self,
        full_branch: &[String],
        command: &[String],
        servers: &[String],
    ) -> Result<serde_json::Value, PluginError> {
        let path = match full_branch.split_first() {
            Some((root, path)) if root == LIBRARY_NAME => path,
            _ => {
                return Err(PluginError::UnknownLibrary {
                    name: full_branch.first().cloned().unwrap_or_default(),
                });
            }
        };
        check_command(path, command)?;

        debug!(
            target: NET_TARGET,
            branch = %path.join("."),
            program = command.first().map_or("", String::as_str),
            servers = servers.len(),
            "running net operation"
        );
        let report = self.executor.execute(command, servers)?;
        serde_json::to_value(report).map_err(PluginError::SerializePayload)
    }
}

/// Confirms `command` may run for the operation at `path`: the path must
/// name an operation, and the program must be that operation's module.
fn check_command(path: &[String], command: &[String]) -> Result<(), PluginError> {
    let tree = catalogue::tree();
    let resolution = resolve(&tree, path).map_err(|_| path_not_found(path))?;
    let ResolvedNode::Operation(operation) = resolution.node() else {
        return Err(PluginError::NotAnOperation {
            library: LIBRARY_NAME.to_owned(),
            branch: path.join("."),
        });
    };
    let Some(program) = command.first() else {
        return Err(invalid_submission("command is empty"));
    };
    match operation.operation_module() {
        Some(module) if module != program.as_str() => Err(invalid_submission(&format!(
            "'{}' runs '{module}', not '{program}'",
            operation.name()
        ))),
        _ => Ok(()),
    }
}

fn invalid_submission(message: &str) -> PluginError {
    PluginError::InvalidSubmission {
        library: LIBRARY_NAME.to_owned(),
        message: message.to_owned(),
    }
}

fn path_not_found(branch: &[String]) -> PluginError {
    let tree = catalogue::tree();
    let segment = resolve(&tree, branch)
        .err()
        .map_or_else(|| branch.join("."), |err| err.segment().to_owned());
    PluginError::PathNotFound {
        library: LIBRARY_NAME.to_owned(),
        branch: branch.join("."),
        segment,
    }
}
