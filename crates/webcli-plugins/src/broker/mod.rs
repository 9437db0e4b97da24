//! Routing of discovery, description, parameter, and submission calls.
//!
//! The [`OperationBroker`] is the public-facing API that callers use. It
//! splits a branch into its library name and the path below the library's
//! root, looks the library up in the [`LibraryRegistry`], checks that the
//! path resolves in the library's current tree, and only then delegates to
//! the library. Submissions are forwarded once; failures are never retried.


use tracing::{debug, warn};

use crate::error::PluginError;
use crate::library::LibraryApi;
use crate::operation::{Operation, OperationFolder};
use crate::parameter::ParameterData;
use crate::registry::LibraryRegistry;
use crate::resolver::resolve;

/// Tracing target for routing operations.
const BROKER_TARGET: &str = "webcli_plugins::broker";

/// A branch split and checked against its library's tree.
struct Route<'r, 'b> {
    library: &'r dyn LibraryApi,
    name: &'b str,
    path: &'b [String],
    operation: Option<Operation>,
}

impl Route<'_, '_> {
    fn require_operation(&self) -> Result<&Operation, PluginError> {
        self.operation
            .as_ref()
            .ok_or_else(|| PluginError::NotAnOperation {
                library: self.name.to_owned(),
                branch: self.path.join("."),
            })
    }
}

/// Routes boundary calls to registered libraries.
///
/// # Example
///
/// ```
/// use webcli_plugins::library::StaticLoader;
/// use webcli_plugins::{LibraryRegistry, OperationBroker, PluginError};
///
/// let broker = OperationBroker::new(LibraryRegistry::new(StaticLoader::new()));
/// assert!(broker.operation_hierarchy().expect("empty forest").is_empty());
///
/// let err = broker.description(&["nope".to_owned()]).expect_err("unknown library");
/// assert!(matches!(err, PluginError::UnknownLibrary { .. }));
/// ```
#[derive(Debug)]
pub struct OperationBroker {
    registry: LibraryRegistry,
}

impl OperationBroker {
    /// Creates a broker over `registry`.
    #[must_use]
    pub const fn new(registry: LibraryRegistry) -> Self {
        Self { registry }
    }

    /// Returns the underlying registry.
    #[must_use]
    pub const fn registry(&self) -> &LibraryRegistry {
        &self.registry
    }

    /// Returns one operation tree per library, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::LoadFailure`] when the registry cannot be
    /// populated.
    pub fn operation_hierarchy(&self) -> Result<Vec<OperationFolder>, PluginError> {
        self.registry
            .hierarchies()
            .inspect_err(|err| log_failure("hierarchy", &[], err))
    }

    /// Describes the folder or operation at `branch`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::EmptyBranch`], [`PluginError::UnknownLibrary`]
    /// or [`PluginError::PathNotFound`] for unroutable branches, or the
    /// library's own failure.
    pub fn description(&self, branch: &[String]) -> Result<String, PluginError> {
        self.route(branch)
            .and_then(|route| route.library.description(route.path))
            .inspect_err(|err| log_failure("description", branch, err))
    }

    /// Returns the parameter schema of the operation at `branch`.
    ///
    /// # Errors
    ///
    /// Returns the routing errors of [`description`](Self::description),
    /// [`PluginError::NotAnOperation`] when `branch` names a folder, or
    /// [`PluginError::InvalidSchema`] when the library's schema has blank or
    /// duplicate sibling names.
    pub fn parameters(&self, branch: &[String]) -> Result<ParameterData, PluginError> {
        self.route(branch)
            .and_then(|route| {
                route.require_operation()?;
                let schema = route.library.parameters(route.path)?;
                schema
                    .check_structure()
                    .map_err(|err| PluginError::InvalidSchema {
                        library: route.name.to_owned(),
                        branch: route.path.join("."),
                        message: err.to_string(),
                    })?;
                Ok(schema)
            })
            .inspect_err(|err| log_failure("parameters", branch, err))
    }

    /// Returns the operation at `branch`.
    ///
    /// # Errors
    ///
    /// Returns the routing errors of [`description`](Self::description) or
    /// [`PluginError::NotAnOperation`] when `branch` names a folder.
    pub fn operation(&self, branch: &[String]) -> Result<Operation, PluginError> {
        self.route(branch)
            .and_then(|route| route.require_operation().cloned())
            .inspect_err(|err| log_failure("operation", branch, err))
    }

    /// Submits `command` for execution against `servers` by the library
    /// owning `branch`.
    ///
    /// The library receives the full branch, including its own name. The
    /// payload it returns is passed back unchanged.
    ///
    /// # Errors
    ///
    /// Returns the routing errors of [`operation`](Self::operation), or
    /// whatever the library or its execution collaborator reports.
    pub fn submit(
        &self,
        branch: &[String],
        command: &[String],
        servers: &[String],
    ) -> Result<serde_json::Value, PluginError> {
        self.route(branch)
            .and_then(|route| {
                route.require_operation()?;
                debug!(
                    target: BROKER_TARGET,
                    library = route.name,
                    branch = %route.path.join("."),
                    argc = command.len(),
                    servers = servers.len(),
                    "submitting operation"
                );
                route.library.submit_operation(branch, command, servers)
            })
            .inspect_err(|err| log_failure("submit", branch, err))
    }

    fn route<'b>(&self, branch: &'b [String]) -> Result<Route<'_, 'b>, PluginError> {
        let (name, path) = branch.split_first().ok_or(PluginError::EmptyBranch)?;
        let library = self.registry.lookup(name)?;
        let tree = library.operation_hierarchy();
        let resolution = resolve(&tree, path).map_err(|err| PluginError::PathNotFound {
            library: name.clone(),
            branch: path.join("."),
            segment: err.segment().to_owned(),
        })?;
        let operation = resolution.node().as_operation().cloned();
        Ok(Route {
            library,
            name,
            path,
            operation,
        })
    }
}

/// Logs a failed call. Client-input errors are expected traffic and stay at
/// debug level.
fn log_failure(call: &'static str, branch: &[String], err: &PluginError) {
    if err.is_client_error() {
        debug!(
            target: BROKER_TARGET,
            call,
            branch = %branch.join("."),
            kind = err.kind(),
            error = %err,
            "rejected request"
        );
    } else {
        warn!(
            target: BROKER_TARGET,
            call,
            branch = %branch.join("."),
            kind = err.kind(),
            error = %err,
            "operation failed"
        );
    }
}
