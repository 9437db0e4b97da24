//! The contract every library plugin implements, and how plugins are loaded.
//!
//! A library exposes an operation tree, describes nodes of that tree,
//! publishes a parameter schema per operation, and executes submitted
//! operations. Libraries are declared by name together with an opaque load
//! target (`module_path` + `class_name`); a [`LibraryLoader`] turns a
//! declaration into a live [`LibraryApi`] instance.

mod loader;


use serde::{Deserialize, Serialize};

use crate::error::PluginError;
use crate::operation::OperationFolder;
use crate::parameter::ParameterData;

pub use self::loader::{LibraryConstructor, LibraryLoader, LoadError, StaticLoader};

/// Capability interface implemented by every library plugin.
///
/// Branches passed to [`description`](Self::description) and
/// [`parameters`](Self::parameters) exclude the library name;
/// [`submit_operation`](Self::submit_operation) receives the full branch
/// including it. Implementations must be safe for concurrent use: the broker
/// never serialises calls, including submissions.
///
/// # Example
///
/// ```
/// use webcli_plugins::library::LibraryApi;
/// use webcli_plugins::operation::{Operation, OperationFolder, OperationType};
/// use webcli_plugins::parameter::{ParameterData, ParameterList};
/// use webcli_plugins::PluginError;
///
/// struct Echo;
///
/// impl LibraryApi for Echo {
///     fn operation_hierarchy(&self) -> OperationFolder {
///         OperationFolder::new("echo").with(Operation::new("say", OperationType::Module))
///     }
///
///     fn description(&self, _branch: &[String]) -> Result<String, PluginError> {
///         Ok(String::from("Prints its arguments."))
///     }
///
///     fn parameters(&self, _branch: &[String]) -> Result<ParameterData, PluginError> {
///         Ok(ParameterData::from(ParameterList::new("say")))
///     }
///
///     fn submit_operation(
///         &self,
///         _full_branch: &[String],
///         command: &[String],
///         _servers: &[String],
///     ) -> Result<serde_json::Value, PluginError> {
///         Ok(serde_json::json!({ "echo": command }))
///     }
/// }
/// ```
pub trait LibraryApi: Send + Sync {
    /// Returns the full operation tree, rooted at a folder named after the
    /// library.
    fn operation_hierarchy(&self) -> OperationFolder;

    /// Describes the node at `branch`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::PathNotFound`] when `branch` does not resolve.
    fn description(&self, branch: &[String]) -> Result<String, PluginError>;

    /// Returns the parameter schema of the operation at `branch`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::PathNotFound`] or
    /// [`PluginError::NotAnOperation`] when `branch` does not name an
    /// operation.
    fn parameters(&self, branch: &[String]) -> Result<ParameterData, PluginError>;

    /// Executes the operation at `full_branch` with the given command
    /// tokens against `servers`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidSubmission`] when the library rejects
    /// the command, or the failure reported by the execution collaborator.
    fn submit_operation(
        &self,
        full_branch: &[String],
        command: &[String],
        servers: &[String],
    ) -> Result<serde_json::Value, PluginError>;
}

/// A declared library: its public name and opaque load target.
///
/// # Example
///
/// ```
/// use webcli_plugins::library::LibraryDeclaration;
///
/// let declaration = LibraryDeclaration::new("net", "webcli_library_net", "NetLibrary")
///     .with_description("Network diagnostics");
/// assert_eq!(declaration.load_target(), "webcli_library_net.NetLibrary");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDeclaration {
    library_name: String,
    module_path: String,
    class_name: String,
    #[serde(default)]
    description: Option<String>,
}

impl LibraryDeclaration {
    /// Creates a declaration without a description.
    #[must_use]
    pub fn new(
        library_name: impl Into<String>,
        module_path: impl Into<String>,
        class_name: impl Into<String>,
    ) -> Self {
        Self {
            library_name: library_name.into(),
            module_path: module_path.into(),
            class_name: class_name.into(),
            description: None,
        }
    }

    /// Attaches a free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the public library name.
    #[must_use]
    pub const fn library_name(&self) -> &str {
        self.library_name.as_str()
    }

    /// Returns the module part of the load target.
    #[must_use]
    pub const fn module_path(&self) -> &str {
        self.module_path.as_str()
    }

    /// Returns the class part of the load target.
    #[must_use]
    pub const fn class_name(&self) -> &str {
        self.class_name.as_str()
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Renders the load target as `module_path.class_name`.
    #[must_use]
    pub fn load_target(&self) -> String {
        format!("{}.{}", self.module_path, self.class_name)
    }
}
