//! Instantiation of declared libraries.
//!
//! The registry never knows how a load target becomes a library; it asks a
//! [`LibraryLoader`]. [`StaticLoader`] is the compiled implementation: a
//! table of constructors keyed by `module_path` and `class_name`.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use super::{LibraryApi, LibraryDeclaration};

/// Errors raised while turning a declaration into a library instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// No constructor is known for the load target.
    #[error("no library class '{class_name}' in module '{module_path}'")]
    UnknownTarget {
        /// Declared module path.
        module_path: String,
        /// Declared class name.
        class_name: String,
    },

    /// The constructor ran but refused to build the library.
    #[error("library construction failed: {message}")]
    Construction {
        /// Reason reported by the constructor.
        message: String,
    },
}

/// Turns declarations into library instances.
pub trait LibraryLoader: Send + Sync {
    /// Instantiates the library behind `declaration`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the target is unknown or construction
    /// fails.
    fn instantiate(
        &self,
        declaration: &LibraryDeclaration,
    ) -> Result<Box<dyn LibraryApi>, LoadError>;
}

/// Constructor stored in a [`StaticLoader`].
pub type LibraryConstructor =
    Box<dyn Fn(&LibraryDeclaration) -> Result<Box<dyn LibraryApi>, LoadError> + Send + Sync>;

/// Loader backed by a compiled table of constructors.
///
/// # Example
///
/// ```
/// use webcli_plugins::library::{LibraryDeclaration, LibraryLoader, StaticLoader};
/// # use webcli_plugins::library::LibraryApi;
/// # use webcli_plugins::operation::OperationFolder;
/// # use webcli_plugins::parameter::{ParameterData, ParameterList};
/// # use webcli_plugins::PluginError;
/// # struct Echo;
/// # impl LibraryApi for Echo {
/// #     fn operation_hierarchy(&self) -> OperationFolder { OperationFolder::new("echo") }
/// #     fn description(&self, _: &[String]) -> Result<String, PluginError> { Ok(String::new()) }
/// #     fn parameters(&self, _: &[String]) -> Result<ParameterData, PluginError> {
/// #         Ok(ParameterData::from(ParameterList::new("echo")))
/// #     }
/// #     fn submit_operation(&self, _: &[String], _: &[String], _: &[String])
/// #         -> Result<serde_json::Value, PluginError> { Ok(serde_json::Value::Null) }
/// # }
///
/// let loader = StaticLoader::new().with_constructor("echo_lib", "Echo", |_| Ok(Box::new(Echo)));
/// let declaration = LibraryDeclaration::new("echo", "echo_lib", "Echo");
/// assert!(loader.instantiate(&declaration).is_ok());
///
/// let missing = LibraryDeclaration::new("other", "echo_lib", "Missing");
/// assert!(loader.instantiate(&missing).is_err());
/// ```
#[derive(Default)]
pub struct StaticLoader {
    constructors: HashMap<(String, String), LibraryConstructor>,
}

impl StaticLoader {
    /// Creates a loader with no constructors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructor for `module_path` + `class_name`, replacing
    /// any previous one.
    #[must_use]
    pub fn with_constructor<F>(mut self, module_path: &str, class_name: &str, constructor: F) -> Self
    where
        F: Fn(&LibraryDeclaration) -> Result<Box<dyn LibraryApi>, LoadError> + Send + Sync + 'static,
    {
        self.constructors.insert(
            (module_path.to_owned(), class_name.to_owned()),
            Box::new(constructor),
        );
        self
    }

    /// Returns the number of known load targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Returns `true` when no load targets are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl fmt::Debug for StaticLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut targets: Vec<String> = self
            .constructors
            .keys()
            .map(|(module, class)| format!("{module}.{class}"))
            .collect();
        targets.sort();
        f.debug_struct("StaticLoader")
            .field("targets", &targets)
            .finish()
    }
}

impl LibraryLoader for StaticLoader {
    fn instantiate(
        &self,
        declaration: &LibraryDeclaration,
    ) -> Result<Box<dyn LibraryApi>, LoadError> {
        let key = (
            declaration.module_path().to_owned(),
            declaration.class_name().to_owned(),
        );
        let constructor = self
            .constructors
            .get(&key)
            .ok_or_else(|| LoadError::UnknownTarget {
                module_path: key.0.clone(),
                class_name: key.1.clone(),
            })?;
        constructor(declaration)
    }
}
