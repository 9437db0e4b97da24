//! Process-wide registry of declared and loaded libraries.
//!
//! The [`LibraryRegistry`] records declarations eagerly but instantiates
//! nothing until the first lookup. Population happens exactly once, in
//! declaration order, behind a [`OnceCell`]: concurrent first callers block
//! on a single initialisation and every later caller reads the settled
//! outcome without locking.
//!
//! Initialisation is all-or-nothing. A library that fails to load aborts
//! population, the registry keeps no entries, and the failure is replayed to
//! every subsequent caller rather than retried.

use std::fmt;

use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::error::PluginError;
use crate::library::{LibraryApi, LibraryDeclaration, LibraryLoader};
use crate::operation::OperationFolder;

/// Tracing target for registry operations.
const REGISTRY_TARGET: &str = "webcli_plugins::registry";

/// A declared library together with its live instance.
pub struct RegisteredLibrary {
    declaration: LibraryDeclaration,
    library: Box<dyn LibraryApi>,
}

impl RegisteredLibrary {
    /// Returns the declaration the library was loaded from.
    #[must_use]
    pub const fn declaration(&self) -> &LibraryDeclaration {
        &self.declaration
    }

    /// Returns the library name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.declaration.library_name()
    }

    /// Borrows the library instance.
    #[must_use]
    pub fn library(&self) -> &dyn LibraryApi {
        self.library.as_ref()
    }
}

impl fmt::Debug for RegisteredLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredLibrary")
            .field("declaration", &self.declaration)
            .finish_non_exhaustive()
    }
}

/// Settled failure of a population attempt, replayed on every lookup.
#[derive(Debug, Clone)]
struct LoadFailureRecord {
    name: String,
    message: String,
}

impl LoadFailureRecord {
    fn to_error(&self) -> PluginError {
        PluginError::LoadFailure {
            name: self.name.clone(),
            message: self.message.clone(),
        }
    }
}

type LoadOutcome = Result<Vec<RegisteredLibrary>, LoadFailureRecord>;

/// Registry mapping library names to instantiated libraries.
///
/// # Example
///
/// ```
/// use webcli_plugins::library::{LibraryDeclaration, StaticLoader};
/// use webcli_plugins::LibraryRegistry;
///
/// let mut registry = LibraryRegistry::new(StaticLoader::new());
/// registry
///     .register(LibraryDeclaration::new("net", "webcli_library_net", "NetLibrary"))
///     .expect("first declaration is accepted");
/// assert!(!registry.is_loaded());
///
/// // Nothing can instantiate `net`, so population fails and is not retried.
/// assert!(registry.lookup("net").is_err());
/// assert!(registry.is_loaded());
/// ```
pub struct LibraryRegistry {
    declarations: Vec<LibraryDeclaration>,
    loader: Box<dyn LibraryLoader>,
    loaded: OnceCell<LoadOutcome>,
}

impl LibraryRegistry {
    /// Creates an empty registry that instantiates libraries through
    /// `loader`.
    #[must_use]
    pub fn new(loader: impl LibraryLoader + 'static) -> Self {
        Self {
            declarations: Vec::new(),
            loader: Box::new(loader),
            loaded: OnceCell::new(),
        }
    }

    /// Records a declaration without instantiating it.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Registry`] when the registry has already been
    /// populated, when the library name is blank, or when the name is already
    /// declared.
    pub fn register(&mut self, declaration: LibraryDeclaration) -> Result<(), PluginError> {
        let name = declaration.library_name();
        if self.is_loaded() {
            return Err(PluginError::Registry {
                message: format!("cannot declare '{name}' after the registry was loaded"),
            });
        }
        if name.trim().is_empty() {
            return Err(PluginError::Registry {
                message: String::from("library name must not be empty"),
            });
        }
        if self
            .declarations
            .iter()
            .any(|existing| existing.library_name() == name)
        {
            return Err(PluginError::Registry {
                message: format!("library '{name}' is already declared"),
            });
        }
        self.declarations.push(declaration);
        Ok(())
    }

    /// Records every declaration in order, stopping at the first rejection.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by [`register`](Self::register).
    pub fn register_all(
        &mut self,
        declarations: impl IntoIterator<Item = LibraryDeclaration>,
    ) -> Result<(), PluginError> {
        declarations
            .into_iter()
            .try_for_each(|declaration| self.register(declaration))
    }

    /// Returns the declarations in registration order.
    #[must_use]
    pub fn declarations(&self) -> &[LibraryDeclaration] {
        &self.declarations
    }

    /// Returns `true` once a population attempt has settled, successfully or
    /// not.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Instantiates every declared library on first use.
    ///
    /// Later calls return the settled outcome of the first attempt.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::LoadFailure`] naming the first library that
    /// could not be instantiated or whose hierarchy is malformed.
    pub fn ensure_loaded(&self) -> Result<&[RegisteredLibrary], PluginError> {
        match self.loaded.get_or_init(|| self.populate()) {
            Ok(libraries) => Ok(libraries),
            Err(failure) => Err(failure.to_error()),
        }
    }

    /// Looks up a loaded library by name, populating the registry first if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::LoadFailure`] when population failed or
    /// [`PluginError::UnknownLibrary`] when no library has that name.
    pub fn lookup(&self, name: &str) -> Result<&dyn LibraryApi, PluginError> {
        self.ensure_loaded()?
            .iter()
            .find(|entry| entry.name() == name)
            .map(RegisteredLibrary::library)
            .ok_or_else(|| PluginError::UnknownLibrary {
                name: name.to_owned(),
            })
    }

    /// Collects a fresh operation tree from every library, in declaration
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::LoadFailure`] when population failed.
    pub fn hierarchies(&self) -> Result<Vec<OperationFolder>, PluginError> {
        Ok(self
            .ensure_loaded()?
            .iter()
            .map(|entry| entry.library().operation_hierarchy())
            .collect())
    }

    fn populate(&self) -> LoadOutcome {
        info!(
            target: REGISTRY_TARGET,
            declared = self.declarations.len(),
            "loading libraries"
        );
        let mut loaded = Vec::with_capacity(self.declarations.len());
        for declaration in &self.declarations {
            match self.instantiate(declaration) {
                Ok(library) => loaded.push(RegisteredLibrary {
                    declaration: declaration.clone(),
                    library,
                }),
                Err(failure) => {
                    warn!(
                        target: REGISTRY_TARGET,
                        library = %failure.name,
                        load_target = %declaration.load_target(),
                        error = %failure.message,
                        "library failed to load; registry left empty"
                    );
                    return Err(failure);
                }
            }
        }
        info!(
            target: REGISTRY_TARGET,
            loaded = loaded.len(),
            "libraries loaded"
        );
        Ok(loaded)
    }

    fn instantiate(
        &self,
        declaration: &LibraryDeclaration,
    ) -> Result<Box<dyn LibraryApi>, LoadFailureRecord> {
        let name = declaration.library_name();
        let failure = |message: String| LoadFailureRecord {
            name: name.to_owned(),
            message,
        };
        let library = self
            .loader
            .instantiate(declaration)
            .map_err(|err| failure(err.to_string()))?;
        let hierarchy = library.operation_hierarchy();
        if hierarchy.name() != name {
            return Err(failure(format!(
                "hierarchy root is named '{}', expected '{name}'",
                hierarchy.name()
            )));
        }
        hierarchy
            .validate()
            .map_err(|err| failure(err.to_string()))?;
        Ok(library)
    }
}

impl fmt::Debug for LibraryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryRegistry")
            .field("declarations", &self.declarations)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}
