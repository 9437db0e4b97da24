//! Library declarations read from the configuration file.
//!
//! Declarations are ordered: the registry instantiates libraries, and the
//! discovery call lists their trees, in the order written here.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One configured library.
///
/// ```toml
/// [[libraries]]
/// library_name = "net"
/// module_path = "webcli_library_net"
/// class_name = "NetLibrary"
/// description = "Network diagnostics"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LibraryDeclaration {
    /// Name of the library; the first segment of every branch it owns.
    pub library_name: String,
    /// Module half of the key the loader resolves.
    pub module_path: String,
    /// Class half of the key the loader resolves.
    pub class_name: String,
    /// Optional human-readable summary.
    #[serde(default)]
    pub description: Option<String>,
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

    /// Attaches a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Integrity violations in the configured declaration list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// A required field was blank.
    #[error("library declaration #{position} has an empty {field}")]
    EmptyField {
        /// One-based position in the declaration list.
        position: usize,
        /// Name of the blank field.
        field: &'static str,
    },
    /// Two declarations share a library name.
    #[error("library '{name}' is declared more than once")]
    DuplicateName {
        /// The repeated library name.
        name: String,
    },
    /// Two declarations resolve to the same loader key.
    #[error("libraries '{first}' and '{second}' both load {module_path}.{class_name}")]
    DuplicateTarget {
        /// Module half of the repeated key.
        module_path: String,
        /// Class half of the repeated key.
        class_name: String,
        /// Library declared first.
        first: String,
        /// Library repeating the key.
        second: String,
    },
}

/// Checks `declarations` for blank fields and repeated names or targets.
///
/// # Errors
///
/// Returns the first violation found, scanning in declaration order.
pub fn validate_declarations(declarations: &[LibraryDeclaration]) -> Result<(), DeclarationError> {
    let mut names: HashSet<&str> = HashSet::new();
    let mut targets: HashMap<(&str, &str), &str> = HashMap::new();

    for (index, declaration) in declarations.iter().enumerate() {
        check_fields(index + 1, declaration)?;

        let name = declaration.library_name.as_str();
        if !names.insert(name) {
            return Err(DeclarationError::DuplicateName {
                name: name.to_owned(),
            });
        }

        let key = (
            declaration.module_path.as_str(),
            declaration.class_name.as_str(),
        );
        if let Some(first) = targets.insert(key, name) {
            return Err(DeclarationError::DuplicateTarget {
                module_path: declaration.module_path.clone(),
                class_name: declaration.class_name.clone(),
                first: first.to_owned(),
                second: name.to_owned(),
            });
        }
    }
    Ok(())
}

fn check_fields(position: usize, declaration: &LibraryDeclaration) -> Result<(), DeclarationError> {
    let fields = [
        ("library_name", &declaration.library_name),
        ("module_path", &declaration.module_path),
        ("class_name", &declaration.class_name),
    ];
    fields
        .iter()
        .find(|(_, value)| value.trim().is_empty())
        .map_or(Ok(()), |&(field, _)| {
            Err(DeclarationError::EmptyField {
                position,
                field,
            })
        })
}
