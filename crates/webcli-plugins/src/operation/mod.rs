//! Operation hierarchy types.
//!
//! A library exposes its functionality as a tree rooted at an
//! [`OperationFolder`] named after the library. Folders group child nodes in
//! their *portfolio*; [`Operation`] leaves are bound to an execution target.
//!
//! The serialised form keeps the field names of the declaration format. A
//! node is a folder exactly when it carries a `portfolio`:
//!
//! ```json
//! { "name": "net", "portfolio": [
//!     { "name": "ping", "operation_type": "module", "operation_module": "ping" }
//! ] }
//! ```


use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the functionality behind an operation is packaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    /// A module or executable invoked directly.
    Module,
    /// A tool installed and run through `pipx`.
    Pipx,
}

impl OperationType {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Pipx => "pipx",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural problems in an operation tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationTreeError {
    /// A node has an empty name.
    #[error("node under '{folder}' has an empty name")]
    EmptyName {
        /// Dotted path of the parent folder.
        folder: String,
    },

    /// Two siblings share a name, making lookups ambiguous.
    #[error("folder '{folder}' contains more than one node named '{name}'")]
    DuplicateName {
        /// Dotted path of the parent folder.
        folder: String,
        /// Duplicated name.
        name: String,
    },
}

/// An executable leaf of the hierarchy.
///
/// # Example
///
/// ```
/// use webcli_plugins::operation::{Operation, OperationType};
///
/// let ping = Operation::new("ping", OperationType::Module).with_module("ping");
/// assert_eq!(ping.name(), "ping");
/// assert_eq!(ping.operation_module(), Some("ping"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    name: String,
    operation_type: OperationType,
    #[serde(default)]
    operation_module: Option<String>,
}

impl Operation {
    /// Creates an operation with no module target.
    #[must_use]
    pub fn new(name: impl Into<String>, operation_type: OperationType) -> Self {
        Self {
            name: name.into(),
            operation_type,
            operation_module: None,
        }
    }

    /// Binds the operation to a concrete module or executable.
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.operation_module = Some(module.into());
        self
    }

    /// Returns the operation name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the packaging kind.
    #[must_use]
    pub const fn operation_type(&self) -> OperationType {
        self.operation_type
    }

    /// Returns the module or executable target, if any.
    #[must_use]
    pub fn operation_module(&self) -> Option<&str> {
        self.operation_module.as_deref()
    }
}

/// A named grouping of child operations and folders.
///
/// # Example
///
/// ```
/// use webcli_plugins::operation::{Operation, OperationFolder, OperationType};
///
/// let tree = OperationFolder::new("net")
///     .with(Operation::new("ping", OperationType::Module))
///     .with(OperationFolder::new("dns").with(Operation::new("lookup", OperationType::Module)));
///
/// assert_eq!(tree.portfolio().len(), 2);
/// assert!(tree.child("dns").is_some());
/// assert_eq!(tree.depth(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationFolder {
    name: String,
    portfolio: Vec<OperationNode>,
}

impl OperationFolder {
    /// Creates an empty folder.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            portfolio: Vec::new(),
        }
    }

    /// Appends a child node.
    #[must_use]
    pub fn with(mut self, node: impl Into<OperationNode>) -> Self {
        self.portfolio.push(node.into());
        self
    }

    /// Returns the folder name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the children in order.
    #[must_use]
    pub fn portfolio(&self) -> &[OperationNode] {
        &self.portfolio
    }

    /// Finds the first direct child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&OperationNode> {
        self.portfolio.iter().find(|node| node.name() == name)
    }

    /// Returns the number of edges on the longest path to a leaf.
    ///
    /// An empty folder has depth zero.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.portfolio
            .iter()
            .map(|node| match node {
                OperationNode::Operation(_) => 1,
                OperationNode::Folder(folder) => folder.depth() + 1,
            })
            .max()
            .unwrap_or(0)
    }

    /// Lists the branch below this folder of every operation, in tree order.
    #[must_use]
    pub fn operation_branches(&self) -> Vec<Vec<String>> {
        let mut branches = Vec::new();
        collect_branches(self, &mut Vec::new(), &mut branches);
        branches
    }

    /// Checks that every node is named and sibling names are unique.
    ///
    /// # Errors
    ///
    /// Returns the first [`OperationTreeError`] found in depth-first order.
    pub fn validate(&self) -> Result<(), OperationTreeError> {
        validate_folder(self, &self.name)
    }
}

fn collect_branches(
    folder: &OperationFolder,
    prefix: &mut Vec<String>,
    branches: &mut Vec<Vec<String>>,
) {
    for node in &folder.portfolio {
        prefix.push(node.name().to_owned());
        match node {
            OperationNode::Operation(_) => branches.push(prefix.clone()),
            OperationNode::Folder(child) => collect_branches(child, prefix, branches),
        }
        prefix.pop();
    }
}

fn validate_folder(folder: &OperationFolder, label: &str) -> Result<(), OperationTreeError> {
    let mut seen = HashSet::new();
    for node in &folder.portfolio {
        let name = node.name();
        if name.trim().is_empty() {
            return Err(OperationTreeError::EmptyName {
                folder: label.to_owned(),
            });
        }
        if !seen.insert(name) {
            return Err(OperationTreeError::DuplicateName {
                folder: label.to_owned(),
                name: name.to_owned(),
            });
        }
        if let OperationNode::Folder(child) = node {
            validate_folder(child, &format!("{label}.{name}"))?;
        }
    }
    Ok(())
}

/// A node of the hierarchy: a folder or an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperationNode {
    /// A grouping node. Listed first so the `portfolio` field decides the
    /// variant when deserialising.
    Folder(OperationFolder),
    /// An executable leaf.
    Operation(Operation),
}

impl OperationNode {
    /// Returns the node name.
    #[must_use]
    pub const fn name(&self) -> &str {
        match self {
            Self::Folder(folder) => folder.name(),
            Self::Operation(operation) => operation.name(),
        }
    }

    /// Returns the operation when this node is a leaf.
    #[must_use]
    pub const fn as_operation(&self) -> Option<&Operation> {
        match self {
            Self::Operation(operation) => Some(operation),
            Self::Folder(_) => None,
        }
    }

    /// Returns the folder when this node groups children.
    #[must_use]
    pub const fn as_folder(&self) -> Option<&OperationFolder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::Operation(_) => None,
        }
    }
}

impl From<Operation> for OperationNode {
    fn from(value: Operation) -> Self {
        Self::Operation(value)
    }
}

impl From<OperationFolder> for OperationNode {
    fn from(value: OperationFolder) -> Self {
        Self::Folder(value)
    }
}
