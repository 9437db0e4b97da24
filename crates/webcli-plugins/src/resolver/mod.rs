//! Branch resolution within a single operation tree.
//!
//! [`resolve`] walks a branch of child names from a library's root folder,
//! matching names exactly at each level. It records the folders it passes
//! through so callers can build breadcrumbs.


use thiserror::Error;

use crate::operation::{Operation, OperationFolder, OperationNode};

/// The node a branch resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedNode<'a> {
    /// The branch ended on a folder (including the root for an empty branch).
    Folder(&'a OperationFolder),
    /// The branch ended on an operation.
    Operation(&'a Operation),
}

impl<'a> ResolvedNode<'a> {
    /// Returns the name of the resolved node.
    #[must_use]
    pub const fn name(self) -> &'a str {
        match self {
            Self::Folder(folder) => folder.name(),
            Self::Operation(operation) => operation.name(),
        }
    }

    /// Returns the operation when the branch ended on a leaf.
    #[must_use]
    pub const fn as_operation(self) -> Option<&'a Operation> {
        match self {
            Self::Operation(operation) => Some(operation),
            Self::Folder(_) => None,
        }
    }
}

/// A successful resolution: the matched node and the folders above it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    node: ResolvedNode<'a>,
    ancestors: Vec<&'a OperationFolder>,
}

impl<'a> Resolution<'a> {
    /// Returns the matched node.
    #[must_use]
    pub const fn node(&self) -> ResolvedNode<'a> {
        self.node
    }

    /// Returns the folders traversed from the root, excluding the matched
    /// node itself.
    #[must_use]
    pub fn ancestors(&self) -> &[&'a OperationFolder] {
        &self.ancestors
    }

    /// Returns the names from the root down to the matched node.
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<&'a str> {
        self.ancestors
            .iter()
            .map(|folder| folder.name())
            .chain(std::iter::once(self.node.name()))
            .collect()
    }
}

/// Reasons a branch fails to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A folder has no child with the requested name.
    #[error("folder '{folder}' has no child named '{segment}'")]
    NoSuchChild {
        /// Folder that was searched.
        folder: String,
        /// Segment that matched nothing.
        segment: String,
    },

    /// Segments remain after reaching an operation.
    #[error("operation '{operation}' has no children; cannot resolve '{segment}'")]
    BeyondLeaf {
        /// Operation reached before the branch ended.
        operation: String,
        /// First segment that could not be consumed.
        segment: String,
    },
}

impl ResolveError {
    /// Returns the branch segment at which resolution stopped.
    #[must_use]
    pub const fn segment(&self) -> &str {
        match self {
            Self::NoSuchChild { segment, .. } | Self::BeyondLeaf { segment, .. } => {
                segment.as_str()
            }
        }
    }
}

/// Resolves `branch` below `root`.
///
/// An empty branch resolves to `root`.
///
/// # Errors
///
/// Returns [`ResolveError::NoSuchChild`] when a segment matches no sibling
/// and [`ResolveError::BeyondLeaf`] when segments remain after an operation.
///
/// # Example
///
/// ```
/// use webcli_plugins::operation::{Operation, OperationFolder, OperationType};
/// use webcli_plugins::resolver::resolve;
///
/// let tree = OperationFolder::new("demo").with(Operation::new("ping", OperationType::Module));
/// let branch = vec!["ping".to_owned()];
///
/// let resolution = resolve(&tree, &branch).expect("ping exists");
/// assert!(resolution.node().as_operation().is_some());
/// assert_eq!(resolution.breadcrumbs(), vec!["demo", "ping"]);
/// assert!(resolve(&tree, &["pong".to_owned()]).is_err());
/// ```
pub fn resolve<'a>(
    root: &'a OperationFolder,
    branch: &[String],
) -> Result<Resolution<'a>, ResolveError> {
    let mut ancestors = Vec::with_capacity(branch.len());
    let mut current = ResolvedNode::Folder(root);
    for segment in branch {
        let folder = match current {
            ResolvedNode::Folder(folder) => folder,
            ResolvedNode::Operation(operation) => {
                return Err(ResolveError::BeyondLeaf {
                    operation: operation.name().to_owned(),
                    segment: segment.clone(),
                });
            }
        };
        let child = folder
            .child(segment)
            .ok_or_else(|| ResolveError::NoSuchChild {
                folder: folder.name().to_owned(),
                segment: segment.clone(),
            })?;
        ancestors.push(folder);
        current = match child {
            OperationNode::Folder(next) => ResolvedNode::Folder(next),
            OperationNode::Operation(operation) => ResolvedNode::Operation(operation),
        };
    }
    Ok(Resolution {
        node: current,
        ancestors,
    })
}
