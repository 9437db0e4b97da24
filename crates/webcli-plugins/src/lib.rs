//! Library plugin registry and operation resolution engine for `webcli`.
//!
//! Independently developed *libraries* expose command-line functionality as a
//! discoverable tree of operations. Each operation publishes a recursive
//! parameter schema that callers introspect, fill in, and submit for
//! execution. This crate holds the contract every library implements and the
//! machinery that routes calls to libraries:
//!
//! - [`parameter`] and [`operation`] model parameter schemas and operation
//!   trees, with the wire format shared by every boundary.
//! - [`library`] defines the [`LibraryApi`] contract and the loader that
//!   instantiates declared libraries.
//! - [`registry`] populates libraries lazily, exactly once, in declaration
//!   order.
//! - [`resolver`] walks a branch through an operation tree.
//! - [`broker`] routes discovery, description, parameter, and submission
//!   calls.
//! - [`execution`] and [`process`] hand finished commands to an external
//!   executor.
//!
//! # Example
//!
//! ```
//! use webcli_plugins::library::{LibraryApi, LibraryDeclaration, StaticLoader};
//! use webcli_plugins::operation::{Operation, OperationFolder, OperationType};
//! use webcli_plugins::parameter::{ParameterData, ParameterList};
//! use webcli_plugins::{LibraryRegistry, OperationBroker, PluginError};
//!
//! struct Demo;
//!
//! impl LibraryApi for Demo {
//!     fn operation_hierarchy(&self) -> OperationFolder {
//!         OperationFolder::new("demo").with(Operation::new("ping", OperationType::Module))
//!     }
//!
//!     fn description(&self, _branch: &[String]) -> Result<String, PluginError> {
//!         Ok(String::from("Demo operations"))
//!     }
//!
//!     fn parameters(&self, _branch: &[String]) -> Result<ParameterData, PluginError> {
//!         Ok(ParameterData::from(ParameterList::new("ping")))
//!     }
//!
//!     fn submit_operation(
//!         &self,
//!         _full_branch: &[String],
//!         _command: &[String],
//!         _servers: &[String],
//!     ) -> Result<serde_json::Value, PluginError> {
//!         Ok(serde_json::Value::Null)
//!     }
//! }
//!
//! let loader = StaticLoader::new().with_constructor("demo", "Demo", |_| Ok(Box::new(Demo)));
//! let mut registry = LibraryRegistry::new(loader);
//! registry
//!     .register(LibraryDeclaration::new("demo", "demo", "Demo"))
//!     .expect("declaration accepted");
//!
//! let broker = OperationBroker::new(registry);
//! let branch = vec!["demo".to_owned(), "ping".to_owned()];
//! assert!(broker.parameters(&branch).is_ok());
//! let missing = vec!["demo".to_owned(), "pong".to_owned()];
//! assert!(broker.description(&missing).is_err());
//! ```

pub mod broker;
pub mod error;
pub mod execution;
pub mod library;
pub mod operation;
pub mod parameter;
pub mod process;
pub mod protocol;
pub mod registry;
pub mod resolver;

#[cfg(test)]
mod tests;

pub use self::broker::OperationBroker;
pub use self::error::{ErrorCategory, PluginError};
pub use self::execution::{CommandExecutor, ExecutionReport, TargetRun};
pub use self::library::{LibraryApi, LibraryDeclaration, LibraryLoader, StaticLoader};
pub use self::registry::{LibraryRegistry, RegisteredLibrary};
