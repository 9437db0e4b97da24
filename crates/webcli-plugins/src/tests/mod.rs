//! Crate-level test doubles and BDD tests.

use std::sync::Mutex;

use mockall::mock;

use crate::broker::OperationBroker;
use crate::error::PluginError;
use crate::execution::{CommandExecutor, ExecutionReport, TargetRun};
use crate::library::{LibraryApi, LibraryDeclaration, LibraryLoader, LoadError};
use crate::operation::{Operation, OperationFolder, OperationType};
use crate::parameter::{ParameterBase, ParameterData, ParameterList, StringValue};
use crate::registry::LibraryRegistry;
use crate::resolver::{ResolvedNode, resolve};


mock! {
    pub Library {}
    impl LibraryApi for Library {
        fn operation_hierarchy(&self) -> OperationFolder;
        fn description(&self, branch: &[String]) -> Result<String, PluginError>;
        fn parameters(&self, branch: &[String]) -> Result<ParameterData, PluginError>;
        fn submit_operation(
            &self,
            full_branch: &[String],
            command: &[String],
            servers: &[String],
        ) -> Result<serde_json::Value, PluginError>;
    }
}

mock! {
    pub Executor {}
    impl CommandExecutor for Executor {
        fn execute(
            &self,
            arguments: &[String],
            servers: &[String],
        ) -> Result<ExecutionReport, PluginError>;
    }
}

/// `demo` tree: a `ping` operation and a `tools` folder holding `trace`.
pub(crate) fn demo_tree() -> OperationFolder {
    OperationFolder::new("demo")
        .with(Operation::new("ping", OperationType::Module).with_module("ping"))
        .with(OperationFolder::new("tools").with(Operation::new("trace", OperationType::Pipx)))
}

/// Schema of `demo.ping`: one mandatory `target` text field.
pub(crate) fn ping_schema() -> ParameterData {
    ParameterData::from(
        ParameterList::new("ping")
            .with(StringValue::from_base(ParameterBase::new("target").mandatory())),
    )
}

/// Successful single-target report.
pub(crate) fn report_for(target: &str, stdout: &str) -> ExecutionReport {
    ExecutionReport::new(vec![TargetRun {
        target: Some(target.to_owned()),
        status: 0,
        stdout: stdout.to_owned(),
        stderr: String::new(),
    }])
}

/// Hands out pre-built libraries by declared name, each at most once.
pub(crate) struct PreparedLoader {
    libraries: Mutex<Vec<(String, Box<dyn LibraryApi>)>>,
}

impl PreparedLoader {
    pub(crate) fn new(libraries: Vec<(String, Box<dyn LibraryApi>)>) -> Self {
        Self {
            libraries: Mutex::new(libraries),
        }
    }
}

impl LibraryLoader for PreparedLoader {
    fn instantiate(
        &self,
        declaration: &LibraryDeclaration,
    ) -> Result<Box<dyn LibraryApi>, LoadError> {
        let mut libraries = self.libraries.lock().expect("loader lock");
        let position = libraries
            .iter()
            .position(|(name, _)| name == declaration.library_name())
            .ok_or_else(|| LoadError::UnknownTarget {
                module_path: declaration.module_path().to_owned(),
                class_name: declaration.class_name().to_owned(),
            })?;
        Ok(libraries.remove(position).1)
    }
}

/// Erases a library's concrete type.
pub(crate) fn boxed(library: impl LibraryApi + 'static) -> Box<dyn LibraryApi> {
    Box::new(library)
}

/// Builds a broker whose registry declares `libraries` in order.
pub(crate) fn broker_with(libraries: Vec<(&str, Box<dyn LibraryApi>)>) -> OperationBroker {
    let declarations: Vec<LibraryDeclaration> = libraries
        .iter()
        .map(|(name, _)| LibraryDeclaration::new(*name, "tests", *name))
        .collect();
    let prepared = libraries
        .into_iter()
        .map(|(name, library)| (name.to_owned(), library))
        .collect();
    let mut registry = LibraryRegistry::new(PreparedLoader::new(prepared));
    registry.register_all(declarations).expect("declare libraries");
    OperationBroker::new(registry)
}

/// A mock library serving [`demo_tree`] for any number of calls.
pub(crate) fn mock_demo() -> MockLibrary {
    let mut library = MockLibrary::new();
    library.expect_operation_hierarchy().returning(demo_tree);
    library
}

/// The `demo` library: delegates submissions to a command executor.
pub(crate) struct DemoLibrary<E> {
    executor: E,
}

impl<E> DemoLibrary<E> {
    pub(crate) const fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E: CommandExecutor> LibraryApi for DemoLibrary<E> {
    fn operation_hierarchy(&self) -> OperationFolder {
        demo_tree()
    }

    fn description(&self, branch: &[String]) -> Result<String, PluginError> {
        let tree = demo_tree();
        let resolution = resolve(&tree, branch).map_err(|err| PluginError::PathNotFound {
            library: "demo".into(),
            branch: branch.join("."),
            segment: err.segment().to_owned(),
        })?;
        Ok(match resolution.node() {
            ResolvedNode::Folder(folder) => format!("Folder {}", folder.name()),
            ResolvedNode::Operation(operation) => format!("Runs {}", operation.name()),
        })
    }

    fn parameters(&self, _branch: &[String]) -> Result<ParameterData, PluginError> {
        Ok(ping_schema())
    }

    fn submit_operation(
        &self,
        _full_branch: &[String],
        command: &[String],
        servers: &[String],
    ) -> Result<serde_json::Value, PluginError> {
        let report = self.executor.execute(command, servers)?;
        serde_json::to_value(report).map_err(PluginError::SerializePayload)
    }
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

#[test]
fn end_to_end_submission_reaches_the_executor() {
    let mut executor = MockExecutor::new();
    executor
        .expect_execute()
        .withf(|arguments: &[String], servers: &[String]| {
            arguments == ["ping", "-c", "1"] && servers == ["localhost"]
        })
        .once()
        .returning(|_, _| Ok(report_for("localhost", "pong\n")));
    let broker = broker_with(vec![("demo", boxed(DemoLibrary::new(executor)))]);

    let payload = broker
        .submit(
            &strings(&["demo", "ping"]),
            &strings(&["ping", "-c", "1"]),
            &strings(&["localhost"]),
        )
        .expect("submission succeeds");
    assert_eq!(payload["runs"][0]["stdout"], "pong\n");
}
