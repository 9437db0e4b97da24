//! Behaviour-driven tests for submissions routed to the `net` library.

use std::sync::{Arc, Mutex};

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use webcli_plugins::{
    CommandExecutor, ExecutionReport, LibraryDeclaration, LibraryRegistry, OperationBroker,
    PluginError, StaticLoader, TargetRun,
};

use crate::{CLASS_NAME, LIBRARY_NAME, MODULE_PATH, register};

// ---------------------------------------------------------------------------
// Scripted executor
// ---------------------------------------------------------------------------

/// Executor double that answers per server and records what it was asked.
#[derive(Clone, Default)]
struct ScriptedExecutor {
    failing: Option<(String, i32, String)>,
    commands: Arc<Mutex<Vec<Vec<String>>>>,
    attempted: Arc<Mutex<Vec<String>>>,
}

impl CommandExecutor for ScriptedExecutor {
    fn execute(
        &self,
        arguments: &[String],
        servers: &[String],
    ) -> Result<ExecutionReport, PluginError> {
        self.commands
            .lock()
            .expect("commands lock")
            .push(arguments.to_vec());
        let mut runs = Vec::new();
        for server in servers {
            self.attempted
                .lock()
                .expect("attempted lock")
                .push(server.clone());
            if let Some((target, status, output)) = &self.failing
                && target == server
            {
                return Err(PluginError::ExecutionFailure {
                    target: target.clone(),
                    status: *status,
                    output: output.clone(),
                });
            }
            runs.push(TargetRun {
                target: Some(server.clone()),
                status: 0,
                stdout: format!("reply from {server}\n"),
                stderr: String::new(),
            });
        }
        Ok(ExecutionReport::new(runs))
    }
}

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TestWorld {
    executor: ScriptedExecutor,
    broker: Option<OperationBroker>,
    outcome: Option<Result<serde_json::Value, PluginError>>,
}

#[fixture]
fn world() -> TestWorld {
    TestWorld::default()
}

fn list(raw: &str) -> Vec<String> {
    raw.split(',').map(|item| item.trim().to_owned()).collect()
}

fn failure(world: &TestWorld) -> &PluginError {
    world
        .outcome
        .as_ref()
        .expect("no outcome captured")
        .as_ref()
        .expect_err("expected failure but got success")
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("an executor where every server answers")]
fn given_answering_executor(world: &mut TestWorld) {
    world.executor = ScriptedExecutor::default();
}

#[given(
    "an executor where server \"{server}\" exits with status {status} and output \"{output}\""
)]
fn given_failing_server(world: &mut TestWorld, server: String, status: i32, output: String) {
    world.executor = ScriptedExecutor {
        failing: Some((server, status, output)),
        ..ScriptedExecutor::default()
    };
}

#[given("a broker serving the net library")]
fn given_broker(world: &mut TestWorld) {
    let loader = register(StaticLoader::new(), world.executor.clone());
    let mut registry = LibraryRegistry::new(loader);
    registry
        .register(LibraryDeclaration::new(LIBRARY_NAME, MODULE_PATH, CLASS_NAME))
        .expect("declare net");
    world.broker = Some(OperationBroker::new(registry));
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("\"{command}\" is submitted to \"{branch}\" against \"{servers}\"")]
fn when_submitted(world: &mut TestWorld, command: String, branch: String, servers: String) {
    let tokens: Vec<String> = command.split_whitespace().map(str::to_owned).collect();
    let path: Vec<String> = branch.split('.').map(str::to_owned).collect();
    let broker = world.broker.as_ref().expect("broker should be configured");
    world.outcome = Some(broker.submit(&path, &tokens, &list(&servers)));
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("the payload lists runs for \"{servers}\"")]
fn then_runs_listed(world: &mut TestWorld, servers: String) {
    let payload = match world.outcome.as_ref().expect("no outcome captured") {
        Ok(payload) => payload.clone(),
        Err(err) => panic!("submission failed: {err}"),
    };
    let report: ExecutionReport = serde_json::from_value(payload).expect("report payload");
    let targets: Vec<String> = report
        .runs()
        .iter()
        .filter_map(|run| run.target.clone())
        .collect();
    assert_eq!(targets, list(&servers));
}

#[then("the executor ran {count} command(s)")]
fn then_command_count(world: &mut TestWorld, count: usize) {
    let commands = world.executor.commands.lock().expect("commands lock");
    assert_eq!(commands.len(), count, "commands: {commands:?}");
}

#[then("the submission fails with \"{kind}\"")]
fn then_fails_with(world: &mut TestWorld, kind: String) {
    let err = failure(world);
    assert_eq!(err.kind(), kind, "unexpected error: {err}");
}

#[then("the failure names server \"{server}\" with output \"{output}\"")]
fn then_failure_names_server(world: &mut TestWorld, server: String, output: String) {
    let err = failure(world);
    let PluginError::ExecutionFailure {
        target,
        output: captured,
        ..
    } = err
    else {
        panic!("expected ExecutionFailure, got {err:?}");
    };
    assert_eq!(target, &server);
    assert_eq!(captured, &output);
}

#[then("only servers \"{servers}\" were attempted")]
fn then_attempted(world: &mut TestWorld, servers: String) {
    let attempted = world.executor.attempted.lock().expect("attempted lock");
    assert_eq!(*attempted, list(&servers));
}

// ---------------------------------------------------------------------------
// Scenario registration
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/net_library.feature",
    name = "Ping runs once per server"
)]
fn ping_runs_per_server(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/net_library.feature",
    name = "A command for another program is refused"
)]
fn foreign_program_refused(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/net_library.feature",
    name = "The first failing server stops the submission"
)]
fn first_failure_stops(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/net_library.feature",
    name = "Folders cannot be submitted"
)]
fn folders_not_submitted(world: TestWorld) {
    let _ = world;
}
