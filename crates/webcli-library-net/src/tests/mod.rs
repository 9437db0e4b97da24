//! Unit and behavioural tests for the `net` library.

mod behaviour;

use mockall::mock;
use rstest::{fixture, rstest};
use webcli_plugins::parameter::{ParameterData, ParameterPath, ParameterValue};
use webcli_plugins::{
    CommandExecutor, ExecutionReport, LibraryApi, LibraryDeclaration, LibraryLoader,
    LibraryRegistry, OperationBroker, PluginError, StaticLoader, TargetRun,
};

use crate::{CLASS_NAME, LIBRARY_NAME, MODULE_PATH, NetLibrary, catalogue, register};

mock! {
    pub Executor {}
    impl CommandExecutor for Executor {
        fn execute(
            &self,
            arguments: &[String],
            servers: &[String],
        ) -> Result<ExecutionReport, PluginError>;
    }
    impl Clone for Executor {
        fn clone(&self) -> Self;
    }
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

pub(crate) fn report(runs: &[(&str, i32, &str)]) -> ExecutionReport {
    ExecutionReport::new(
        runs.iter()
            .map(|(target, status, stdout)| TargetRun {
                target: Some((*target).to_owned()),
                status: *status,
                stdout: (*stdout).to_owned(),
                stderr: String::new(),
            })
            .collect(),
    )
}

#[fixture]
fn idle() -> NetLibrary<MockExecutor> {
    let mut executor = MockExecutor::new();
    executor.expect_execute().never();
    NetLibrary::new(executor)
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

#[test]
fn tree_is_well_formed_and_rooted_at_net() {
    let tree = catalogue::tree();
    assert_eq!(tree.name(), LIBRARY_NAME);
    tree.validate().expect("unique sibling names");
    assert_eq!(
        tree.operation_branches(),
        vec![
            strings(&["ping"]),
            strings(&["dns", "lookup"]),
            strings(&["dns", "trace"]),
            strings(&["http", "check"]),
        ]
    );
}

#[test]
fn every_node_has_a_description_and_every_operation_a_valid_schema() {
    let tree = catalogue::tree();
    for branch in tree.operation_branches() {
        let path = branch.join(".");
        assert!(catalogue::describe(&path).is_some(), "{path} lacks a description");
        let schema = catalogue::schema(&path).expect("operation schema");
        schema.check_structure().expect("unique parameter names");
    }
    for folder in ["", "dns", "http"] {
        assert!(catalogue::describe(folder).is_some());
        assert!(catalogue::schema(folder).is_none());
    }
}

#[test]
fn the_ping_schema_is_ready_to_submit_as_shipped() {
    let schema = catalogue::schema("ping").expect("ping schema");
    schema.validate().expect("defaults are complete");
    assert_eq!(schema.to_arguments(), vec!["-c", "4"]);
}

#[rstest]
#[case("ping")]
#[case("dns.lookup")]
#[case("dns.trace")]
#[case("http.check")]
fn schema_roots_are_mandatory_and_selected(#[case] path: &str) {
    let schema = catalogue::schema(path).expect("operation schema");
    assert!(schema.base().is_mandatory());
    assert!(schema.base().is_selected());
}

#[test]
fn choosing_an_address_family_adds_its_flag() {
    let mut schema = catalogue::schema("ping").expect("ping schema");
    let family = ParameterPath::from(vec![3]);
    schema
        .apply(&family, ParameterValue::Choice(1))
        .expect("select IPv6");
    schema
        .apply(&ParameterPath::from(vec![1]), ParameterValue::Toggle(true))
        .expect("numeric output");
    assert_eq!(schema.to_arguments(), vec!["-c", "4", "-n", "-6"]);
}

#[test]
fn the_lookup_schema_needs_a_name() {
    let mut schema = catalogue::schema("dns.lookup").expect("lookup schema");
    assert!(schema.validate().is_err());
    schema
        .apply(
            &ParameterPath::from(vec![3]),
            ParameterValue::Text("example.org".into()),
        )
        .expect("fill name");
    schema.validate().expect("complete");
    assert_eq!(schema.to_arguments(), vec!["example.org"]);
}

#[test]
fn schemas_cover_every_parameter_variant() {
    let kinds: Vec<String> = ["ping", "dns.lookup", "dns.trace", "http.check"]
        .into_iter()
        .filter_map(catalogue::schema)
        .map(|schema| serde_json::to_string(&schema).expect("serialise"))
        .collect();
    let joined = kinds.join("\n");
    for tag in [
        "\"preference\"",
        "\"string_value\"",
        "\"parameter_list\"",
        "\"parameter_options_to_list\"",
    ] {
        assert!(joined.contains(tag), "no {tag} parameter in any schema");
    }
}

// ---------------------------------------------------------------------------
// Library contract
// ---------------------------------------------------------------------------

#[rstest]
#[case::root(&[], "Network diagnostics")]
#[case::folder(&["dns"], "Name resolution")]
#[case::operation(&["dns", "trace"], "delegation chain")]
fn descriptions_cover_folders_and_operations(
    idle: NetLibrary<MockExecutor>,
    #[case] branch: &[&str],
    #[case] fragment: &str,
) {
    let text = idle.description(&strings(branch)).expect("description");
    assert!(text.contains(fragment), "unexpected description: {text}");
}

#[rstest]
fn parameters_distinguish_folders_from_missing_paths(idle: NetLibrary<MockExecutor>) {
    let folder = idle.parameters(&strings(&["dns"])).expect_err("folder");
    assert_eq!(folder.kind(), "not_an_operation");

    let missing = idle
        .parameters(&strings(&["dns", "mx"]))
        .expect_err("missing");
    let PluginError::PathNotFound { segment, .. } = &missing else {
        panic!("expected PathNotFound, got {missing:?}");
    };
    assert_eq!(segment, "mx");
}

#[rstest]
fn parameters_return_the_catalogue_schema(idle: NetLibrary<MockExecutor>) {
    let schema = idle
        .parameters(&strings(&["dns", "trace"]))
        .expect("schema");
    assert_eq!(Some(schema), catalogue::schema("dns.trace"));
}

#[rstest]
#[case::empty_command(&["net", "ping"], &[], "invalid_submission")]
#[case::wrong_program(&["net", "ping"], &["rm", "-rf", "/"], "invalid_submission")]
#[case::folder(&["net", "dns"], &["host"], "not_an_operation")]
#[case::missing(&["net", "arp"], &["arp"], "path_not_found")]
#[case::foreign_root(&["disk", "ping"], &["ping"], "unknown_library")]
fn rejected_submissions_never_execute(
    idle: NetLibrary<MockExecutor>,
    #[case] branch: &[&str],
    #[case] command: &[&str],
    #[case] kind: &str,
) {
    let err = idle
        .submit_operation(&strings(branch), &strings(command), &strings(&["db01"]))
        .expect_err("rejected");
    assert_eq!(err.kind(), kind, "unexpected error: {err}");
}

#[test]
fn submissions_pass_command_and_servers_through_unchanged() {
    let mut executor = MockExecutor::new();
    executor
        .expect_execute()
        .withf(|arguments: &[String], servers: &[String]| {
            arguments == ["host", "-t", "MX", "example.org"] && servers == ["ns1", "ns2"]
        })
        .once()
        .returning(|_, _| Ok(report(&[("ns1", 0, "mx1\n"), ("ns2", 0, "mx2\n")])));
    let library = NetLibrary::new(executor);

    let payload = library
        .submit_operation(
            &strings(&["net", "dns", "lookup"]),
            &strings(&["host", "-t", "MX", "example.org"]),
            &strings(&["ns1", "ns2"]),
        )
        .expect("submitted");
    let decoded: ExecutionReport = serde_json::from_value(payload).expect("report payload");
    assert_eq!(decoded, report(&[("ns1", 0, "mx1\n"), ("ns2", 0, "mx2\n")]));
}

#[test]
fn execution_failures_are_returned_as_is() {
    let mut executor = MockExecutor::new();
    executor.expect_execute().once().returning(|_, _| {
        Err(PluginError::ExecutionFailure {
            target: "db02".into(),
            status: 2,
            output: "unknown host".into(),
        })
    });
    let library = NetLibrary::new(executor);

    let err = library
        .submit_operation(
            &strings(&["net", "ping"]),
            &strings(&["ping", "-c", "1"]),
            &strings(&["db01", "db02"]),
        )
        .expect_err("execution fails");
    assert!(matches!(err, PluginError::ExecutionFailure { status: 2, .. }));
}

// ---------------------------------------------------------------------------
// Loader registration
// ---------------------------------------------------------------------------

fn cloneable_executor() -> MockExecutor {
    let mut executor = MockExecutor::new();
    executor.expect_clone().returning(|| {
        let mut clone = MockExecutor::new();
        clone.expect_execute().never();
        clone
    });
    executor
}

#[test]
fn register_adds_the_net_constructor() {
    let loader = register(StaticLoader::new(), cloneable_executor());
    assert_eq!(loader.len(), 1);

    let library = loader
        .instantiate(&LibraryDeclaration::new(LIBRARY_NAME, MODULE_PATH, CLASS_NAME))
        .expect("constructed");
    assert_eq!(library.operation_hierarchy(), catalogue::tree());
}

#[test]
fn the_constructor_refuses_other_library_names() {
    let loader = register(StaticLoader::new(), cloneable_executor());
    let err = loader
        .instantiate(&LibraryDeclaration::new("network", MODULE_PATH, CLASS_NAME))
        .err()
        .expect("wrong name");
    assert!(err.to_string().contains("not 'network'"), "unexpected: {err}");
}

#[test]
fn choosing_an_option_leaves_the_served_schema_untouched() {
    let mut registry = LibraryRegistry::new(register(StaticLoader::new(), cloneable_executor()));
    registry
        .register(LibraryDeclaration::new(LIBRARY_NAME, MODULE_PATH, CLASS_NAME))
        .expect("declare net");
    let broker = OperationBroker::new(registry);
    let branch = strings(&["net", "ping"]);

    let mut chosen = broker.parameters(&branch).expect("first fetch");
    chosen
        .apply(&ParameterPath::from(vec![3]), ParameterValue::Choice(1))
        .expect("select IPv6");
    let refetched = broker.parameters(&branch).expect("second fetch");

    assert_ne!(chosen, refetched);
    assert_eq!(refetched, catalogue::schema("ping").expect("ping schema"));
}

#[test]
fn submission_arguments_come_from_a_filled_schema() {
    let mut schema: ParameterData = catalogue::schema("dns.trace").expect("trace schema");
    schema
        .apply(&ParameterPath::from(vec![1]), ParameterValue::Choice(1))
        .expect("tcp");
    schema
        .apply(
            &ParameterPath::from(vec![2]),
            ParameterValue::Text("example.org".into()),
        )
        .expect("name");
    schema.validate().expect("complete");

    let mut command = strings(&["dig"]);
    command.extend(schema.to_arguments());
    assert_eq!(command, ["dig", "+trace", "+tcp", "example.org"]);

    let mut executor = MockExecutor::new();
    executor
        .expect_execute()
        .withf(|arguments: &[String], _servers: &[String]| arguments.first().is_some_and(|p| p == "dig"))
        .once()
        .returning(|_, servers| {
            Ok(report(&[(servers.first().map_or("", String::as_str), 0, ";; done\n")]))
        });
    let library = NetLibrary::new(executor);
    library
        .submit_operation(&strings(&["net", "dns", "trace"]), &command, &strings(&["1.1.1.1"]))
        .expect("submitted");
}
