//! Runtime tests driven through [`run_with_loader`] with in-memory streams.

use std::ffi::OsString;
use std::process::ExitCode;

use rstest::{fixture, rstest};
use webcli_config::{Config, LibraryDeclaration};
use webcli_plugins::parameter::{ParameterData, ParameterPath, ParameterValue};

use super::*;
use crate::cli::Branch;


/// Hands out a fixed configuration whatever flags are passed.
struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Captured result of one CLI invocation.
struct Outcome {
    exit: ExitCode,
    stdout: String,
    stderr: String,
}

impl Outcome {
    fn stdout_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout).expect("stdout is JSON")
    }

    fn error_json(&self) -> serde_json::Value {
        serde_json::from_str(self.stderr.trim()).expect("stderr is JSON")
    }
}

fn net_declaration() -> LibraryDeclaration {
    LibraryDeclaration::new("net", "webcli_library_net", "NetLibrary")
}

/// Configuration with logging switched off; the first run in the test
/// process installs the subscriber for every later run.
pub(crate) fn quiet_config() -> Config {
    Config {
        log_filter: "off".to_owned(),
        ..Config::default()
    }
}

#[fixture]
fn net_config() -> Config {
    Config {
        libraries: vec![net_declaration()],
        ..quiet_config()
    }
}

fn run_cli(config: &Config, args: &[&str], input: &str) -> Outcome {
    let mut argv = vec![OsString::from("webcli")];
    argv.extend(args.iter().map(OsString::from));
    let mut stdin = input.as_bytes();
    let mut stdout: Vec<u8> = Vec::new();
    let mut stderr: Vec<u8> = Vec::new();
    let loader = StaticConfigLoader::new(config.clone());
    let exit = {
        let mut io = IoStreams::new(&mut stdin, &mut stdout, &mut stderr);
        run_with_loader(argv, &mut io, &loader)
    };
    Outcome {
        exit,
        stdout: String::from_utf8(stdout).expect("stdout utf8"),
        stderr: String::from_utf8(stderr).expect("stderr utf8"),
    }
}

fn ping_schema(config: &Config) -> ParameterData {
    let outcome = run_cli(config, &["parameters", "net.ping"], "");
    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    serde_json::from_str(&outcome.stdout).expect("ping schema")
}

#[test]
fn test_runs_keep_logging_off() {
    assert_eq!(quiet_config().log_filter(), "off");
    assert_eq!(net_config().log_filter(), "off");
}

#[rstest]
#[case("", 0)]
#[case("net", 1)]
#[case("net.dns.lookup", 3)]
fn branches_parse_from_dotted_text(#[case] raw: &str, #[case] depth: usize) {
    let branch: Branch = raw.parse().expect("infallible");
    assert_eq!(branch.segments().len(), depth);
    assert_eq!(branch.to_string(), raw);
}

#[rstest]
fn hierarchy_lists_the_configured_libraries(net_config: Config) {
    let outcome = run_cli(&net_config, &["hierarchy"], "");
    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    let trees = outcome.stdout_json();
    let names: Vec<&str> = trees
        .as_array()
        .expect("array of trees")
        .iter()
        .filter_map(|tree| tree.get("name").and_then(serde_json::Value::as_str))
        .collect();
    assert_eq!(names, [webcli_library_net::LIBRARY_NAME]);
}

#[test]
fn hierarchy_without_libraries_is_empty() {
    let outcome = run_cli(&quiet_config(), &["hierarchy"], "");
    assert_eq!(outcome.exit, ExitCode::SUCCESS);
    assert_eq!(outcome.stdout_json(), serde_json::json!([]));
}

#[rstest]
fn describe_prints_the_folder_text(net_config: Config) {
    let outcome = run_cli(&net_config, &["describe", "net.dns"], "");
    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    assert!(outcome.stdout_json().is_string());
}

#[rstest]
#[case::folder(&["parameters", "net.dns"], "not_an_operation")]
#[case::unknown_path(&["describe", "net.smtp"], "path_not_found")]
#[case::unknown_library(&["describe", "mail"], "unknown_library")]
#[case::empty_branch(&["describe", ""], "empty_branch")]
fn unroutable_branches_are_client_errors(
    net_config: Config,
    #[case] args: &[&str],
    #[case] kind: &str,
) {
    let outcome = run_cli(&net_config, args, "");
    assert_eq!(outcome.exit, ExitCode::from(2));
    assert!(outcome.stdout.is_empty());
    let error = outcome.error_json();
    assert_eq!(error["kind"], kind);
    assert_eq!(error["category"], "client_input");
}

#[rstest]
fn command_builds_a_submission_from_a_filled_schema(net_config: Config) {
    let mut schema = ping_schema(&net_config);
    schema
        .apply(&ParameterPath::from(vec![1]), ParameterValue::Toggle(true))
        .expect("numeric output");
    schema
        .apply(&ParameterPath::from(vec![3]), ParameterValue::Choice(0))
        .expect("IPv4");
    let input = serde_json::to_string(&schema).expect("schema json");

    let outcome = run_cli(&net_config, &["command", "net.ping"], &input);
    assert_eq!(outcome.exit, ExitCode::SUCCESS, "stderr: {}", outcome.stderr);
    assert_eq!(
        outcome.stdout_json(),
        serde_json::json!({
            "operationBranch": ["net", "ping"],
            "command": ["ping", "-c", "4", "-n", "-4"],
            "servers": [],
        })
    );
}

#[rstest]
fn command_rejects_an_incomplete_schema(net_config: Config) {
    let lookup = run_cli(&net_config, &["parameters", "net.dns.lookup"], "");
    assert_eq!(lookup.exit, ExitCode::SUCCESS);

    let outcome = run_cli(&net_config, &["command", "net.dns.lookup"], &lookup.stdout);
    assert_eq!(outcome.exit, ExitCode::from(2));
    assert_eq!(outcome.error_json()["kind"], "incomplete_schema");
}

#[rstest]
fn command_rejects_input_that_is_not_a_schema(net_config: Config) {
    let outcome = run_cli(&net_config, &["command", "net.ping"], "ping -c 1");
    assert_eq!(outcome.exit, ExitCode::from(2));
    assert_eq!(outcome.error_json()["kind"], "parse_schema");
}

#[rstest]
#[case::wrong_program(&["submit", "net.ping", "--server", "db01", "--", "traceroute", "db01"], "invalid_submission")]
#[case::empty_command(&["submit", "net.ping", "--server", "db01"], "invalid_submission")]
#[case::unknown_library(&["submit", "mail.send", "--", "sendmail"], "unknown_library")]
fn rejected_submissions_run_nothing(
    net_config: Config,
    #[case] args: &[&str],
    #[case] kind: &str,
) {
    let outcome = run_cli(&net_config, args, "");
    assert_eq!(outcome.exit, ExitCode::from(2));
    assert_eq!(outcome.error_json()["kind"], kind);
}

#[test]
fn unknown_library_classes_are_configuration_errors() {
    let config = Config {
        libraries: vec![LibraryDeclaration::new(
            "net",
            "webcli_library_net",
            "MissingLibrary",
        )],
        ..quiet_config()
    };
    let outcome = run_cli(&config, &["hierarchy"], "");
    assert_eq!(outcome.exit, ExitCode::from(3));
    let error = outcome.error_json();
    assert_eq!(error["kind"], "load_failure");
    assert_eq!(error["category"], "configuration");
}

#[test]
fn duplicate_declarations_are_refused_before_loading() {
    let config = Config {
        libraries: vec![net_declaration(), net_declaration()],
        ..quiet_config()
    };
    let outcome = run_cli(&config, &["describe", "net"], "");
    assert_eq!(outcome.exit, ExitCode::from(3));
    assert_eq!(outcome.error_json()["kind"], "invalid_declarations");
}

#[rstest]
fn help_is_printed_to_stdout(net_config: Config) {
    let outcome = run_cli(&net_config, &["--help"], "");
    assert_eq!(outcome.exit, ExitCode::SUCCESS);
    assert!(outcome.stdout.contains("submit"));
    assert!(outcome.stderr.is_empty());
}

#[rstest]
fn usage_errors_print_clap_text(net_config: Config) {
    let outcome = run_cli(&net_config, &["teleport"], "");
    assert_eq!(outcome.exit, ExitCode::from(2));
    assert!(outcome.stdout.is_empty());
    assert!(outcome.stderr.contains("teleport"));
}
