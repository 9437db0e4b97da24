//! Static content of the `net` library: its tree, descriptions and schemas.
//!
//! Paths are the dotted branch below the library root, so `dns.lookup`
//! addresses the `lookup` operation of the `dns` folder and the empty path
//! addresses the root itself.

use webcli_plugins::operation::{Operation, OperationFolder, OperationType};
use webcli_plugins::parameter::{
    ParameterBase, ParameterData, ParameterList, ParameterOptionsToList, Preference, StringValue,
};

/// Root name; the first segment of every branch this library owns.
pub const LIBRARY_NAME: &str = "net";

pub(crate) fn tree() -> OperationFolder {
    OperationFolder::new(LIBRARY_NAME)
        .with(Operation::new("ping", OperationType::Module).with_module("ping"))
        .with(
            OperationFolder::new("dns")
                .with(Operation::new("lookup", OperationType::Module).with_module("host"))
                .with(Operation::new("trace", OperationType::Module).with_module("dig")),
        )
        .with(
            OperationFolder::new("http")
                .with(Operation::new("check", OperationType::Pipx).with_module("http")),
        )
}

pub(crate) fn describe(path: &str) -> Option<&'static str> {
    let text = match path {
        "" => "Network diagnostics run against each selected server.",
        "ping" => "Sends ICMP echo requests to each server and reports loss and latency.",
        "dns" => "Name resolution checks.",
        "dns.lookup" => "Resolves a name using each server as the DNS resolver.",
        "dns.trace" => "Follows the delegation chain for a name from the root servers.",
        "http" => "HTTP reachability checks run through pipx-installed tools.",
        "http.check" => "Requests each server over HTTP and prints the response headers.",
        _ => return None,
    };
    Some(text)
}

pub(crate) fn schema(path: &str) -> Option<ParameterData> {
    let list = match path {
        "ping" => ping(),
        "dns.lookup" => lookup(),
        "dns.trace" => trace(),
        "http.check" => check(),
        _ => return None,
    };
    Some(ParameterData::from(list))
}

/// Schema roots are mandatory so they always take part in validation.
fn root(name: &str) -> ParameterList {
    ParameterList::from_base(ParameterBase::new(name).mandatory())
}

fn flag(name: &str, description: &str) -> Preference {
    Preference::from_base(ParameterBase::new(name).with_description(description))
}

fn required_flag(name: &str, description: &str) -> Preference {
    Preference::from_base(
        ParameterBase::new(name)
            .mandatory()
            .with_description(description),
    )
}

fn text(name: &str, description: &str) -> StringValue {
    StringValue::from_base(ParameterBase::new(name).with_description(description))
}

fn ping() -> ParameterList {
    root("ping")
        .with(
            StringValue::from_base(
                ParameterBase::new("-c")
                    .mandatory()
                    .with_description("Number of echo requests"),
            )
            .with_value("4"),
        )
        .with(flag("-n", "Numeric output only"))
        .with(text("-W", "Seconds to wait for each reply"))
        .with(
            ParameterOptionsToList::from_base(
                ParameterBase::new("address family").with_description("Force an IP version"),
            )
            .with_option(ParameterList::new("IPv4").with(required_flag("-4", "Use IPv4")))
            .with_option(ParameterList::new("IPv6").with(required_flag("-6", "Use IPv6"))),
        )
}

fn lookup() -> ParameterList {
    root("lookup")
        .with(flag("-v", "Verbose output"))
        .with(text("-t", "Record type, e.g. A, MX or TXT"))
        .with(text("-W", "Seconds to wait for a reply"))
        .with(StringValue::from_base(
            ParameterBase::new("name")
                .mandatory()
                .with_description("Name to resolve"),
        ))
}

fn trace() -> ParameterList {
    root("trace")
        .with(required_flag("+trace", "Trace delegation from the root"))
        .with(
            ParameterOptionsToList::from_base(
                ParameterBase::new("transport").with_description("Query transport"),
            )
            .with_option(ParameterList::new("udp"))
            .with_option(ParameterList::new("tcp").with(required_flag("+tcp", "Query over TCP"))),
        )
        .with(StringValue::from_base(
            ParameterBase::new("name")
                .mandatory()
                .with_description("Name to trace"),
        ))
}

fn check() -> ParameterList {
    root("check")
        .with(flag("--headers", "Print only the response headers"))
        .with(text("--timeout", "Seconds to wait for the response"))
        .with(
            ParameterList::from_base(
                ParameterBase::new("authentication").with_description("Send credentials"),
            )
            .with(text("--auth-type", "basic or bearer"))
            .with(StringValue::from_base(
                ParameterBase::new("--auth")
                    .mandatory()
                    .with_description("user:password or token"),
            )),
        )
}
