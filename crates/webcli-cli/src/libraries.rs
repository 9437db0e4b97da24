//! Builds the operation broker from the configured declarations.

use tracing::debug;
use webcli_config::Config;
use webcli_plugins::process::ProcessExecutor;
use webcli_plugins::{LibraryDeclaration, LibraryRegistry, OperationBroker, StaticLoader};

use crate::AppError;

const LIBRARIES_TARGET: &str = "webcli_cli::libraries";

/// Returns the loader table of every library compiled into the binary.
fn loader(config: &Config) -> StaticLoader {
    let executor = config
        .execution_timeout()
        .map_or_else(ProcessExecutor::new, |limit| {
            ProcessExecutor::new().with_timeout(limit)
        });
    webcli_library_net::register(StaticLoader::new(), executor)
}

fn declaration(entry: &webcli_config::LibraryDeclaration) -> LibraryDeclaration {
    let mut converted = LibraryDeclaration::new(
        entry.library_name.as_str(),
        entry.module_path.as_str(),
        entry.class_name.as_str(),
    );
    if let Some(description) = entry.description.as_deref() {
        converted = converted.with_description(description);
    }
    converted
}

/// Validates the configured declarations and registers them, in order, with
/// a fresh registry. Libraries are instantiated on first use.
pub(crate) fn build_broker(config: &Config) -> Result<OperationBroker, AppError> {
    config.validate_declarations()?;
    let mut registry = LibraryRegistry::new(loader(config));
    registry.register_all(config.libraries().iter().map(declaration))?;
    debug!(
        target: LIBRARIES_TARGET,
        libraries = config.libraries().len(),
        "declared libraries"
    );
    Ok(OperationBroker::new(registry))
}
