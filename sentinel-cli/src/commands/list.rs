//! List servers command.

use sentinel_core::tracing::TracingLevel;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::format::hosts_table;
use crate::util::{init_logging, load_config};

/// List servers command handler
pub fn cmd_list(opts: &GlobalOpts, format: OutputFormat) -> Result<(), CliError> {
    let manager = load_config(opts)?;
    init_logging(&manager, opts, TracingLevel::Warn);

    let registry = manager.registry();
    match format {
        OutputFormat::Table => println!("{}", hosts_table(&registry.public_hosts())),
        OutputFormat::Json => {
            let json = registry
                .public_hosts_json()
                .map_err(|e| CliError::Output(format!("Failed to serialize servers: {e}")))?;
            println!("{json}");
        }
    }

    Ok(())
}
