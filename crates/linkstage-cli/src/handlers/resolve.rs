//! Resolve command handler.

use anyhow::Result;
use linkstage_core::resolve_chain;
use linkstage_runtime::LocalFileSystem;

use crate::commands::{OutputFormat, TargetArgs};
use crate::config::FileConfig;
use crate::error::CliError;
use crate::presentation::{format_chain, print_json};

/// Execute the resolve command.
///
/// Prints the native package and consumer module configuration without
/// touching the output directory.
pub fn execute(args: &TargetArgs, file: &FileConfig) -> Result<()> {
    let request = super::build_request(args, file)?;
    let chain = resolve_chain(&request, &LocalFileSystem).map_err(CliError::from)?;

    match args.format {
        OutputFormat::Text => print!("{}", format_chain(&chain)),
        OutputFormat::Json => print_json(&chain)?,
    }
    Ok(())
}
