//! Stage command handler.

use anyhow::Result;
use linkstage_core::{ResolvedChain, StagingReport, resolve_and_stage};
use linkstage_runtime::LocalFileSystem;
use serde::Serialize;
use tracing::info;

use crate::commands::{OutputFormat, TargetArgs};
use crate::config::FileConfig;
use crate::error::CliError;
use crate::presentation::{format_staging, print_json};

#[derive(Serialize)]
struct StageOutput<'a> {
    resolved: &'a ResolvedChain,
    staged: &'a StagingReport,
}

/// Execute the stage command.
pub fn execute(args: &TargetArgs, file: &FileConfig) -> Result<()> {
    let request = super::build_request(args, file)?;
    let (chain, report) =
        resolve_and_stage(&request, &LocalFileSystem).map_err(CliError::from)?;

    info!(
        output_dir = %chain.native.staging.output_dir().display(),
        staged = report.staged.len(),
        replaced = report.replaced_count(),
        "Staging complete"
    );

    match args.format {
        OutputFormat::Text => print!("{}", format_staging(&report)),
        OutputFormat::Json => print_json(&StageOutput {
            resolved: &chain,
            staged: &report,
        })?,
    }
    Ok(())
}
