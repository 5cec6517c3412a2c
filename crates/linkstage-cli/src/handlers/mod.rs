//! Command handlers.
//!
//! Each handler layers its settings, calls into `linkstage-core` with the
//! local filesystem adapter and formats the result for the terminal.
//! Handlers hold no resolution logic of their own.

pub mod platforms;
pub mod resolve;
pub mod stage;

use linkstage_core::ResolveRequest;
use tracing::debug;

use crate::commands::TargetArgs;
use crate::config::{FileConfig, ResolveSettings};
use crate::error::CliError;

/// Layer arguments over the config file and build the core request.
fn build_request(args: &TargetArgs, file: &FileConfig) -> Result<ResolveRequest, CliError> {
    let settings = ResolveSettings::layer(args, file)?;
    debug!(
        package_root = %settings.package_root.display(),
        platform = %settings.platform,
        configuration = %settings.configuration,
        output_dir = %settings.output_dir.display(),
        "Layered resolve settings"
    );
    settings.to_request()
}
