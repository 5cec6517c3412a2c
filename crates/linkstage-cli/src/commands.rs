//! Main commands enum and shared resolve arguments.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use linkstage_core::{BuildConfiguration, PlatformTarget};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the native package and consumer module; writes nothing
    Resolve(TargetArgs),

    /// Resolve, then copy runtime files into the output directory
    Stage(TargetArgs),

    /// List platforms and which build configurations stage binaries
    Platforms,
}

/// How resolved output is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `key = value` lines
    #[default]
    Text,
    /// Pretty-printed JSON for the build graph
    Json,
}

/// Inputs of a resolution run. Unset values fall back to the config file,
/// then to built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Package root containing `include/` and per-platform directories
    #[arg(long, env = "LINKSTAGE_PACKAGE_ROOT")]
    pub package_root: Option<PathBuf>,

    /// Target platform (e.g. Win64)
    #[arg(long, env = "LINKSTAGE_PLATFORM")]
    pub platform: Option<PlatformTarget>,

    /// Build configuration (e.g. Development, Shipping)
    #[arg(long, env = "LINKSTAGE_CONFIGURATION")]
    pub configuration: Option<BuildConfiguration>,

    /// Directory runtime files are staged into
    #[arg(long, env = "LINKSTAGE_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Plugin directory of the consumer module
    #[arg(long, env = "LINKSTAGE_PLUGIN_DIR")]
    pub plugin_dir: Option<PathBuf>,

    /// Engine directory; adds the pixel capture subsystem include paths
    #[arg(long, env = "LINKSTAGE_ENGINE_DIR")]
    pub engine_dir: Option<PathBuf>,

    /// Package manifest JSON overriding the bundled package facts
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Extra sibling subsystem include directory (repeatable)
    #[arg(long = "sibling-include")]
    pub sibling_includes: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}
