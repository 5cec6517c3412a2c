//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Resolve how modules link against a prebuilt native library package and
/// stage its runtime files.
#[derive(Parser)]
#[command(name = "linkstage")]
#[command(about = "Resolve native package descriptors and stage runtime files")]
#[command(version)]
pub struct Cli {
    /// JSON config file supplying defaults for any resolve option
    #[arg(long, global = true, env = "LINKSTAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
