#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

//! Command-line adapter for linkstage.
//!
//! `main.rs` is the composition root; everything else is reachable from
//! here so it can be tested without spawning the binary.

// Used only by the binary entry point
use dotenvy as _;
use tracing_subscriber as _;

pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use commands::{Commands, OutputFormat, TargetArgs};
pub use config::{FileConfig, ResolveSettings};
pub use error::CliError;
pub use parser::Cli;
