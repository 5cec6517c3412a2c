//! CLI-specific error types and mappings.
//!
//! This module provides error types for the CLI adapter and mappings
//! from core errors to exit codes and user-facing messages.

use linkstage_core::{LinkStageError, ManifestError, ResolveError, StagingError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The target platform has no binaries in the package.
    #[error("{0}")]
    UnsupportedPlatform(String),

    /// An expected package directory is absent or unreadable.
    #[error("{0}")]
    MissingInput(String),

    /// Staging runtime files failed.
    #[error("Staging failed: {0}")]
    Staging(String),

    /// Argument error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Configuration or manifest error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing output failed.
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Arguments(_) => 2,
            Self::MissingInput(_) => 66,        // EX_NOINPUT
            Self::UnsupportedPlatform(_) => 69, // EX_UNAVAILABLE
            Self::Staging(_) | Self::Io(_) => 74, // EX_IOERR
            Self::Config(_) => 78,              // EX_CONFIG
        }
    }
}

impl From<ResolveError> for CliError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::UnsupportedPlatform { .. } => Self::UnsupportedPlatform(err.to_string()),
            ResolveError::MissingArtifactDirectory(_) | ResolveError::ArtifactScan { .. } => {
                Self::MissingInput(err.to_string())
            }
            ResolveError::ConflictingArtifact { .. } => Self::Config(err.to_string()),
        }
    }
}

impl From<StagingError> for CliError {
    fn from(err: StagingError) -> Self {
        Self::Staging(err.to_string())
    }
}

impl From<ManifestError> for CliError {
    fn from(err: ManifestError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<LinkStageError> for CliError {
    fn from(err: LinkStageError) -> Self {
        match err {
            LinkStageError::Resolve(e) => e.into(),
            LinkStageError::Staging(e) => e.into(),
            LinkStageError::Manifest(e) => e.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(err.to_string())
    }
}
