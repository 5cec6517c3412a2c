//! Resolution and staging error types.
//!
//! Every error here is fatal for the run that raised it. Nothing is retried
//! and nothing is downgraded to a warning; the caller aborts the build.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::descriptor::{ArtifactKind, ManifestError};
use crate::platform::PlatformTarget;

/// Errors raised while resolving a native package descriptor.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The target platform has no binaries in this package.
    ///
    /// Raised before any filesystem access.
    #[error("{platform} is not supported by the {package} package")]
    UnsupportedPlatform {
        platform: PlatformTarget,
        package: String,
    },

    /// The package root, include root or platform binary directory is absent.
    #[error("Expected directory {0} does not exist")]
    MissingArtifactDirectory(PathBuf),

    /// The manifest's settings file names a file already classified as a
    /// binary artifact.
    #[error("Settings file {path} is already classified as a {kind} artifact")]
    ConflictingArtifact { path: PathBuf, kind: ArtifactKind },

    /// An existing directory could not be listed.
    #[error("Failed to scan {path}: {reason}")]
    ArtifactScan { path: PathBuf, reason: String },
}

/// Filesystem operation performed while applying a staging plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagingOperation {
    /// Checking that a source file exists before anything is touched.
    Locate,
    CreateDirectory,
    Delete,
    Copy,
}

impl fmt::Display for StagingOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Locate => "locate",
            Self::CreateDirectory => "create directory",
            Self::Delete => "delete",
            Self::Copy => "copy",
        })
    }
}

/// Errors raised while applying a staging plan.
#[derive(Debug, Error)]
pub enum StagingError {
    /// A delete, copy or directory creation failed (permissions, file in use, ...).
    #[error("Failed to {operation} {path}: {reason}")]
    Io {
        operation: StagingOperation,
        path: PathBuf,
        reason: String,
    },
}

impl StagingError {
    /// Path the failing operation was applied to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } => path,
        }
    }
}

/// Top-level error for the whole resolve-then-stage pipeline.
///
/// Adapters map this to their own error types (CLI exit codes, build graph
/// diagnostics).
#[derive(Debug, Error)]
pub enum LinkStageError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}
