//! Filesystem port for artifact discovery and staging.
//!
//! Resolution only ever reads through this port; staging is the single
//! place that writes. Injecting it keeps both testable against a fake.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors reported by a filesystem implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileSystemError {
    /// The path does not exist.
    #[error("{0} does not exist")]
    NotFound(PathBuf),

    /// Any other I/O failure.
    #[error("I/O error on {path}: {reason}")]
    Io { path: PathBuf, reason: String },
}

impl FileSystemError {
    /// Human-readable cause without the path prefix.
    pub fn reason(&self) -> String {
        match self {
            Self::NotFound(_) => "not found".to_string(),
            Self::Io { reason, .. } => reason.clone(),
        }
    }
}

/// Blocking filesystem operations used by resolution and staging.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystemPort {
    /// Whether `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether `path` exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Regular files directly inside `dir` (non-recursive), in no particular order.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, FileSystemError>;

    /// Create `path` and any missing parents.
    fn create_dir_all(&self, path: &Path) -> Result<(), FileSystemError>;

    /// Absolute path with symlinks and `..` resolved. `path` must exist.
    fn canonicalize(&self, path: &Path) -> Result<PathBuf, FileSystemError>;

    fn remove_file(&self, path: &Path) -> Result<(), FileSystemError>;

    /// Copy `from` to `to`, overwriting `to`.
    fn copy_file(&self, from: &Path, to: &Path) -> Result<(), FileSystemError>;
}
