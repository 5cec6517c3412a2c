//! Filesystem port implementation backed by `std::fs`.
//!
//! This module provides `LocalFileSystem`, which implements
//! `FileSystemPort` from linkstage-core. The CLI handlers pass it to every
//! resolve and stage run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use linkstage_core::ports::{FileSystemError, FileSystemPort};
use tracing::trace;

/// Default implementation of `FileSystemPort`.
///
/// # Example
///
/// ```ignore
/// use linkstage_runtime::LocalFileSystem;
/// use linkstage_core::resolve_chain;
///
/// let fs = LocalFileSystem::new();
/// let chain = resolve_chain(&request, &fs)?;
/// chain.stage(&fs)?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub const fn new() -> Self {
        Self
    }
}

fn map_io(path: &Path, err: &io::Error) -> FileSystemError {
    if err.kind() == io::ErrorKind::NotFound {
        FileSystemError::NotFound(path.to_path_buf())
    } else {
        FileSystemError::Io {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}

impl FileSystemPort for LocalFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, FileSystemError> {
        let entries = fs::read_dir(dir).map_err(|e| map_io(dir, &e))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io(dir, &e))?;
            let file_type = entry.file_type().map_err(|e| map_io(&entry.path(), &e))?;
            // Symlinks to files count; directories never do.
            if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
                files.push(entry.path());
            }
        }
        trace!(dir = %dir.display(), count = files.len(), "listed files");
        Ok(files)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FileSystemError> {
        if path.exists() && !path.is_dir() {
            return Err(FileSystemError::Io {
                path: path.to_path_buf(),
                reason: "exists but is not a directory".to_string(),
            });
        }
        fs::create_dir_all(path).map_err(|e| map_io(path, &e))
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, FileSystemError> {
        fs::canonicalize(path).map_err(|e| map_io(path, &e))
    }

    fn remove_file(&self, path: &Path) -> Result<(), FileSystemError> {
        fs::remove_file(path).map_err(|e| map_io(path, &e))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<(), FileSystemError> {
        fs::copy(from, to).map(|_| ()).map_err(|e| {
            if from.exists() {
                map_io(to, &e)
            } else {
                map_io(from, &e)
            }
        })
    }
}
