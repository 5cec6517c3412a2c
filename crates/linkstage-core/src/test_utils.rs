//! In-memory filesystem for resolution and staging tests.
//!
//! Records every call so tests can assert on ordering and on the absence
//! of side effects.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::ports::{FileSystemError, FileSystemPort};

#[derive(Default)]
struct State {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    locked: BTreeSet<PathBuf>,
    /// Symlink-style aliases: `canonicalize(alias)` yields the target.
    aliases: BTreeMap<PathBuf, PathBuf>,
    calls: Vec<String>,
}

/// Fake filesystem backed by maps. Parent directories of added files exist
/// implicitly.
#[derive(Default)]
pub struct FakeFileSystem {
    state: RefCell<State>,
}

impl FakeFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        add_dir_with_ancestors(&mut self.state.borrow_mut().dirs, &path.into());
        self
    }

    pub fn with_file(self, path: impl Into<PathBuf>, contents: &[u8]) -> Self {
        let path = path.into();
        {
            let mut state = self.state.borrow_mut();
            if let Some(parent) = path.parent() {
                add_dir_with_ancestors(&mut state.dirs, parent);
            }
            state.files.insert(path, contents.to_vec());
        }
        self
    }

    /// Make deletes of `path` fail as if the file were in use.
    pub fn with_locked(self, path: impl Into<PathBuf>) -> Self {
        self.state.borrow_mut().locked.insert(path.into());
        self
    }

    /// Make `alias` an existing file that canonicalizes to `target`.
    pub fn with_alias(self, alias: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        let alias = alias.into();
        let target = target.into();
        {
            let mut state = self.state.borrow_mut();
            if let Some(parent) = alias.parent() {
                add_dir_with_ancestors(&mut state.dirs, parent);
            }
            let contents = state.files.get(&target).cloned().unwrap_or_default();
            state.files.insert(alias.clone(), contents);
            state.aliases.insert(alias, target);
        }
        self
    }

    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.state.borrow().files.get(path.as_ref()).cloned()
    }

    /// Files directly inside `dir` with their contents.
    pub fn snapshot(&self, dir: impl AsRef<Path>) -> BTreeMap<PathBuf, Vec<u8>> {
        let dir = dir.as_ref();
        self.state
            .borrow()
            .files
            .iter()
            .filter(|(path, _)| path.parent() == Some(dir))
            .map(|(path, contents)| (path.clone(), contents.clone()))
            .collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.borrow().calls.clone()
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }
}

fn add_dir_with_ancestors(dirs: &mut BTreeSet<PathBuf>, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        dirs.insert(ancestor.to_path_buf());
    }
}

impl FileSystemPort for FakeFileSystem {
    fn is_dir(&self, path: &Path) -> bool {
        self.record(format!("is_dir {}", path.display()));
        self.state.borrow().dirs.contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.record(format!("is_file {}", path.display()));
        self.state.borrow().files.contains_key(path)
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, FileSystemError> {
        self.record(format!("list_files {}", dir.display()));
        let state = self.state.borrow();
        if !state.dirs.contains(dir) {
            return Err(FileSystemError::NotFound(dir.to_path_buf()));
        }
        Ok(state
            .files
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .cloned()
            .collect())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FileSystemError> {
        self.record(format!("create_dir_all {}", path.display()));
        add_dir_with_ancestors(&mut self.state.borrow_mut().dirs, path);
        Ok(())
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, FileSystemError> {
        self.record(format!("canonicalize {}", path.display()));
        let state = self.state.borrow();
        let resolved = state.aliases.get(path).cloned().unwrap_or_else(|| path.to_path_buf());
        if state.files.contains_key(&resolved) || state.dirs.contains(&resolved) {
            Ok(resolved)
        } else {
            Err(FileSystemError::NotFound(path.to_path_buf()))
        }
    }

    fn remove_file(&self, path: &Path) -> Result<(), FileSystemError> {
        self.record(format!("remove_file {}", path.display()));
        let mut state = self.state.borrow_mut();
        if state.locked.contains(path) {
            return Err(FileSystemError::Io {
                path: path.to_path_buf(),
                reason: "file is in use".to_string(),
            });
        }
        state
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| FileSystemError::NotFound(path.to_path_buf()))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<(), FileSystemError> {
        self.record(format!("copy_file {} -> {}", from.display(), to.display()));
        let mut state = self.state.borrow_mut();
        let contents = state
            .files
            .get(from)
            .cloned()
            .ok_or_else(|| FileSystemError::NotFound(from.to_path_buf()))?;
        if let Some(parent) = to.parent() {
            if !state.dirs.contains(parent) {
                return Err(FileSystemError::NotFound(parent.to_path_buf()));
            }
        }
        state.files.insert(to.to_path_buf(), contents);
        Ok(())
    }
}
