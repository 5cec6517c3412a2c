//! Runtime staging: copying load-time files next to the final executable.
//!
//! A [`StagingPlan`] is produced by resolution without touching the
//! filesystem. [`StagingPlan::apply`] is the only code in the core that
//! writes, and it checks every source and destination before deleting
//! anything so a failed run never leaves a half-applied plan behind.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{StagingError, StagingOperation};
use crate::ports::FileSystemPort;

/// What kind of file a staging action carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StagedFileKind {
    /// A delay-loaded binary.
    DelayLoadBinary,
    /// A non-binary runtime file such as the settings document.
    RuntimeFile,
}

/// Delete any existing file at `destination`, then copy `source` there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagingAction {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub kind: StagedFileKind,
}

/// Delete a previously staged copy of `source` without copying a new one.
///
/// Planned for delay-load binaries in configurations that do not stage
/// them, so an old build's binary never lingers next to the executable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaleRemoval {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Ordered staging actions targeting one output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagingPlan {
    output_dir: PathBuf,
    actions: Vec<StagingAction>,
    removals: Vec<StaleRemoval>,
}

/// Outcome of one applied staging action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagedFile {
    pub destination: PathBuf,
    pub kind: StagedFileKind,
    /// A previous copy existed and was deleted first.
    pub replaced_existing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StagingReport {
    pub staged: Vec<StagedFile>,
    /// Stale copies deleted without replacement.
    pub removed: Vec<PathBuf>,
}

impl StagingReport {
    pub fn replaced_count(&self) -> usize {
        self.staged.iter().filter(|f| f.replaced_existing).count()
    }
}

impl StagingPlan {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            actions: Vec::new(),
            removals: Vec::new(),
        }
    }

    fn destination_for(&self, source: &Path) -> PathBuf {
        let file_name = source
            .file_name()
            .map_or_else(|| source.to_path_buf(), PathBuf::from);
        self.output_dir.join(file_name)
    }

    fn targets(&self, destination: &Path) -> bool {
        self.actions.iter().any(|a| a.destination == destination)
            || self.removals.iter().any(|r| r.destination == destination)
    }

    /// Schedule `source` to be copied into the output directory under its own
    /// file name. Scheduling the same source twice is a no-op.
    pub fn schedule(&mut self, source: PathBuf, kind: StagedFileKind) {
        if self.actions.iter().any(|a| a.source == source) {
            return;
        }
        let destination = self.destination_for(&source);
        self.removals.retain(|r| r.destination != destination);
        self.actions.push(StagingAction {
            source,
            destination,
            kind,
        });
    }

    /// Schedule deletion of any copy of `source` already in the output
    /// directory. Ignored when the destination is already scheduled.
    pub fn schedule_removal(&mut self, source: PathBuf) {
        let destination = self.destination_for(&source);
        if self.targets(&destination) {
            return;
        }
        self.removals.push(StaleRemoval {
            source,
            destination,
        });
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn actions(&self) -> &[StagingAction] {
        &self.actions
    }

    pub fn removals(&self) -> &[StaleRemoval] {
        &self.removals
    }

    /// True when the plan neither copies nor removes anything.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty() && self.removals.is_empty()
    }

    /// Apply the plan.
    ///
    /// All sources are checked first, and no destination may be its own
    /// source. Then stale copies are removed, the output directory is
    /// created if needed, and each action's destination is deleted (when
    /// present) and copied. An empty plan makes no filesystem calls.
    pub fn apply(&self, fs: &dyn FileSystemPort) -> Result<StagingReport, StagingError> {
        if self.is_empty() {
            return Ok(StagingReport::default());
        }

        for action in &self.actions {
            if !fs.is_file(&action.source) {
                return Err(StagingError::Io {
                    operation: StagingOperation::Locate,
                    path: action.source.clone(),
                    reason: "source file does not exist".to_string(),
                });
            }
        }

        let pairs = self
            .actions
            .iter()
            .map(|a| (&a.source, &a.destination))
            .chain(self.removals.iter().map(|r| (&r.source, &r.destination)));
        for (source, destination) in pairs {
            reject_same_file(fs, source, destination)?;
        }

        let mut report = StagingReport::default();
        for removal in &self.removals {
            if fs.is_file(&removal.destination) {
                debug!(path = %removal.destination.display(), "removing stale staged file");
                fs.remove_file(&removal.destination)
                    .map_err(|e| StagingError::Io {
                        operation: StagingOperation::Delete,
                        path: removal.destination.clone(),
                        reason: e.reason(),
                    })?;
                report.removed.push(removal.destination.clone());
            }
        }

        if !self.actions.is_empty() && !fs.is_dir(&self.output_dir) {
            fs.create_dir_all(&self.output_dir)
                .map_err(|e| StagingError::Io {
                    operation: StagingOperation::CreateDirectory,
                    path: self.output_dir.clone(),
                    reason: e.reason(),
                })?;
        }

        for action in &self.actions {
            let replaced_existing = fs.is_file(&action.destination);
            if replaced_existing {
                debug!(path = %action.destination.display(), "removing previously staged file");
                fs.remove_file(&action.destination)
                    .map_err(|e| StagingError::Io {
                        operation: StagingOperation::Delete,
                        path: action.destination.clone(),
                        reason: e.reason(),
                    })?;
            }

            fs.copy_file(&action.source, &action.destination)
                .map_err(|e| StagingError::Io {
                    operation: StagingOperation::Copy,
                    path: action.destination.clone(),
                    reason: e.reason(),
                })?;

            report.staged.push(StagedFile {
                destination: action.destination.clone(),
                kind: action.kind,
                replaced_existing,
            });
        }

        info!(
            output_dir = %self.output_dir.display(),
            staged = report.staged.len(),
            replaced = report.replaced_count(),
            removed = report.removed.len(),
            "staged runtime files"
        );
        Ok(report)
    }
}

/// Fail when an existing `destination` is `source` itself, so deleting the
/// destination would destroy the package file.
fn reject_same_file(
    fs: &dyn FileSystemPort,
    source: &Path,
    destination: &Path,
) -> Result<(), StagingError> {
    if !fs.is_file(destination) {
        return Ok(());
    }
    let same = source == destination
        || matches!(
            (fs.canonicalize(source), fs.canonicalize(destination)),
            (Ok(a), Ok(b)) if a == b
        );
    if same {
        return Err(StagingError::Io {
            operation: StagingOperation::Locate,
            path: destination.to_path_buf(),
            reason: format!("destination is the source file {}", source.display()),
        });
    }
    Ok(())
}
