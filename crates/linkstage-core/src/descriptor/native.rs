//! Native library descriptor: platform gating, artifact discovery and
//! classification.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use super::definitions::PreprocessorDefinitionSet;
use super::include_paths::IncludePathSet;
use super::manifest::PackageManifest;
use crate::error::ResolveError;
use crate::platform::{ArtifactLayout, BuildConfiguration, PlatformTarget};
use crate::ports::FileSystemPort;
use crate::staging::{StagedFileKind, StagingPlan};

/// How a discovered file is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Linker input; never copied at runtime.
    StaticLink,
    /// Dynamic binary loaded on first use. Staged in configurations that
    /// stage runtime binaries, removed from the output everywhere else.
    DelayLoad,
    /// Non-link file that must sit next to the executable.
    RuntimeStaged,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StaticLink => "static link",
            Self::DelayLoad => "delay-load",
            Self::RuntimeStaged => "runtime staged",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeArtifact {
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

/// Inputs of one resolution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTarget {
    pub platform: PlatformTarget,
    pub configuration: BuildConfiguration,
    /// Package root holding `include/` and the per-platform directories.
    pub package_root: PathBuf,
    /// Directory runtime files are staged into. Must be distinct per platform
    /// when several platforms are resolved side by side.
    pub output_dir: PathBuf,
}

/// Everything a native package publishes to its dependents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedNativeConfig {
    pub package: String,
    pub platform: PlatformTarget,
    pub configuration: BuildConfiguration,
    pub include_paths: IncludePathSet,
    /// The same directories registered as system includes, so dependents
    /// do not surface warnings from third-party headers.
    pub system_include_paths: IncludePathSet,
    pub artifacts: Vec<NativeArtifact>,
    pub staging: StagingPlan,
    pub definitions: PreprocessorDefinitionSet,
}

impl ResolvedNativeConfig {
    fn paths_of(&self, kind: ArtifactKind) -> Vec<&Path> {
        self.artifacts
            .iter()
            .filter(|a| a.kind == kind)
            .map(|a| a.path.as_path())
            .collect()
    }

    pub fn static_link_artifacts(&self) -> Vec<&Path> {
        self.paths_of(ArtifactKind::StaticLink)
    }

    pub fn delay_load_artifacts(&self) -> Vec<&Path> {
        self.paths_of(ArtifactKind::DelayLoad)
    }

    pub fn runtime_staged_files(&self) -> Vec<&Path> {
        self.paths_of(ArtifactKind::RuntimeStaged)
    }
}

/// Describes one prebuilt native library package.
#[derive(Debug, Clone, Default)]
pub struct NativeLibraryDescriptor {
    manifest: PackageManifest,
}

impl NativeLibraryDescriptor {
    pub const fn new(manifest: PackageManifest) -> Self {
        Self { manifest }
    }

    pub const fn manifest(&self) -> &PackageManifest {
        &self.manifest
    }

    /// Resolve the package for `target`.
    ///
    /// Unsupported platforms fail before any filesystem call. Discovery only
    /// reads; the returned staging plan is applied separately. On error
    /// nothing is returned.
    pub fn resolve(
        &self,
        target: &ResolveTarget,
        fs: &dyn FileSystemPort,
    ) -> Result<ResolvedNativeConfig, ResolveError> {
        let layout =
            target
                .platform
                .artifact_layout()
                .ok_or_else(|| ResolveError::UnsupportedPlatform {
                    platform: target.platform,
                    package: self.manifest.name.clone(),
                })?;

        require_dir(fs, &target.package_root)?;
        let include_paths = self.include_paths(&target.package_root, fs)?;

        let binary_dir = target.package_root.join(layout.binary_dir);
        let artifacts = self.discover(&layout, &binary_dir, fs)?;
        let staging = Self::plan_staging(&artifacts, target.configuration, &target.output_dir);

        info!(
            package = %self.manifest.name,
            platform = %target.platform,
            configuration = %target.configuration,
            include_paths = include_paths.len(),
            artifacts = artifacts.len(),
            staged = staging.actions().len(),
            "resolved native package"
        );

        Ok(ResolvedNativeConfig {
            package: self.manifest.name.clone(),
            platform: target.platform,
            configuration: target.configuration,
            system_include_paths: include_paths.clone(),
            include_paths,
            artifacts,
            staging,
            definitions: self.manifest.definition_set(),
        })
    }

    /// Base include root first, then each vendor subdirectory present on
    /// disk in manifest order.
    pub fn include_paths(
        &self,
        package_root: &Path,
        fs: &dyn FileSystemPort,
    ) -> Result<IncludePathSet, ResolveError> {
        let include_root = package_root.join(&self.manifest.include_dir);
        require_dir(fs, &include_root)?;

        let mut paths = IncludePathSet::new();
        paths.insert(include_root.clone());
        for vendor in &self.manifest.vendor_include_dirs {
            let vendor_dir = include_root.join(vendor);
            if fs.is_dir(&vendor_dir) {
                paths.insert(vendor_dir);
            } else {
                debug!(path = %vendor_dir.display(), "vendor include directory not present");
            }
        }
        Ok(paths)
    }

    /// Classify the platform directory's top-level files.
    ///
    /// The directory is scanned once for static-link files and once for
    /// dynamic ones. Every match is picked up; there is no allow-list.
    pub fn discover(
        &self,
        layout: &ArtifactLayout,
        binary_dir: &Path,
        fs: &dyn FileSystemPort,
    ) -> Result<Vec<NativeArtifact>, ResolveError> {
        require_dir(fs, binary_dir)?;

        let mut artifacts = Vec::new();
        for path in scan(fs, binary_dir, layout.static_extension)? {
            debug!(file = %display_name(&path), "static link artifact");
            artifacts.push(NativeArtifact {
                path,
                kind: ArtifactKind::StaticLink,
            });
        }
        for path in scan(fs, binary_dir, layout.dynamic_extension)? {
            debug!(file = %display_name(&path), "delay-load artifact");
            artifacts.push(NativeArtifact {
                path,
                kind: ArtifactKind::DelayLoad,
            });
        }

        let settings = binary_dir.join(&self.manifest.settings_file);
        if let Some(clash) = artifacts
            .iter()
            .find(|a| same_file_name(&a.path, &settings))
        {
            return Err(ResolveError::ConflictingArtifact {
                path: clash.path.clone(),
                kind: clash.kind,
            });
        }
        artifacts.push(NativeArtifact {
            path: settings,
            kind: ArtifactKind::RuntimeStaged,
        });
        Ok(artifacts)
    }

    /// Staging actions for classified artifacts.
    ///
    /// Delay-load binaries are staged only in configurations that stage
    /// runtime binaries; elsewhere any copy left by an earlier build is
    /// scheduled for removal. Runtime-staged files are always staged.
    pub fn plan_staging(
        artifacts: &[NativeArtifact],
        configuration: BuildConfiguration,
        output_dir: &Path,
    ) -> StagingPlan {
        let mut plan = StagingPlan::new(output_dir);
        for artifact in artifacts {
            match artifact.kind {
                ArtifactKind::StaticLink => {}
                ArtifactKind::DelayLoad => {
                    if configuration.stages_runtime_binaries() {
                        plan.schedule(artifact.path.clone(), StagedFileKind::DelayLoadBinary);
                    } else {
                        plan.schedule_removal(artifact.path.clone());
                    }
                }
                ArtifactKind::RuntimeStaged => {
                    plan.schedule(artifact.path.clone(), StagedFileKind::RuntimeFile);
                }
            }
        }
        plan
    }
}

fn require_dir(fs: &dyn FileSystemPort, path: &Path) -> Result<(), ResolveError> {
    if fs.is_dir(path) {
        Ok(())
    } else {
        Err(ResolveError::MissingArtifactDirectory(path.to_path_buf()))
    }
}

/// Top-level files in `dir` whose extension matches `extension`
/// (case-insensitive), sorted by path.
fn scan(
    fs: &dyn FileSystemPort,
    dir: &Path,
    extension: &str,
) -> Result<Vec<PathBuf>, ResolveError> {
    let mut matches: Vec<PathBuf> = fs
        .list_files(dir)
        .map_err(|e| ResolveError::ArtifactScan {
            path: dir.to_path_buf(),
            reason: e.reason(),
        })?
        .into_iter()
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .collect();
    matches.sort();
    Ok(matches)
}

/// File names compare case-insensitively, matching how the scan matches
/// extensions.
fn same_file_name(a: &Path, b: &Path) -> bool {
    match (a.file_name(), b.file_name()) {
        (Some(a), Some(b)) => a.to_string_lossy().eq_ignore_ascii_case(&b.to_string_lossy()),
        _ => false,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
