//! Configuration layering for resolve runs.
//!
//! Precedence, highest first: command-line flags, `LINKSTAGE_*` environment
//! variables (handled by clap, with `.env` loaded in main), the JSON file
//! passed via `--config`, built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use linkstage_core::{
    BuildConfiguration, ConsumerModuleDescriptor, PackageManifest, PlatformTarget, ResolveRequest,
    ResolveTarget, engine_subsystem_include_paths,
};
use serde::Deserialize;

use crate::commands::TargetArgs;
use crate::error::CliError;

/// Contents of the `--config` JSON file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub package_root: Option<PathBuf>,
    pub platform: Option<PlatformTarget>,
    pub configuration: Option<BuildConfiguration>,
    pub output_dir: Option<PathBuf>,
    pub plugin_dir: Option<PathBuf>,
    pub engine_dir: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub sibling_includes: Vec<PathBuf>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let json = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&json)
            .map_err(|e| CliError::Config(format!("invalid config {}: {e}", path.display())))
    }

    /// Load `path` if given, otherwise an empty config.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, CliError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

/// Fully layered inputs of a resolve run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveSettings {
    pub package_root: PathBuf,
    pub platform: PlatformTarget,
    pub configuration: BuildConfiguration,
    pub output_dir: PathBuf,
    pub plugin_dir: PathBuf,
    pub engine_dir: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub sibling_includes: Vec<PathBuf>,
}

impl ResolveSettings {
    /// Layer command-line values over the config file.
    ///
    /// Sibling include lists are concatenated, file entries first.
    pub fn layer(args: &TargetArgs, file: &FileConfig) -> Result<Self, CliError> {
        let package_root = args
            .package_root
            .clone()
            .or_else(|| file.package_root.clone())
            .ok_or_else(|| {
                CliError::Arguments(
                    "--package-root is required (flag, LINKSTAGE_PACKAGE_ROOT or config file)"
                        .to_string(),
                )
            })?;
        let platform = args.platform.or(file.platform).unwrap_or(PlatformTarget::Win64);
        let configuration = args
            .configuration
            .or(file.configuration)
            .unwrap_or_default();
        let output_dir = args
            .output_dir
            .clone()
            .or_else(|| file.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("Binaries").join(platform.name()));
        let plugin_dir = args
            .plugin_dir
            .clone()
            .or_else(|| file.plugin_dir.clone())
            .unwrap_or_else(|| default_plugin_dir(&package_root));

        let mut sibling_includes = file.sibling_includes.clone();
        sibling_includes.extend(args.sibling_includes.iter().cloned());

        Ok(Self {
            package_root,
            platform,
            configuration,
            output_dir,
            plugin_dir,
            engine_dir: args.engine_dir.clone().or_else(|| file.engine_dir.clone()),
            manifest: args.manifest.clone().or_else(|| file.manifest.clone()),
            sibling_includes,
        })
    }

    /// Build the core request, loading the manifest if one was given.
    pub fn to_request(&self) -> Result<ResolveRequest, CliError> {
        let manifest = match &self.manifest {
            Some(path) => PackageManifest::load(path)?,
            None => PackageManifest::default(),
        };

        let mut sibling_include_paths = self
            .engine_dir
            .as_deref()
            .map(engine_subsystem_include_paths)
            .unwrap_or_default();
        sibling_include_paths.extend(self.sibling_includes.iter().cloned());

        let consumer = ConsumerModuleDescriptor::with_defaults(&self.plugin_dir, &manifest.name);

        Ok(ResolveRequest {
            target: ResolveTarget {
                platform: self.platform,
                configuration: self.configuration,
                package_root: self.package_root.clone(),
                output_dir: self.output_dir.clone(),
            },
            manifest,
            consumer,
            sibling_include_paths,
        })
    }
}

/// `<plugin>/Source/ThirdParty/<package>` is the usual package location;
/// fall back to the package root itself when it is too shallow.
fn default_plugin_dir(package_root: &Path) -> PathBuf {
    package_root
        .ancestors()
        .nth(3)
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| package_root.to_path_buf(), Path::to_path_buf)
}
