//! Package manifest: the fixed facts about one native library package.
//!
//! The manifest never lists artifacts. Binaries are discovered by
//! convention from the platform directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::definitions::PreprocessorDefinitionSet;

/// Errors loading a manifest file.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse manifest {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// Static description of a native package.
///
/// All fields are optional in the JSON form; missing ones take the defaults
/// of the bundled package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageManifest {
    /// Package (module) name, used in diagnostics and as a dependency name.
    pub name: String,

    /// Base include root, relative to the package root.
    pub include_dir: String,

    /// Vendor subdirectories of the include root, in header priority order.
    pub vendor_include_dirs: Vec<String>,

    /// Settings file shipped next to the platform binaries.
    pub settings_file: String,

    /// Definitions dependents must compile with (`NAME` or `NAME=value`).
    pub definitions: Vec<String>,
}

impl Default for PackageManifest {
    fn default() -> Self {
        Self {
            name: "IrisLibrary".to_string(),
            include_dir: "include".to_string(),
            vendor_include_dirs: ["nlohmann", "opencv2", "spdlog", "fmt"]
                .map(str::to_string)
                .to_vec(),
            settings_file: "appsettings.json".to_string(),
            definitions: [
                "IRIS_SHARED",
                "UTILS_SHARED",
                "SPDLOG_COMPILED_LIB",
                "SPDLOG_SHARED_LIB",
            ]
            .map(str::to_string)
            .to_vec(),
        }
    }
}

impl PackageManifest {
    /// Parse a manifest from JSON text. `origin` is only used in errors.
    pub fn from_json(json: &str, origin: &Path) -> Result<Self, ManifestError> {
        serde_json::from_str(json).map_err(|e| ManifestError::Parse {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let json = fs::read_to_string(path).map_err(|e| ManifestError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(&json, path)
    }

    pub fn definition_set(&self) -> PreprocessorDefinitionSet {
        self.definitions.iter().collect()
    }
}
