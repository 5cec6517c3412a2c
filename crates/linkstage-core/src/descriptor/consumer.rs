//! Consumer module descriptor: aggregates what a module sees from the native
//! package and from sibling engine subsystems.
//!
//! No discovery happens here. Resolution takes an already-resolved native
//! config, so it cannot run after a native failure.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use super::definitions::PreprocessorDefinitionSet;
use super::native::ResolvedNativeConfig;

/// Precompiled header usage of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PchUsage {
    #[default]
    UseExplicitOrSharedPchs,
    UseSharedPchs,
    NoPchs,
}

impl fmt::Display for PchUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UseExplicitOrSharedPchs => "UseExplicitOrSharedPCHs",
            Self::UseSharedPchs => "UseSharedPCHs",
            Self::NoPchs => "NoPCHs",
        })
    }
}

/// Who sees a declared dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyVisibility {
    /// Propagates to anything depending on this module.
    Public,
    /// Visible only to this module's own compilation.
    Private,
    /// Loaded by name at runtime, not linked.
    DynamicallyLoaded,
}

/// Module dependency names, each with exactly one visibility.
///
/// Declaration order is kept. Declaring a name again moves it to the new
/// visibility, so the categories are always disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleDependencies {
    entries: Vec<(String, DependencyVisibility)>,
}

impl ModuleDependencies {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn declare(&mut self, name: impl Into<String>, visibility: DependencyVisibility) {
        let name = name.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            if entry.1 != visibility {
                debug!(dependency = %name, from = ?entry.1, to = ?visibility, "dependency visibility changed");
            }
            entry.1 = visibility;
        } else {
            self.entries.push((name, visibility));
        }
    }

    /// Declare several names with the same visibility.
    pub fn declare_all<I, S>(&mut self, names: I, visibility: DependencyVisibility)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.declare(name, visibility);
        }
    }

    pub fn visibility_of(&self, name: &str) -> Option<DependencyVisibility> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, visibility)| *visibility)
    }

    pub fn with_visibility(&self, visibility: DependencyVisibility) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, v)| *v == visibility)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn public(&self) -> Vec<&str> {
        self.with_visibility(DependencyVisibility::Public)
    }

    pub fn private(&self) -> Vec<&str> {
        self.with_visibility(DependencyVisibility::Private)
    }

    pub fn dynamically_loaded(&self) -> Vec<&str> {
        self.with_visibility(DependencyVisibility::DynamicallyLoaded)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ModuleDependencies {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ModuleDependencies", 3)?;
        state.serialize_field("public", &self.public())?;
        state.serialize_field("private", &self.private())?;
        state.serialize_field("dynamically_loaded", &self.dynamically_loaded())?;
        state.end()
    }
}

/// Declaration of a module that consumes engine services and the native
/// package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerModuleDescriptor {
    pub name: String,
    /// Include paths this module exposes itself, ahead of everything else.
    pub public_include_paths: Vec<PathBuf>,
    pub private_include_paths: Vec<PathBuf>,
    pub dependencies: ModuleDependencies,
    pub public_definitions: PreprocessorDefinitionSet,
    pub pch_usage: PchUsage,
}

/// Aggregated view of a consumer module, ready for the build graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedModuleConfig {
    pub name: String,
    /// Own public paths, then native package paths, then sibling paths.
    pub include_paths: Vec<PathBuf>,
    pub private_include_paths: Vec<PathBuf>,
    pub dependencies: ModuleDependencies,
    pub definitions: PreprocessorDefinitionSet,
    pub pch_usage: PchUsage,
}

/// Include directories of the engine's pixel capture subsystem.
pub fn engine_subsystem_include_paths(engine_dir: &Path) -> Vec<PathBuf> {
    let pixel_capture = engine_dir
        .join("Plugins")
        .join("Media")
        .join("PixelCapture")
        .join("Source")
        .join("PixelCapture");
    vec![pixel_capture.join("Private"), pixel_capture.join("Public")]
}

impl ConsumerModuleDescriptor {
    /// An empty declaration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public_include_paths: Vec::new(),
            private_include_paths: Vec::new(),
            dependencies: ModuleDependencies::new(),
            public_definitions: PreprocessorDefinitionSet::new(),
            pch_usage: PchUsage::default(),
        }
    }

    /// The capture-and-analysis module shipped with the native package,
    /// living in the plugin at `plugin_dir`.
    pub fn with_defaults(plugin_dir: &Path, native_package: &str) -> Self {
        let package_include = plugin_dir
            .join("Source")
            .join("ThirdParty")
            .join(native_package)
            .join("include");

        let mut dependencies = ModuleDependencies::new();
        dependencies.declare("Core", DependencyVisibility::Public);
        dependencies.declare_all(
            [
                "CoreUObject",
                "Engine",
                "Slate",
                "SlateCore",
                native_package,
                "Projects",
                "RHI",
                "RenderCore",
                "ImageWrapper",
                "InputCore",
                "PixelCapture",
                "PixelCaptureShaders",
                "Renderer",
                "WebRTC",
            ],
            DependencyVisibility::Private,
        );

        Self {
            public_include_paths: vec![
                package_include.clone(),
                package_include.join("iris"),
                package_include.join("src"),
                package_include.join("opencv2"),
            ],
            dependencies,
            ..Self::new("IrisEA")
        }
    }

    /// Aggregate the module's view of `native` and the sibling subsystems.
    ///
    /// Entries are concatenated as received, never reordered. The native
    /// package becomes a private dependency if the declaration omits it.
    pub fn resolve(
        &self,
        native: &ResolvedNativeConfig,
        sibling_include_paths: &[PathBuf],
    ) -> ResolvedModuleConfig {
        let include_paths: Vec<PathBuf> = self
            .public_include_paths
            .iter()
            .chain(native.include_paths.iter())
            .chain(sibling_include_paths)
            .cloned()
            .collect();

        let mut dependencies = self.dependencies.clone();
        if dependencies.visibility_of(&native.package).is_none() {
            dependencies.declare(native.package.clone(), DependencyVisibility::Private);
        }

        let mut definitions = native.definitions.clone();
        definitions.merge(&self.public_definitions);

        debug!(
            module = %self.name,
            include_paths = include_paths.len(),
            dependencies = dependencies.len(),
            "resolved consumer module"
        );

        ResolvedModuleConfig {
            name: self.name.clone(),
            include_paths,
            private_include_paths: self.private_include_paths.clone(),
            dependencies,
            definitions,
            pch_usage: self.pch_usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{IncludePathSet, NativeArtifact};
    use crate::platform::{BuildConfiguration, PlatformTarget};
    use crate::staging::StagingPlan;

    fn native() -> ResolvedNativeConfig {
        ResolvedNativeConfig {
            package: "IrisLibrary".to_string(),
            platform: PlatformTarget::Win64,
            configuration: BuildConfiguration::Development,
            include_paths: ["/pkg/include", "/pkg/include/fmt"].into_iter().collect(),
            system_include_paths: ["/pkg/include", "/pkg/include/fmt"].into_iter().collect(),
            artifacts: Vec::<NativeArtifact>::new(),
            staging: StagingPlan::new("/out"),
            definitions: ["IRIS_SHARED", "MODE=native"].into_iter().collect(),
        }
    }

    #[test]
    fn include_paths_keep_own_native_sibling_order() {
        let mut consumer = ConsumerModuleDescriptor::new("Consumer");
        consumer.public_include_paths = vec![PathBuf::from("/own")];
        let siblings = [PathBuf::from("/engine/a"), PathBuf::from("/engine/b")];

        let resolved = consumer.resolve(&native(), &siblings);

        assert_eq!(
            resolved.include_paths,
            [
                PathBuf::from("/own"),
                PathBuf::from("/pkg/include"),
                PathBuf::from("/pkg/include/fmt"),
                PathBuf::from("/engine/a"),
                PathBuf::from("/engine/b"),
            ]
        );
    }

    #[test]
    fn empty_declaration_passes_native_paths_through() {
        let resolved = ConsumerModuleDescriptor::new("Bare").resolve(&native(), &[]);
        let expected: IncludePathSet = ["/pkg/include", "/pkg/include/fmt"].into_iter().collect();
        assert_eq!(resolved.include_paths, expected.as_slice());
    }

    #[test]
    fn native_package_defaults_to_private_dependency() {
        let resolved = ConsumerModuleDescriptor::new("Bare").resolve(&native(), &[]);
        assert_eq!(resolved.dependencies.private(), ["IrisLibrary"]);
        assert!(resolved.dependencies.public().is_empty());
    }

    #[test]
    fn module_definitions_win_over_native() {
        let mut consumer = ConsumerModuleDescriptor::new("Consumer");
        consumer.public_definitions.set_rendered("MODE=module");

        let resolved = consumer.resolve(&native(), &[]);

        assert_eq!(resolved.definitions.rendered(), ["IRIS_SHARED", "MODE=module"]);
    }

    #[test]
    fn redeclaring_moves_dependency() {
        let mut deps = ModuleDependencies::new();
        deps.declare("Engine", DependencyVisibility::Public);
        deps.declare("Engine", DependencyVisibility::Private);
        assert!(deps.public().is_empty());
        assert_eq!(deps.private(), ["Engine"]);
        assert_eq!(deps.len(), 1);
    }

    #[test]
    fn default_declaration() {
        let consumer = ConsumerModuleDescriptor::with_defaults(Path::new("/plugin"), "IrisLibrary");

        assert_eq!(consumer.name, "IrisEA");
        assert_eq!(consumer.dependencies.public(), ["Core"]);
        assert_eq!(
            consumer.dependencies.visibility_of("IrisLibrary"),
            Some(DependencyVisibility::Private)
        );
        assert_eq!(consumer.dependencies.private().len(), 14);
        assert!(consumer.dependencies.dynamically_loaded().is_empty());
        assert_eq!(
            consumer.public_include_paths[0],
            Path::new("/plugin/Source/ThirdParty/IrisLibrary/include")
        );
        assert_eq!(consumer.pch_usage.to_string(), "UseExplicitOrSharedPCHs");
    }

    #[test]
    fn engine_paths_point_at_pixel_capture() {
        let paths = engine_subsystem_include_paths(Path::new("/engine"));
        assert_eq!(
            paths,
            [
                PathBuf::from("/engine/Plugins/Media/PixelCapture/Source/PixelCapture/Private"),
                PathBuf::from("/engine/Plugins/Media/PixelCapture/Source/PixelCapture/Public"),
            ]
        );
    }

    #[test]
    fn dependencies_serialize_by_category() {
        let mut deps = ModuleDependencies::new();
        deps.declare("Core", DependencyVisibility::Public);
        deps.declare("RHI", DependencyVisibility::Private);
        let json = serde_json::to_value(&deps).unwrap();
        assert_eq!(json["public"], serde_json::json!(["Core"]));
        assert_eq!(json["private"], serde_json::json!(["RHI"]));
        assert_eq!(json["dynamically_loaded"], serde_json::json!([]));
    }
}
