//! Core domain for describing how modules link against a prebuilt native
//! library package.
//!
//! The crate resolves a two-tier chain: a [`NativeLibraryDescriptor`] that
//! discovers and classifies the package's platform binaries, and a
//! [`ConsumerModuleDescriptor`] that aggregates the published include paths
//! and definitions. Filesystem access goes through [`ports::FileSystemPort`];
//! the real implementation lives in `linkstage-runtime`.

#![deny(unused_crate_dependencies)]

pub mod descriptor;
pub mod error;
pub mod pipeline;
pub mod platform;
pub mod ports;
pub mod staging;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types for convenience
pub use descriptor::{
    ArtifactKind, ConsumerModuleDescriptor, DefinitionValue, DependencyVisibility,
    IncludePathSet, ManifestError, ModuleDependencies, NativeArtifact, NativeLibraryDescriptor,
    PackageManifest, PchUsage, PreprocessorDefinitionSet, ResolveTarget, ResolvedModuleConfig,
    ResolvedNativeConfig, engine_subsystem_include_paths,
};
pub use error::{LinkStageError, ResolveError, StagingError, StagingOperation};
pub use pipeline::{ResolveRequest, ResolvedChain, resolve_and_stage, resolve_chain};
pub use platform::{ArtifactLayout, BuildConfiguration, ParseTargetError, PlatformTarget};
pub use ports::{FileSystemError, FileSystemPort};
pub use staging::{
    StagedFile, StagedFileKind, StagingAction, StagingPlan, StagingReport, StaleRemoval,
};
