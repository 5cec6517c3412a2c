//! Module descriptors: what a package or module exposes to its dependents.
//!
//! - [`NativeLibraryDescriptor`]: the leaf. Gates the platform, discovers
//!   and classifies binaries, publishes includes and definitions.
//! - [`ConsumerModuleDescriptor`]: pure aggregation over a resolved native
//!   config plus sibling engine subsystem paths.
//!
//! # Design
//!
//! - Discovery is read-only and goes through [`crate::ports::FileSystemPort`]
//! - Staging is planned here but applied separately ([`crate::staging`])
//! - Resolution is all-or-nothing: an error means nothing was published

mod consumer;
mod definitions;
mod include_paths;
mod manifest;
mod native;

pub use consumer::{
    ConsumerModuleDescriptor, DependencyVisibility, ModuleDependencies, PchUsage,
    ResolvedModuleConfig, engine_subsystem_include_paths,
};
pub use definitions::{DefinitionValue, PreprocessorDefinitionSet};
pub use include_paths::IncludePathSet;
pub use manifest::{ManifestError, PackageManifest};
pub use native::{
    ArtifactKind, NativeArtifact, NativeLibraryDescriptor, ResolveTarget, ResolvedNativeConfig,
};
