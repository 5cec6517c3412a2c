//! Two-tier resolution: native package first, then the consumer module.

use std::path::PathBuf;

use serde::Serialize;

use crate::descriptor::{
    ConsumerModuleDescriptor, NativeLibraryDescriptor, PackageManifest, ResolveTarget,
    ResolvedModuleConfig, ResolvedNativeConfig,
};
use crate::error::{LinkStageError, ResolveError, StagingError};
use crate::ports::FileSystemPort;
use crate::staging::StagingReport;

/// Everything needed for one resolution run.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub target: ResolveTarget,
    pub manifest: PackageManifest,
    pub consumer: ConsumerModuleDescriptor,
    /// Sibling engine subsystem include directories, appended last.
    pub sibling_include_paths: Vec<PathBuf>,
}

/// Result of a successful two-tier resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedChain {
    pub native: ResolvedNativeConfig,
    pub module: ResolvedModuleConfig,
}

impl ResolvedChain {
    /// Apply the native package's staging plan.
    pub fn stage(&self, fs: &dyn FileSystemPort) -> Result<StagingReport, StagingError> {
        self.native.staging.apply(fs)
    }
}

/// Resolve the native descriptor, then the consumer.
///
/// A native failure is returned as-is and the consumer is never resolved.
/// Nothing is written; call [`ResolvedChain::stage`] to stage.
pub fn resolve_chain(
    request: &ResolveRequest,
    fs: &dyn FileSystemPort,
) -> Result<ResolvedChain, ResolveError> {
    let native = NativeLibraryDescriptor::new(request.manifest.clone()).resolve(&request.target, fs)?;
    let module = request
        .consumer
        .resolve(&native, &request.sibling_include_paths);
    Ok(ResolvedChain { native, module })
}

/// Resolve the chain and apply its staging plan.
///
/// Staging starts only after both tiers resolved.
pub fn resolve_and_stage(
    request: &ResolveRequest,
    fs: &dyn FileSystemPort,
) -> Result<(ResolvedChain, StagingReport), LinkStageError> {
    let chain = resolve_chain(request, fs)?;
    let report = chain.stage(fs)?;
    Ok((chain, report))
}
