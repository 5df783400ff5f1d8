//! Archive transforms applied while deploying a mod.
//!
//! The deployer only knows the [`ArchiveTransformer`] capability. Two
//! implementations exist:
//!
//! - [`CopyTransformer`] - byte-for-byte copy
//! - [`RemappingTransformer`] - rewrites the archive through a [`RemapEngine`]
//!   and the registered [`ResourceRemapper`]s

mod mappings;
mod remap;
mod resources;

use std::{io, path::Path};

pub use mappings::{DEFAULT_TARGET_NAMESPACE, Mappings};
pub use remap::{CommandEngine, RemapEngine, RemappingTransformer};
pub use resources::{
    AccessWidenerRemapper, AnnotationConfigRemapper, RemappedResource, ResourceRemapper,
    ServiceFileRemapper, default_resource_remappers,
};

/// Writes `destination` from `source`.
///
/// Any prior file at `destination` has already been removed by the caller.
/// Failures are surfaced as I/O errors and never retried.
pub trait ArchiveTransformer: Send + Sync {
    /// Short name used in logs and reports.
    fn describe(&self) -> &'static str;

    /// Produces the destination archive.
    fn transform(&self, source: &Path, destination: &Path) -> io::Result<()>;
}

/// Plain replace-existing copy.
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyTransformer;

impl ArchiveTransformer for CopyTransformer {
    fn describe(&self) -> &'static str {
        "copy"
    }

    fn transform(&self, source: &Path, destination: &Path) -> io::Result<()> {
        log::info!(
            "Copying target {} from {}",
            destination.display(),
            source.display()
        );
        super::utils::fs::copy_file_replacing(source, destination).map(|_| ())
    }
}
