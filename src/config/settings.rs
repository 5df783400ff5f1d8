//! Resolved deploy settings.

use crate::{
    deployer::{
        ArchiveTransformer, CopyTransformer, Deployer, Mappings, RemappingTransformer,
        transform::{CommandEngine, RemapEngine},
    },
    error::Result,
    source::ModSources,
};
use std::path::{Path, PathBuf};

/// Options of the remapping transform.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RemapSettings {
    /// External class remapper program; classes pass through when absent
    pub program: Option<String>,
    /// Arguments placed before the input and output paths
    pub args: Vec<String>,
    /// Class mappings file
    pub mappings: Option<PathBuf>,
}

/// Everything one deploy invocation needs, constructed via
/// [`SettingsBuilder`](super::SettingsBuilder).
#[derive(Debug, Clone)]
pub struct DeploySettings {
    target_dir: PathBuf,
    sources: ModSources,
    remap: Option<RemapSettings>,
}

impl DeploySettings {
    pub(crate) fn new(
        target_dir: PathBuf,
        sources: ModSources,
        remap: Option<RemapSettings>,
    ) -> Self {
        Self {
            target_dir,
            sources,
            remap,
        }
    }

    /// Returns the extension directory.
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Returns the mod sources.
    pub fn sources(&self) -> &ModSources {
        &self.sources
    }

    /// Returns the remapping options, if remapping is enabled.
    pub fn remap(&self) -> Option<&RemapSettings> {
        self.remap.as_ref()
    }

    /// Builds the transform described by these settings.
    ///
    /// Loads the mappings file and locates the remapper program up front so a
    /// misconfiguration fails before anything is deleted.
    pub fn transformer(&self) -> Result<Box<dyn ArchiveTransformer>> {
        let Some(remap) = &self.remap else {
            return Ok(Box::new(CopyTransformer));
        };

        let mappings = match &remap.mappings {
            Some(path) => Mappings::load(path)?,
            None => Mappings::new(),
        };
        log::debug!("Loaded {} class mapping(s)", mappings.len());

        let engine: Option<Box<dyn RemapEngine>> = match &remap.program {
            Some(program) => Some(Box::new(CommandEngine::locate(
                program,
                remap.args.clone(),
                remap.mappings.clone(),
            )?)),
            None => None,
        };

        Ok(Box::new(RemappingTransformer::new(engine, mappings)))
    }

    /// Builds the deployer for these settings.
    pub fn deployer(&self) -> Result<Deployer> {
        Ok(Deployer::new(&self.target_dir).with_transformer(self.transformer()?))
    }
}
