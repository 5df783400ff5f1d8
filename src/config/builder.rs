//! Builder for constructing [`DeploySettings`].

use super::{DeployConfig, DeploySettings, RemapSettings};
use crate::{
    error::{DeployError, Result},
    source::{ModSource, ModSources},
};
use std::path::{Path, PathBuf};

/// Directory under the run directory that holds extensions.
pub const MODS_DIR_NAME: &str = "mods";

/// Builder for constructing [`DeploySettings`].
///
/// Explicit values set on the builder take priority over a loaded
/// [`DeployConfig`]; sources from both are kept, configuration file first.
///
/// # Examples
///
/// ```no_run
/// use mod_deployer::config::SettingsBuilder;
/// use mod_deployer::source::ModSource;
///
/// # fn example() -> mod_deployer::Result<()> {
/// let settings = SettingsBuilder::new()
///     .run_dir("run")
///     .source(ModSource::parse("build/libs/*.jar")?)
///     .build()?;
/// assert!(settings.target_dir().ends_with("run/mods"));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    config: DeployConfig,
    target_dir: Option<PathBuf>,
    run_dir: Option<PathBuf>,
    base_dir: Option<PathBuf>,
    sources: Vec<ModSource>,
    remap: Option<RemapSettings>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Uses a loaded configuration file as the lowest priority layer.
    pub fn config(mut self, config: DeployConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the extension directory explicitly.
    pub fn target_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.target_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the runtime working directory; the target falls back to
    /// `<run_dir>/mods`.
    pub fn run_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.run_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the directory relative sources resolve against.
    ///
    /// Default: the configuration file's directory, else the current directory.
    pub fn base_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.base_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Adds a mod source.
    pub fn source(mut self, source: ModSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Adds several mod sources.
    pub fn sources(mut self, sources: impl IntoIterator<Item = ModSource>) -> Self {
        self.sources.extend(sources);
        self
    }

    /// Enables the remapping transform.
    pub fn remap(mut self, remap: RemapSettings) -> Self {
        self.remap = Some(remap);
        self
    }

    /// Resolves the extension directory.
    ///
    /// Priority: explicit target, configuration `target_dir`, then the run
    /// directory (explicit, else configuration) joined with `mods`.
    fn resolve_target_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = self.target_dir.as_ref().or(self.config.target_dir.as_ref()) {
            return Ok(dir.clone());
        }
        if let Some(run_dir) = self.run_dir.as_ref().or(self.config.run_dir.as_ref()) {
            return Ok(run_dir.join(MODS_DIR_NAME));
        }
        Err(DeployError::TargetUnresolved {
            searched: vec![
                "--target-dir".to_string(),
                "MOD_DEPLOYER_TARGET_DIR".to_string(),
                "target_dir (config)".to_string(),
                "--run-dir / run_dir (config)".to_string(),
            ],
        })
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// - [`DeployError::TargetUnresolved`] when no target or run directory is known
    /// - parse errors of configuration file sources
    pub fn build(self) -> Result<DeploySettings> {
        let target_dir = self.resolve_target_dir()?;

        let base_dir = match self.base_dir.clone().or(self.config.base_dir.clone()) {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };

        let mut sources = ModSources::new(base_dir);
        for notation in &self.config.sources {
            sources.add(ModSource::parse(notation)?);
        }
        sources.add_all(self.sources);

        let file_remap = &self.config.remap;
        let remap = match self.remap {
            Some(mut remap) => {
                if remap.program.is_none() {
                    remap.program = file_remap.program.clone();
                    remap.args = file_remap.args.clone();
                }
                if remap.mappings.is_none() {
                    remap.mappings = file_remap.mappings.clone();
                }
                Some(remap)
            }
            None if file_remap.enabled => Some(RemapSettings {
                program: file_remap.program.clone(),
                args: file_remap.args.clone(),
                mappings: file_remap.mappings.clone(),
            }),
            None => None,
        };

        Ok(DeploySettings::new(target_dir, sources, remap))
    }
}
