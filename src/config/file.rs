//! Deploy configuration file (`deploy.toml`).

use crate::error::{DeployError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Contents of a deploy configuration file. Every key is optional.
///
/// ```toml
/// target_dir = "run/mods"
/// run_dir = "run"
/// sources = ["build/libs/*.jar", "artifact:libs/core.jar"]
///
/// [remap]
/// enabled = true
/// program = "tiny-remapper"
/// args = ["--threads=1"]
/// mappings = "mappings.tiny"
/// ```
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    /// Explicit extension directory
    pub target_dir: Option<PathBuf>,

    /// Runtime working directory; mods go to `<run_dir>/mods`
    pub run_dir: Option<PathBuf>,

    /// Mod source notations
    #[serde(default)]
    pub sources: Vec<String>,

    /// Remapping transform options
    #[serde(default)]
    pub remap: RemapConfig,

    /// Directory the file was loaded from; relative sources resolve against it
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// `[remap]` table.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RemapConfig {
    /// Use the remapping transform instead of a plain copy
    #[serde(default)]
    pub enabled: bool,

    /// External class remapper program
    pub program: Option<String>,

    /// Extra arguments placed before the input and output paths
    #[serde(default)]
    pub args: Vec<String>,

    /// Class mappings file
    pub mappings: Option<PathBuf>,
}

impl DeployConfig {
    /// Parses configuration text. Relative paths are kept as written.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a configuration file, resolving its relative paths against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            DeployError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&text).map_err(|e| {
            DeployError::config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        log::debug!("Loaded deploy configuration from {}", path.display());
        Ok(config.relative_to(dir))
    }

    /// Joins every relative path in the configuration onto `dir`.
    pub fn relative_to(mut self, dir: &Path) -> Self {
        let join = |p: PathBuf| if p.is_relative() { dir.join(p) } else { p };
        self.target_dir = self.target_dir.map(join);
        self.run_dir = self.run_dir.map(join);
        self.remap.mappings = self.remap.mappings.map(join);
        self.base_dir = Some(dir.to_path_buf());
        self
    }
}
