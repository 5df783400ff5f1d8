//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap, with validation and
//! conversion into [`DeploySettings`].

use crate::config::{DeployConfig, DeploySettings, RemapSettings, SettingsBuilder};
use crate::error::Result;
use crate::source::ModSource;
use clap::Parser;
use std::path::PathBuf;

/// Deploy mod archives into an extension directory
#[derive(Parser, Debug)]
#[command(
    name = "mod-deployer",
    version,
    about = "Deploy mod archives into an extension directory",
    long_about = "Copies (or remaps) mod archives into an extension directory, replacing older
copies of the same mod. Mods are matched by the `name` in their extension.json, not by file name.

Sources may be plain paths, glob patterns, or prefixed notations:
  artifact:<path>             a single published archive
  task:<dir>/<archive>        the declared output of an archive task
  deps:<glob>                 every file matched by a pattern
  component:<a>,<b>           several of the above

Usage:
  mod-deployer --run-dir run build/libs/my-mod.jar
  mod-deployer --target-dir ~/.game/mods 'build/libs/*.jar'
  mod-deployer --config deploy.toml --remap --mappings mappings.tiny

Exit code 0 = every mod deployed, 2 = some mods failed, 1 = nothing was attempted."
)]
pub struct Args {
    /// Mod sources (paths, globs, or prefixed notations)
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Deploy configuration file (TOML)
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Extension directory to synchronize
    #[arg(short = 't', long, value_name = "DIR", env = "MOD_DEPLOYER_TARGET_DIR")]
    pub target_dir: Option<PathBuf>,

    /// Runtime working directory; mods are deployed to <DIR>/mods
    #[arg(short = 'r', long, value_name = "DIR")]
    pub run_dir: Option<PathBuf>,

    /// Directory relative sources are resolved against
    #[arg(short = 'b', long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Remap archives instead of copying them
    #[arg(long)]
    pub remap: bool,

    /// External class remapper program (implies --remap)
    #[arg(long, value_name = "PROGRAM")]
    pub remapper: Option<String>,

    /// Extra argument for the remapper program (repeatable)
    #[arg(long = "remapper-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub remapper_args: Vec<String>,

    /// Class mappings file (implies --remap)
    #[arg(long, value_name = "PATH")]
    pub mappings: Option<PathBuf>,

    /// Write a JSON deploy report to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Show what would be deployed and removed without touching anything
    #[arg(long)]
    pub dry_run: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Print every skipped source and removed file
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.quiet && self.verbose {
            return Err("--quiet and --verbose cannot be used together".to_string());
        }

        if !self.remapper_args.is_empty() && self.remapper.is_none() {
            return Err("--remapper-arg requires --remapper".to_string());
        }

        if let Some(config) = &self.config {
            if !config.is_file() {
                return Err(format!("Config file not found: {}", config.display()));
            }
        }

        Ok(())
    }

    /// Whether any remapping option was given.
    pub fn wants_remap(&self) -> bool {
        self.remap || self.remapper.is_some() || self.mappings.is_some()
    }

    /// Merges the arguments with the configuration file into deploy settings.
    pub fn to_settings(&self) -> Result<DeploySettings> {
        let mut builder = SettingsBuilder::new();

        if let Some(path) = &self.config {
            builder = builder.config(DeployConfig::load(path)?);
        }
        if let Some(dir) = &self.target_dir {
            builder = builder.target_dir(dir);
        }
        if let Some(dir) = &self.run_dir {
            builder = builder.run_dir(dir);
        }
        if let Some(dir) = &self.base_dir {
            builder = builder.base_dir(dir);
        }
        if self.wants_remap() {
            builder = builder.remap(RemapSettings {
                program: self.remapper.clone(),
                args: self.remapper_args.clone(),
                mappings: self.mappings.clone(),
            });
        }

        let sources = self
            .sources
            .iter()
            .map(|notation| ModSource::parse(notation))
            .collect::<Result<Vec<_>>>()?;

        builder.sources(sources).build()
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        let output = super::OutputManager::new(args.verbose, args.quiet);
        Self { output }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print verbose message if in verbose mode
    pub fn verbose_println(&self, message: &str) -> std::io::Result<()> {
        self.output.verbose(message)
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print warning message if not in quiet mode
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.output.warn(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        self.output.section(title)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}
