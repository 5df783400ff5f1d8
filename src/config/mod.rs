//! Deploy configuration.
//!
//! Settings come from three layers, highest priority first: command line
//! arguments, environment variables (through clap) and an optional TOML
//! configuration file.

mod builder;
mod file;
mod settings;

pub use builder::{MODS_DIR_NAME, SettingsBuilder};
pub use file::{DeployConfig, RemapConfig};
pub use settings::{DeploySettings, RemapSettings};
