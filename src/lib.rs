//! Mod archive deployment for extension directories
//!
//! This library synchronizes a runtime's extension directory with a set of
//! freshly built mod archives:
//! - resolves mod source references to archive paths ([`source`])
//! - identifies mods by the `name` in their `extension.json` ([`deployer::manifest`])
//! - removes older copies of the same mods and writes the new ones, copying or
//!   remapping them ([`deployer`])
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod config;
pub mod deployer;
pub mod error;
pub mod source;

// Re-export commonly used types
pub use deployer::{DeployReport, Deployer};
pub use error::{CliError, DeployError, Result};
