//! Mod deployment into an extension directory.
//!
//! # Overview
//!
//! The deployer:
//! 1. Reads the `extension.json` manifest of every candidate archive
//! 2. Removes older deployments of the same logical names from the target
//! 3. Writes each mod through an [`ArchiveTransformer`]
//! 4. Reports what happened as a [`DeployReport`]
//!
//! # Module Organization
//!
//! - [`manifest`] - manifest lookup inside zip archives
//! - [`orchestrator`] - the [`Deployer`] synchronization
//! - [`transform`] - copy and remapping transforms
//! - `checksum` - SHA-256 of written archives
//! - `report` - deploy outcome types

mod checksum;
pub mod error;
pub mod manifest;
pub mod orchestrator;
mod report;
pub mod transform;
mod utils;

pub use error::{Error, Result};
pub use manifest::{
    ExtensionManifest, MANIFEST_ENTRY, MAX_MANIFEST_SIZE, ManifestError, read_extension_name,
};
pub use orchestrator::{DeployPlan, Deployer, ModCandidate};
pub use report::{
    DeployReport, DeployedMod, FailureStage, ModFailure, RemovedMod, SkipReason, SkippedSource,
};
pub use transform::{ArchiveTransformer, CopyTransformer, Mappings, RemappingTransformer};
