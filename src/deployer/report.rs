//! Outcome of a deploy invocation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A mod written into the target directory.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeployedMod {
    /// Logical extension name
    pub name: String,
    /// Resolved source archive
    pub source: PathBuf,
    /// File written in the target directory
    pub destination: PathBuf,
    /// Size of the written file in bytes
    pub size: u64,
    /// Hex-encoded SHA-256 of the written file
    pub sha256: String,
}

/// A previously deployed archive removed because a mod with the same logical
/// name is being deployed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RemovedMod {
    /// Logical extension name
    pub name: String,
    /// Removed file
    pub path: PathBuf,
}

/// Why a resolved source was not deployed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Path does not exist on disk
    Missing,
    /// Archive has no `extension.json`
    NotAMod,
    /// Archive or manifest could not be read
    InvalidManifest(String),
}

/// A resolved source that was not deployed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SkippedSource {
    /// Resolved source path
    pub path: PathBuf,
    /// Reason it was left out
    pub reason: SkipReason,
}

/// Step of the deploy in which an item failed.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Listing the target directory
    Scan,
    /// Deleting a stale or existing file
    Remove,
    /// Copying or remapping a mod
    Transform,
    /// Hashing the written file
    Checksum,
}

/// A per-item failure. The deploy continued past it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModFailure {
    /// Path the failing operation acted on
    pub path: PathBuf,
    /// Deploy step
    pub stage: FailureStage,
    /// Error message
    pub message: String,
}

/// Everything one deploy did, in order of occurrence.
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    /// Synchronized directory
    pub target_dir: PathBuf,
    /// Transform used for writing mods
    pub transform: String,
    /// Whether the run only planned and touched nothing
    pub dry_run: bool,
    /// Mods written
    pub deployed: Vec<DeployedMod>,
    /// Stale deployments deleted
    pub removed: Vec<RemovedMod>,
    /// Sources left out
    pub skipped: Vec<SkippedSource>,
    /// Per-item failures
    pub failures: Vec<ModFailure>,
    /// Completion time
    pub finished_at: Option<DateTime<Utc>>,
}

impl DeployReport {
    pub(crate) fn new(target_dir: &Path, transform: &str, dry_run: bool) -> Self {
        Self {
            target_dir: target_dir.to_path_buf(),
            transform: transform.to_string(),
            dry_run,
            deployed: Vec::new(),
            removed: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
            finished_at: None,
        }
    }

    pub(crate) fn fail(&mut self, path: &Path, stage: FailureStage, message: impl ToString) {
        let message = message.to_string();
        log::warn!("{:?} failed for {}: {}", stage, path.display(), message);
        self.failures.push(ModFailure {
            path: path.to_path_buf(),
            stage,
            message,
        });
    }

    pub(crate) fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    /// Whether every item succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Logical names of the deployed mods, in deploy order.
    pub fn deployed_names(&self) -> Vec<&str> {
        self.deployed.iter().map(|m| m.name.as_str()).collect()
    }

    /// Writes the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> crate::error::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}
