//! Extension directory synchronization.
//!
//! This module provides the [`Deployer`] that brings a target directory in line
//! with a list of resolved mod archives.

use super::{
    ArchiveTransformer, CopyTransformer,
    checksum::calculate_sha256,
    manifest::read_extension_name,
    report::{DeployReport, DeployedMod, FailureStage, RemovedMod, SkipReason, SkippedSource},
    utils::fs::{create_dir_all_best_effort, list_files, remove_file_if_exists},
};
use std::{
    collections::HashSet,
    fmt,
    path::{Path, PathBuf},
};

/// File name used when a source path has no final segment.
pub const FALLBACK_FILE_NAME: &str = "extension.jar";

/// Suffix of files in the target directory considered deployed mods.
pub const ARCHIVE_SUFFIX: &str = ".jar";

/// A source archive with a readable manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModCandidate {
    /// Resolved source path
    pub path: PathBuf,
    /// Logical extension name
    pub name: String,
    /// Where the mod will be written
    pub destination: PathBuf,
}

/// What a deploy would do, computed without touching the target directory.
#[derive(Debug)]
pub struct DeployPlan {
    /// Mods to write, in source order
    pub mods: Vec<ModCandidate>,
    /// Deployed files holding a name that is about to be redeployed
    pub stale: Vec<RemovedMod>,
    report: DeployReport,
}

/// Synchronizes a target directory so it holds exactly one archive per logical
/// extension name among the deployed mods.
///
/// # Algorithm
///
/// 1. Read the manifest name of every existing source; drop the rest
/// 2. Delete `.jar` files directly in the target directory whose manifest name
///    is being deployed, whatever their file name
/// 3. Write each mod to `<target>/<source file name>` through the configured
///    [`ArchiveTransformer`], deleting any file already there first
///
/// Per-item failures are logged, recorded in the [`DeployReport`] and the run
/// continues.
///
/// # Examples
///
/// ```no_run
/// use mod_deployer::deployer::Deployer;
/// use std::path::PathBuf;
///
/// let deployer = Deployer::new("run/mods");
/// let report = deployer.deploy(&[PathBuf::from("build/libs/my-mod.jar")]);
/// for deployed in &report.deployed {
///     println!("{} -> {}", deployed.name, deployed.destination.display());
/// }
/// ```
pub struct Deployer {
    target_dir: PathBuf,
    transformer: Box<dyn ArchiveTransformer>,
}

impl fmt::Debug for Deployer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deployer")
            .field("target_dir", &self.target_dir)
            .field("transformer", &self.transformer.describe())
            .finish()
    }
}

impl Deployer {
    /// Creates a deployer that copies mods into `target_dir`.
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            transformer: Box::new(CopyTransformer),
        }
    }

    /// Replaces the transform used to write mods.
    pub fn with_transformer(mut self, transformer: Box<dyn ArchiveTransformer>) -> Self {
        self.transformer = transformer;
        self
    }

    /// Returns the synchronized directory.
    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Destination of a source archive inside the target directory.
    pub fn destination_for(&self, source: &Path) -> PathBuf {
        match source.file_name() {
            Some(name) => self.target_dir.join(name),
            None => self.target_dir.join(FALLBACK_FILE_NAME),
        }
    }

    /// Computes which mods would be written and which files removed.
    ///
    /// Reads archives only; the target directory is not created or modified.
    pub fn plan(&self, sources: &[PathBuf]) -> DeployPlan {
        let mut report = DeployReport::new(&self.target_dir, self.transformer.describe(), true);
        let (mods, names) = self.collect_mods(sources, &mut report);
        let stale = self.find_stale(&names, &mut report);
        DeployPlan {
            mods,
            stale,
            report,
        }
    }

    /// Runs the synchronization.
    pub fn deploy(&self, sources: &[PathBuf]) -> DeployReport {
        create_dir_all_best_effort(&self.target_dir);

        let plan = self.plan(sources);
        let mut report = plan.report;
        report.dry_run = false;

        for stale in plan.stale {
            match remove_file_if_exists(&stale.path) {
                Ok(_) => {
                    log::info!("Removed older copy of {}: {}", stale.name, stale.path.display());
                    report.removed.push(stale);
                }
                Err(e) => report.fail(&stale.path, FailureStage::Remove, e),
            }
        }

        for candidate in plan.mods {
            self.install(candidate, &mut report);
        }

        log::info!(
            "Deployed {} mod(s) into {} ({} removed, {} skipped, {} failed)",
            report.deployed.len(),
            self.target_dir.display(),
            report.removed.len(),
            report.skipped.len(),
            report.failures.len()
        );
        report.finish()
    }

    /// Step 1: keep the sources that are mods.
    fn collect_mods(
        &self,
        sources: &[PathBuf],
        report: &mut DeployReport,
    ) -> (Vec<ModCandidate>, HashSet<String>) {
        let mut mods = Vec::new();
        let mut names = HashSet::new();

        for path in sources {
            if !path.exists() {
                log::debug!("Skipping missing source {}", path.display());
                report.skipped.push(SkippedSource {
                    path: path.clone(),
                    reason: SkipReason::Missing,
                });
                continue;
            }

            match read_extension_name(path) {
                Ok(Some(name)) => {
                    log::debug!("Found mod '{}' at {}", name, path.display());
                    names.insert(name.clone());
                    mods.push(ModCandidate {
                        path: path.clone(),
                        name,
                        destination: self.destination_for(path),
                    });
                }
                Ok(None) => {
                    log::debug!("{} has no extension manifest", path.display());
                    report.skipped.push(SkippedSource {
                        path: path.clone(),
                        reason: SkipReason::NotAMod,
                    });
                }
                Err(e) => {
                    log::warn!("Ignoring {}: {}", path.display(), e);
                    report.skipped.push(SkippedSource {
                        path: path.clone(),
                        reason: SkipReason::InvalidManifest(e.to_string()),
                    });
                }
            }
        }

        (mods, names)
    }

    /// Step 2: find deployed archives carrying a name about to be redeployed.
    fn find_stale(&self, names: &HashSet<String>, report: &mut DeployReport) -> Vec<RemovedMod> {
        if !self.target_dir.is_dir() {
            return Vec::new();
        }

        let children = match list_files(&self.target_dir) {
            Ok(children) => children,
            Err(e) => {
                report.fail(&self.target_dir, FailureStage::Scan, e);
                return Vec::new();
            }
        };

        let mut stale = Vec::new();
        for child in children {
            let is_archive = child
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(ARCHIVE_SUFFIX));
            if !is_archive {
                continue;
            }

            match read_extension_name(&child) {
                Ok(Some(name)) if names.contains(&name) => {
                    stale.push(RemovedMod { name, path: child });
                }
                Ok(_) => {}
                Err(e) => log::warn!("Leaving {} in place: {}", child.display(), e),
            }
        }
        stale
    }

    /// Step 3: write one mod.
    fn install(&self, candidate: ModCandidate, report: &mut DeployReport) {
        let ModCandidate {
            path,
            name,
            destination,
        } = candidate;

        if let Err(e) = remove_file_if_exists(&destination) {
            report.fail(&destination, FailureStage::Remove, e);
            return;
        }

        if let Err(e) = self.transformer.transform(&path, &destination) {
            report.fail(&path, FailureStage::Transform, e);
            return;
        }

        let size = match std::fs::metadata(&destination) {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                report.fail(&destination, FailureStage::Checksum, e);
                return;
            }
        };
        let sha256 = match calculate_sha256(&destination) {
            Ok(sum) => sum,
            Err(e) => {
                report.fail(&destination, FailureStage::Checksum, e);
                return;
            }
        };

        log::info!("Deployed {} to {}", name, destination.display());
        report.deployed.push(DeployedMod {
            name,
            source: path,
            destination,
            size,
            sha256,
        });
    }
}

impl DeployPlan {
    /// Converts the plan into a dry-run report listing what would happen.
    pub fn into_report(self) -> DeployReport {
        let mut report = self.report;
        report.removed = self.stale;
        report.deployed = self
            .mods
            .into_iter()
            .map(|m| DeployedMod {
                name: m.name,
                source: m.path,
                destination: m.destination,
                size: 0,
                sha256: String::new(),
            })
            .collect();
        report.finish()
    }
}
