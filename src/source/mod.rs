//! Mod source references and their resolution to archive paths.

use crate::error::{CliError, DeployError, Result};
use path_absolutize::Absolutize;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

/// One reference to mod archives, in whatever shape the build produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModSource {
    /// A published component: every artifact of every nested reference.
    Component(Vec<ModSource>),
    /// A single published artifact file.
    Artifact(PathBuf),
    /// The declared output of an archive-producing task, built or not.
    ArchiveTask {
        destination_dir: PathBuf,
        archive_name: String,
    },
    /// A resolvable dependency set: every file matched by a glob pattern.
    Dependencies { pattern: String },
    /// Any other path-like value.
    Path(PathBuf),
}

fn has_glob_chars(value: &str) -> bool {
    value.contains(['*', '?', '['])
}

impl ModSource {
    /// Parses a source notation.
    ///
    /// - `component:<a>,<b>` - nested notations
    /// - `artifact:<path>`
    /// - `task:<dir>/<archive name>`
    /// - `deps:<glob>`, or any value containing `*`, `?` or `[`
    /// - anything else is a plain path
    ///
    /// A glob-looking value that names an existing file resolves to that file
    /// alone; `artifact:` forces the literal reading.
    pub fn parse(notation: &str) -> Result<Self> {
        let notation = notation.trim();
        if notation.is_empty() {
            return Err(DeployError::Cli(CliError::InvalidArguments {
                reason: "Mod source cannot be empty".to_string(),
            }));
        }

        if let Some(rest) = notation.strip_prefix("component:") {
            let parts = rest
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(Self::parse)
                .collect::<Result<Vec<_>>>()?;
            return Ok(Self::Component(parts));
        }

        if let Some(rest) = notation.strip_prefix("artifact:") {
            return Ok(Self::Artifact(PathBuf::from(rest)));
        }

        if let Some(rest) = notation.strip_prefix("task:") {
            let output = Path::new(rest);
            let archive_name = output
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| {
                    DeployError::Cli(CliError::InvalidArguments {
                        reason: format!("Task output '{rest}' has no archive file name"),
                    })
                })?
                .to_string();
            let destination_dir = output.parent().map(Path::to_path_buf).unwrap_or_default();
            return Ok(Self::ArchiveTask {
                destination_dir,
                archive_name,
            });
        }

        if let Some(rest) = notation.strip_prefix("deps:") {
            return Ok(Self::Dependencies {
                pattern: rest.to_string(),
            });
        }

        if has_glob_chars(notation) {
            return Ok(Self::Dependencies {
                pattern: notation.to_string(),
            });
        }

        Ok(Self::Path(PathBuf::from(notation)))
    }

    /// Resolves this reference to absolute paths, relative ones against `base`.
    ///
    /// Paths are not required to exist, except that a dependency set only
    /// yields the files its pattern currently matches.
    pub fn resolve(&self, base: &Path) -> Result<Vec<PathBuf>> {
        match self {
            Self::Component(parts) => {
                let mut out = Vec::new();
                for part in parts {
                    out.extend(part.resolve(base)?);
                }
                Ok(out)
            }
            Self::Artifact(path) | Self::Path(path) => Ok(vec![absolute(base, path)?]),
            Self::ArchiveTask {
                destination_dir,
                archive_name,
            } => Ok(vec![absolute(base, &destination_dir.join(archive_name))?]),
            Self::Dependencies { pattern } => resolve_pattern(base, pattern),
        }
    }
}

fn absolute(base: &Path, path: &Path) -> Result<PathBuf> {
    Ok(path.absolutize_from(base)?.into_owned())
}

fn resolve_pattern(base: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let literal = absolute(base, Path::new(pattern))?;
    if literal.is_file() {
        log::debug!("'{}' names an existing file, not expanding it", pattern);
        return Ok(vec![literal]);
    }

    let full = if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        let base = base.to_str().ok_or_else(|| {
            DeployError::config(format!(
                "Base directory contains invalid UTF-8: {}",
                base.display()
            ))
        })?;
        // Metacharacters in the base directory name are literal
        Path::new(&glob::Pattern::escape(base))
            .join(pattern)
            .to_string_lossy()
            .into_owned()
    };

    let entries = glob::glob(&full)
        .map_err(|e| DeployError::config(format!("Invalid dependency pattern '{pattern}': {e}")))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(absolute(base, &path)?),
            Ok(_) => {}
            Err(e) => log::warn!("Skipping unreadable match of '{}': {}", pattern, e),
        }
    }
    files.sort();

    if files.is_empty() {
        log::debug!("Dependency pattern '{}' matched no files", pattern);
    }
    Ok(files)
}

/// Ordered collection of mod source references.
///
/// References accumulate through [`add`](Self::add) and resolve, in
/// declaration order, to a list of paths without duplicates (first occurrence
/// wins).
#[derive(Debug, Clone)]
pub struct ModSources {
    base_dir: PathBuf,
    sources: Vec<ModSource>,
}

impl ModSources {
    /// Creates an empty collection resolving relative paths against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            sources: Vec::new(),
        }
    }

    /// Appends one reference.
    pub fn add(&mut self, source: ModSource) -> &mut Self {
        self.sources.push(source);
        self
    }

    /// Appends several references, keeping their order.
    pub fn add_all(&mut self, sources: impl IntoIterator<Item = ModSource>) -> &mut Self {
        self.sources.extend(sources);
        self
    }

    /// Number of references added.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether no reference was added.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Base for relative paths.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolves every reference to an ordered, duplicate-free list of
    /// absolute paths.
    ///
    /// A relative base directory is taken relative to the current directory.
    /// An empty collection resolves to an empty list.
    pub fn paths(&self) -> Result<Vec<PathBuf>> {
        if self.sources.is_empty() {
            log::warn!("No mod sources were added; nothing will be deployed");
        }

        let base = self.base_dir.absolutize()?;
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for source in &self.sources {
            for path in source.resolve(&base)? {
                if seen.insert(path.clone()) {
                    out.push(path);
                }
            }
        }
        Ok(out)
    }
}
