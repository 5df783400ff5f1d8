//! Remapping copy: rewrites a mod archive through a class remapping engine
//! and the registered resource remappers.

use super::{
    ArchiveTransformer,
    mappings::Mappings,
    resources::{ResourceRemapper, default_resource_remappers},
};
use crate::deployer::{
    Error, Result,
    error::{ErrorExt, into_io},
};
use std::{
    collections::HashSet,
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
    process::Command,
};
use zip::{CompressionMethod, write::SimpleFileOptions};

/// Remaps the class files of an archive.
///
/// The engine reads `input` as its only input and writes a complete archive to
/// `output`. Non-class entries must be carried over; the transformer remaps
/// them afterwards.
pub trait RemapEngine: Send + Sync {
    /// Produces the class-remapped archive.
    fn remap_classes(&self, input: &Path, output: &Path) -> io::Result<()>;
}

/// Runs an external remapper program as
/// `<program> <args...> <input> <output> [<mappings>]`.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: PathBuf,
    args: Vec<String>,
    mappings: Option<PathBuf>,
}

impl CommandEngine {
    /// Locates `program` (a path or a name on `PATH`).
    pub fn locate(program: &str, args: Vec<String>, mappings: Option<PathBuf>) -> Result<Self> {
        let program = which::which(program).map_err(|e| {
            Error::GenericError(format!("remapper program '{program}' not found: {e}"))
        })?;
        log::debug!("Using remapper at: {}", program.display());
        Ok(Self {
            program,
            args,
            mappings,
        })
    }

    /// Path of the located program.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl RemapEngine for CommandEngine {
    fn remap_classes(&self, input: &Path, output: &Path) -> io::Result<()> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).arg(input).arg(output);
        if let Some(mappings) = &self.mappings {
            command.arg(mappings);
        }

        let result = command.output()?;
        if !result.status.success() {
            return Err(io::Error::other(format!(
                "{} exited with {:?}: {}",
                self.program.display(),
                result.status.code(),
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }
        if !output.is_file() {
            return Err(io::Error::other(format!(
                "{} did not produce {}",
                self.program.display(),
                output.display()
            )));
        }
        Ok(())
    }
}

/// Scratch space for one transform. Removed when dropped, including on error.
struct RemapWorkspace {
    dir: tempfile::TempDir,
}

impl RemapWorkspace {
    fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("mod-remap-").tempdir()?;
        log::trace!("Acquired remap workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for RemapWorkspace {
    fn drop(&mut self) {
        log::trace!("Releasing remap workspace {}", self.dir.path().display());
    }
}

/// Produces the destination archive by streaming the source through a
/// [`RemapEngine`] and the registered [`ResourceRemapper`]s.
///
/// Without an engine, class files are carried over unchanged and only the
/// resources are remapped.
pub struct RemappingTransformer {
    engine: Option<Box<dyn RemapEngine>>,
    mappings: Mappings,
    resource_remappers: Vec<Box<dyn ResourceRemapper>>,
}

impl RemappingTransformer {
    /// Creates a transformer with the default resource remappers.
    pub fn new(engine: Option<Box<dyn RemapEngine>>, mappings: Mappings) -> Self {
        Self {
            engine,
            mappings,
            resource_remappers: default_resource_remappers(),
        }
    }

    /// Registers an additional resource remapper, consulted after the others.
    pub fn with_resource_remapper(mut self, remapper: Box<dyn ResourceRemapper>) -> Self {
        self.resource_remappers.push(remapper);
        self
    }

    fn remapper_for(&self, entry: &str) -> Option<&dyn ResourceRemapper> {
        self.resource_remappers
            .iter()
            .find(|r| r.applies_to(entry))
            .map(|r| r.as_ref())
    }

    /// Copies `input` into a new archive at `output`, remapping resources.
    fn rewrite(&self, input: &Path, output: &Path) -> Result<()> {
        let file = File::open(input).fs_context("opening archive", input)?;
        let mut archive = zip::ZipArchive::new(BufReader::new(file))?;
        let out = File::create(output).fs_context("creating archive", output)?;
        let mut writer = zip::ZipWriter::new(BufWriter::new(out));
        let mut written = HashSet::new();

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let entry_name = entry.name().to_string();
            let method = match entry.compression() {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let options = SimpleFileOptions::default().compression_method(method);

            if entry.is_dir() {
                if written.insert(entry_name.clone()) {
                    writer.add_directory(entry_name, options)?;
                }
                continue;
            }

            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .fs_context("reading entry of", input)?;

            let (name, data) = match self.remapper_for(&entry_name) {
                Some(remapper) if !entry_name.ends_with(".class") => {
                    log::trace!("Remapping {} with {}", entry_name, remapper.name());
                    let remapped = remapper.remap(&entry_name, &data, &self.mappings)?;
                    (remapped.name, remapped.data)
                }
                _ => (entry_name, data),
            };

            if !written.insert(name.clone()) {
                log::warn!(
                    "Dropping duplicate entry {} while remapping {}",
                    name,
                    input.display()
                );
                continue;
            }
            writer.start_file(name, options)?;
            writer.write_all(&data).fs_context("writing archive", output)?;
        }

        let mut inner = writer.finish()?;
        inner.flush().fs_context("flushing archive", output)?;
        Ok(())
    }

    fn run(&self, source: &Path, destination: &Path) -> Result<()> {
        let workspace = RemapWorkspace::create().fs_context("creating remap workspace", source)?;

        let classes = match &self.engine {
            Some(engine) => {
                let remapped = workspace.path().join("classes.jar");
                engine
                    .remap_classes(source, &remapped)
                    .map_err(|e| Error::GenericError(format!("remapping classes: {e}")))?;
                remapped
            }
            None => source.to_path_buf(),
        };

        self.rewrite(&classes, destination)
    }
}

impl ArchiveTransformer for RemappingTransformer {
    fn describe(&self) -> &'static str {
        "remap"
    }

    fn transform(&self, source: &Path, destination: &Path) -> io::Result<()> {
        log::info!(
            "Remapping {} into {}",
            source.display(),
            destination.display()
        );
        self.run(source, destination).map_err(into_io)
    }
}
