//! Extension manifest lookup inside mod archives.
//!
//! A mod archive is any zip container carrying an `extension.json` entry at its
//! root. The only field consumed is the logical extension `name`, which is the
//! key used to replace older deployments of the same mod.

use serde::Deserialize;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};
use thiserror::Error;

/// Entry name of the extension manifest.
pub const MANIFEST_ENTRY: &str = "extension.json";

/// Largest `extension.json` read, in bytes. Larger manifests are rejected.
pub const MAX_MANIFEST_SIZE: u64 = 1024 * 1024;

/// The part of `extension.json` the deployer cares about.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ExtensionManifest {
    /// Logical extension name.
    pub name: String,
}

/// Failure to read a manifest out of an archive.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The archive could not be opened or read.
    #[error("failed to read archive: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a readable zip container.
    #[error("not a readable zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The manifest holds more than [`MAX_MANIFEST_SIZE`] bytes.
    #[error("{MANIFEST_ENTRY} exceeds {limit} bytes")]
    TooLarge {
        /// Size limit in bytes
        limit: u64,
    },

    /// The manifest bytes are not UTF-8.
    #[error("{MANIFEST_ENTRY} is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The manifest is not JSON or lacks a string `name`.
    #[error("{MANIFEST_ENTRY} is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads the manifest of the archive at `path`.
///
/// Entries are scanned in stored order and the first one named exactly
/// `extension.json` wins, wherever it sits in the archive. Returns `Ok(None)`
/// when the archive has no such entry.
pub fn read_manifest(path: &Path) -> Result<Option<ExtensionManifest>, ManifestError> {
    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(BufReader::new(file))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.name() != MANIFEST_ENTRY {
            continue;
        }

        // The declared size comes from the archive header and is not trusted
        let mut bytes = Vec::new();
        (&mut entry)
            .take(MAX_MANIFEST_SIZE + 1)
            .read_to_end(&mut bytes)?;
        if bytes.len() as u64 > MAX_MANIFEST_SIZE {
            return Err(ManifestError::TooLarge {
                limit: MAX_MANIFEST_SIZE,
            });
        }
        let text = String::from_utf8(bytes)?;
        let manifest: ExtensionManifest = serde_json::from_str(&text)?;
        return Ok(Some(manifest));
    }

    Ok(None)
}

/// Reads the logical extension name of the archive at `path`.
pub fn read_extension_name(path: &Path) -> Result<Option<String>, ManifestError> {
    Ok(read_manifest(path)?.map(|manifest| manifest.name))
}
