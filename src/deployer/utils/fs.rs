//! File system utilities for deploying.
//!
//! Thin wrappers over `std::fs` that make the idempotent cases (already exists,
//! already gone) succeed quietly.

use crate::deployer::{Result, error::ErrorExt};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Creates the directory and all of its parents, ignoring failures.
///
/// Returns whether the directory exists afterwards. A failure here surfaces
/// later as a write error against the missing directory.
pub fn create_dir_all_best_effort(path: &Path) -> bool {
    if path.is_dir() {
        return true;
    }
    match fs::create_dir_all(path) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("Could not create {}: {}", path.display(), e);
            false
        }
    }
}

/// Removes a file if it exists.
///
/// Returns `true` when a file was removed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false), // Idempotent
        Err(e) => Err(e).fs_context("removing", path),
    }
}

/// Copies a regular file, replacing the destination if it exists.
///
/// Fails if the source path is a directory or doesn't exist. The destination's
/// parent directory must already exist.
pub fn copy_file_replacing(from: &Path, to: &Path) -> io::Result<u64> {
    if !from.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} is not a file", from.display()),
        ));
    }
    fs::copy(from, to)
}

/// Lists the regular files directly inside `dir`, sorted by file name.
///
/// Subdirectories are skipped and never entered.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).fs_context("reading directory", dir)?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.fs_context("reading directory entry in", dir)?;
        let file_type = entry
            .file_type()
            .fs_context("reading file type of", entry.path())?;
        if file_type.is_dir() {
            continue;
        }
        files.push(entry.path());
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
