//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use zip::write::SimpleFileOptions;

/// Writes a zip archive with the given entries, in order.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (name, data) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

/// Writes a mod archive with logical name `name` and a payload marking its content.
pub fn write_mod(path: &Path, name: &str, payload: &str) -> PathBuf {
    let manifest = format!(r#"{{"name": "{name}", "version": "1.0"}}"#);
    write_zip(
        path,
        &[
            ("payload.txt", payload.as_bytes()),
            ("extension.json", manifest.as_bytes()),
        ],
    );
    path.to_path_buf()
}

/// Reads one entry of a zip archive as a string.
pub fn read_entry(path: &Path, entry: &str) -> String {
    use std::io::Read;
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut file = archive.by_name(entry).unwrap();
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    out
}

/// Sorted file names directly inside `dir` (directories marked with a trailing `/`).
pub fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| {
            let e = e.unwrap();
            let name = e.file_name().to_string_lossy().into_owned();
            if e.file_type().unwrap().is_dir() {
                format!("{name}/")
            } else {
                name
            }
        })
        .collect();
    names.sort();
    names
}

/// Writes a single-entry stored archive whose zip64 extra field declares
/// `declared_size` uncompressed bytes while only `data` is present.
///
/// The CRC is left at zero, so a reader that gets to the end of the entry
/// reports a checksum error.
pub fn write_oversized_entry(path: &Path, name: &str, data: &[u8], declared_size: u64) {
    fn u16le(out: &mut Vec<u8>, v: u16) {
        out.extend_from_slice(&v.to_le_bytes());
    }
    fn u32le(out: &mut Vec<u8>, v: u32) {
        out.extend_from_slice(&v.to_le_bytes());
    }

    let mut zip64_extra = Vec::new();
    u16le(&mut zip64_extra, 0x0001);
    u16le(&mut zip64_extra, 16);
    zip64_extra.extend_from_slice(&declared_size.to_le_bytes());
    zip64_extra.extend_from_slice(&(data.len() as u64).to_le_bytes());

    let mut out = Vec::new();
    // Local file header
    u32le(&mut out, 0x0403_4b50);
    u16le(&mut out, 45);
    u16le(&mut out, 0);
    u16le(&mut out, 0);
    u16le(&mut out, 0);
    u16le(&mut out, 0x21);
    u32le(&mut out, 0);
    u32le(&mut out, u32::MAX);
    u32le(&mut out, u32::MAX);
    u16le(&mut out, name.len() as u16);
    u16le(&mut out, zip64_extra.len() as u16);
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(&zip64_extra);
    out.extend_from_slice(data);

    // Central directory
    let cd_offset = out.len() as u32;
    u32le(&mut out, 0x0201_4b50);
    u16le(&mut out, 45);
    u16le(&mut out, 45);
    u16le(&mut out, 0);
    u16le(&mut out, 0);
    u16le(&mut out, 0);
    u16le(&mut out, 0x21);
    u32le(&mut out, 0);
    u32le(&mut out, u32::MAX);
    u32le(&mut out, u32::MAX);
    u16le(&mut out, name.len() as u16);
    u16le(&mut out, zip64_extra.len() as u16);
    u16le(&mut out, 0);
    u16le(&mut out, 0);
    u16le(&mut out, 0);
    u32le(&mut out, 0);
    u32le(&mut out, 0);
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(&zip64_extra);
    let cd_size = out.len() as u32 - cd_offset;

    // End of central directory
    u32le(&mut out, 0x0605_4b50);
    u16le(&mut out, 0);
    u16le(&mut out, 0);
    u16le(&mut out, 1);
    u16le(&mut out, 1);
    u32le(&mut out, cd_size);
    u32le(&mut out, cd_offset);
    u16le(&mut out, 0);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, out).unwrap();
}
