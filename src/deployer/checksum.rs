//! Deployed archive checksum calculation.

use crate::deployer::{Result, error::ErrorExt};
use sha2::{Digest, Sha256};
use std::{fs::File, io::Read, path::Path};

/// Calculates the SHA-256 checksum of a file.
///
/// Reads the file in 8KB chunks and returns the hex-encoded digest
/// (64 characters).
pub fn calculate_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path).fs_context("opening file for hashing", path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("abc.bin");
        std::fs::write(&path, b"abc").unwrap();

        assert_eq!(
            calculate_sha256(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_missing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(calculate_sha256(&tmp.path().join("nope")).is_err());
    }
}
