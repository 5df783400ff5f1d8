//! Error types for the deployer module.

use std::{io, path::PathBuf};
use thiserror::Error as DeriveError;

/// Result type alias for deployer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while synchronizing an extension directory.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// File system operation failed, with the action and path it was acting on.
    #[error("{context} {}: {error}", path.display())]
    Fs {
        /// What was being done
        context: &'static str,
        /// Path being operated on
        path: PathBuf,
        /// Underlying error
        error: io::Error,
    },

    /// Plain I/O error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Zip archive error.
    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    /// Catch-all error carrying a message.
    #[error("{0}")]
    GenericError(String),
}

/// Adds file system context to `io::Result`s.
pub trait ErrorExt<T> {
    /// Attaches the action and path to an I/O error.
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

/// Wraps a deployer error into an `io::Error` so it can cross the
/// [`ArchiveTransformer`](super::ArchiveTransformer) boundary.
pub(crate) fn into_io(err: Error) -> io::Error {
    match err {
        Error::IoError(e) => e,
        Error::Fs {
            context,
            path,
            error,
        } => io::Error::new(
            error.kind(),
            format!("{context} {}: {error}", path.display()),
        ),
        other => io::Error::other(other.to_string()),
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::deployer::Error::GenericError(format!($($arg)*)))
    };
}
