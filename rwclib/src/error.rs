//! Error types for rwclib

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Errors raised while configuring a scan
#[derive(Error, Debug)]
pub enum RwcError {
    /// Extension filter entry that can never match a file name
    #[error("invalid extension '{extension}': {message}")]
    InvalidExtension { extension: String, message: String },
}

/// Coarse classification of a [`ScanError`], convenient for matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanErrorKind {
    NotFound,
    IsDirectory,
    PermissionDenied,
    StreamFailure,
    Other,
}

/// Failure of a single scan unit.
///
/// Each unit turns its own failure into one of these; it is carried inside the
/// unit's result and never aborts the other units of the scan.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The path does not exist
    #[error("{}: file does not exist", .path.display())]
    NotFound { path: PathBuf },

    /// The path names a directory
    #[error("{}: is a directory", .path.display())]
    IsDirectory { path: PathBuf },

    /// The owner-read permission bit is not set, or the OS refused access
    #[error("{}: permission denied", .path.display())]
    PermissionDenied { path: PathBuf },

    /// The stream failed after it was opened; partial counts are discarded
    #[error("{}: read failed: {source}", .path.display())]
    StreamFailure { path: PathBuf, source: io::Error },

    /// Anything else the filesystem reported
    #[error("{}: {source}", .path.display())]
    Other { path: PathBuf, source: io::Error },
}

impl ScanError {
    /// Map an error from `stat`/`open` onto the scan taxonomy.
    pub fn from_io(path: impl Into<PathBuf>, err: io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound => ScanError::NotFound { path },
            io::ErrorKind::PermissionDenied => ScanError::PermissionDenied { path },
            _ => ScanError::Other { path, source: err },
        }
    }

    pub fn kind(&self) -> ScanErrorKind {
        match self {
            ScanError::NotFound { .. } => ScanErrorKind::NotFound,
            ScanError::IsDirectory { .. } => ScanErrorKind::IsDirectory,
            ScanError::PermissionDenied { .. } => ScanErrorKind::PermissionDenied,
            ScanError::StreamFailure { .. } => ScanErrorKind::StreamFailure,
            ScanError::Other { .. } => ScanErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_maps_kinds() {
        let err = ScanError::from_io("a.txt", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.kind(), ScanErrorKind::NotFound);

        let err = ScanError::from_io("a.txt", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(err.kind(), ScanErrorKind::PermissionDenied);

        let err = ScanError::from_io("a.txt", io::Error::other("disk on fire"));
        assert_eq!(err.kind(), ScanErrorKind::Other);
    }

    #[test]
    fn test_display_includes_path() {
        let err = ScanError::IsDirectory {
            path: PathBuf::from("dir1"),
        };
        assert_eq!(err.to_string(), "dir1: is a directory");

        let err = ScanError::NotFound {
            path: PathBuf::from("missing.txt"),
        };
        assert_eq!(err.to_string(), "missing.txt: file does not exist");
    }
}
