//! Error types for the Package Manager.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::asset::AssetError;
use crate::codec::CodecError;
use crate::config::format_size;

/// Result type for manager operations.
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Errors that can occur during package operations.
///
/// Stale references (updating or removing a path that is gone) are not
/// errors; those operations log a warning and report `false`.
#[derive(Debug, Error)]
pub enum ManagerError {
    /// Reading or writing the package archive failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Failed to read a file from disk.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write an extracted file.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to create a directory.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Source file exceeds the configured size limit.
    #[error(
        "{} is too large ({}). Maximum allowed size is {}.",
        path.display(),
        format_size(*size),
        format_size(*limit)
    )]
    AssetTooLarge { path: PathBuf, size: u64, limit: u64 },

    /// The asset could not be constructed.
    #[error(transparent)]
    InvalidAsset(#[from] AssetError),

    /// An asset path would escape the extraction directory.
    #[error("refusing to extract '{0}': path escapes the output directory")]
    UnsafePath(String),

    /// A background task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Background(String),
}

impl ManagerError {
    /// Whether the failure is bad archive content rather than an I/O problem.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Codec(e) if e.is_format_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_large_message_carries_both_sizes() {
        let err = ManagerError::AssetTooLarge {
            path: PathBuf::from("big.bin"),
            size: 20,
            limit: 10,
        };
        let message = err.to_string();
        assert!(message.contains("20 B"), "{message}");
        assert!(message.contains("10 B"), "{message}");
    }

    #[test]
    fn test_format_error_classification() {
        let malformed: ManagerError = CodecError::Malformed(io::Error::new(
            io::ErrorKind::InvalidData,
            "bad gzip header",
        ))
        .into();
        assert!(malformed.is_format_error());

        let missing: ManagerError = CodecError::Io {
            path: PathBuf::from("missing.unitypackage"),
            source: io::Error::from(io::ErrorKind::NotFound),
        }
        .into();
        assert!(!missing.is_format_error());
        assert!(!ManagerError::UnsafePath("../x".into()).is_format_error());
    }
}
