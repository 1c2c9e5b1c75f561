//! Reading and writing the `.unitypackage` archive format.
//!
//! A Unity package is a gzip-compressed POSIX tar stream. Every asset lives
//! under a directory named after its GUID:
//!
//! ```text
//! e8c5a5e3a3e2c4b4f8d9a8c7b6a5e4d3/
//! e8c5a5e3a3e2c4b4f8d9a8c7b6a5e4d3/pathname      UTF-8 asset path
//! e8c5a5e3a3e2c4b4f8d9a8c7b6a5e4d3/asset         content (absent for folders)
//! e8c5a5e3a3e2c4b4f8d9a8c7b6a5e4d3/asset.meta    .meta sidecar
//! e8c5a5e3a3e2c4b4f8d9a8c7b6a5e4d3/preview.png   optional thumbnail
//! ```
//!
//! Decoding happens in two steps: [`decode`] turns the byte stream into a
//! [`RawPackage`] (GUID → member bytes), and [`RawPackage::into_assets`]
//! turns that into [`UnityAsset`](crate::asset::UnityAsset) values, dropping
//! GUIDs that cannot be addressed. [`encode`] writes assets back out;
//! [`write_package`] does so through a temporary file that replaces the
//! destination only once the archive is complete.

mod member;
mod pathname;
mod reader;
mod writer;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use member::Member;
pub use pathname::{clean_entry_name, clean_pathname};
pub use reader::{decode, read_package, RawBundle, RawPackage};
pub use writer::{encode, write_package};

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors produced while reading or writing package archives.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The gzip or tar stream is corrupt or truncated.
    #[error("malformed package archive: {0}")]
    Malformed(#[source] io::Error),

    /// A file could not be opened, created, written or renamed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the archive stream failed.
    #[error("failed to write package archive: {0}")]
    Write(#[source] io::Error),
}

impl CodecError {
    /// Whether this error describes bad archive content rather than an
    /// environment failure.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CodecError::Io {
            path: PathBuf::from("/tmp/a.unitypackage"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.to_string(), "I/O error on /tmp/a.unitypackage: missing");
        assert!(!err.is_format_error());
    }

    #[test]
    fn test_malformed_is_format_error() {
        let err = CodecError::Malformed(io::Error::new(io::ErrorKind::InvalidData, "bad"));
        assert!(err.is_format_error());
        assert!(err.to_string().starts_with("malformed package archive"));
    }
}
