//! Error types for the storage module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while downloading and publishing an artifact.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Upstream answered the download request with a non-success status.
    #[error("Upstream returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Network failure while opening or reading the stream.
    #[error("Download stream failed: {0}")]
    Transport(String),

    /// Failed to create the directory that holds the published file.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write or sync the temporary file.
    #[error("Failed to write temporary file {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to rename the temporary file onto the published path.
    #[error("Failed to publish {source_path} as {destination}")]
    PublishFailed {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    pub(crate) fn write_failed(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.to_path_buf(),
            source,
        }
    }
}
