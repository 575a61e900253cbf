//! Streaming download into an atomically published file.

use futures::StreamExt;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

use super::error::DownloadError;
use super::ByteStream;
use crate::metrics::{DOWNLOADS_TOTAL, DOWNLOAD_BYTES};

const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// A file that has been published at its destination.
#[derive(Debug, Clone, Serialize)]
pub struct MaterializedFile {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub sha256: String,
}

/// Streams a remote artifact into a `.part` sibling, syncs it and renames it
/// over the destination.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    chunk_size: usize,
}

impl AtomicFileWriter {
    /// Creates a writer that buffers up to `chunk_size` bytes before writing.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Creates a writer with a 1 MiB buffer.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Temporary path used while `destination` is being written.
    pub fn temp_path_for(destination: &Path) -> PathBuf {
        let mut name = OsString::from(destination.as_os_str());
        name.push(".part");
        PathBuf::from(name)
    }

    /// Downloads `stream` and publishes it at `destination`.
    ///
    /// On failure the temporary file is removed and whatever was published at
    /// `destination` before is left untouched.
    pub async fn materialize(
        &self,
        stream: ByteStream,
        destination: &Path,
    ) -> Result<MaterializedFile, DownloadError> {
        let temp_path = Self::temp_path_for(destination);

        let result = self.write_and_publish(stream, &temp_path, destination).await;
        match &result {
            Ok(file) => {
                DOWNLOADS_TOTAL.with_label_values(&["published"]).inc();
                DOWNLOAD_BYTES.inc_by(file.size_bytes);
                info!(
                    path = %file.path.display(),
                    size_bytes = file.size_bytes,
                    sha256 = %file.sha256,
                    "Published video"
                );
            }
            Err(e) => {
                DOWNLOADS_TOTAL.with_label_values(&["failed"]).inc();
                if let Err(cleanup) = fs::remove_file(&temp_path).await {
                    if cleanup.kind() != std::io::ErrorKind::NotFound {
                        warn!(
                            "Failed to remove temporary file {}: {}",
                            temp_path.display(),
                            cleanup
                        );
                    }
                }
                warn!(error = %e, "Download failed, published file left untouched");
            }
        }
        result
    }

    async fn write_and_publish(
        &self,
        stream: ByteStream,
        temp_path: &Path,
        destination: &Path,
    ) -> Result<MaterializedFile, DownloadError> {
        Self::ensure_parent_dir(destination).await?;

        let (size_bytes, sha256) = self.write_temp(stream, temp_path).await?;

        fs::rename(temp_path, destination)
            .await
            .map_err(|e| DownloadError::PublishFailed {
                source_path: temp_path.to_path_buf(),
                destination: destination.to_path_buf(),
                source: e,
            })?;

        Self::sync_parent_dir(destination).await;

        Ok(MaterializedFile {
            path: destination.to_path_buf(),
            size_bytes,
            sha256,
        })
    }

    /// Writes the whole stream to `temp_path` and forces it to storage.
    async fn write_temp(
        &self,
        mut stream: ByteStream,
        temp_path: &Path,
    ) -> Result<(u64, String), DownloadError> {
        let file = File::create(temp_path)
            .await
            .map_err(|e| DownloadError::write_failed(temp_path, e))?;
        let mut writer = BufWriter::with_capacity(self.chunk_size, file);
        let mut hasher = Sha256::new();
        let mut total_bytes = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if chunk.is_empty() {
                continue;
            }
            hasher.update(&chunk);
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| DownloadError::write_failed(temp_path, e))?;
            total_bytes += chunk.len() as u64;
        }

        writer
            .flush()
            .await
            .map_err(|e| DownloadError::write_failed(temp_path, e))?;

        let file = writer.into_inner();
        file.sync_all()
            .await
            .map_err(|e| DownloadError::write_failed(temp_path, e))?;
        drop(file);

        debug!(
            path = %temp_path.display(),
            bytes = total_bytes,
            "Temporary file synced"
        );

        Ok((total_bytes, format!("{:x}", hasher.finalize())))
    }

    async fn ensure_parent_dir(destination: &Path) -> Result<(), DownloadError> {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    DownloadError::DirectoryCreationFailed {
                        path: parent.to_path_buf(),
                        source: e,
                    }
                })?;
            }
        }
        Ok(())
    }

    /// Persists the rename itself. Failure only weakens crash durability.
    #[cfg(unix)]
    async fn sync_parent_dir(destination: &Path) {
        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        match File::open(&parent).await {
            Ok(dir) => {
                if let Err(e) = dir.sync_all().await {
                    debug!("Failed to sync directory {}: {}", parent.display(), e);
                }
            }
            Err(e) => debug!("Failed to open directory {}: {}", parent.display(), e),
        }
    }

    #[cfg(not(unix))]
    async fn sync_parent_dir(_destination: &Path) {}
}

impl Default for AtomicFileWriter {
    fn default() -> Self {
        Self::with_defaults()
    }
}
