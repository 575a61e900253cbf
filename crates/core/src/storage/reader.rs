//! Range-aware access to the published video.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, Take};

use crate::range::{parse_range, ByteRange, RangeRequest};

/// What to send back for a request against the published file.
///
/// Bodies are limited to exactly the advertised length and own the file
/// handle, so the file is closed once the body is dropped.
#[derive(Debug)]
pub enum VideoBody {
    /// Nothing has been published yet.
    NotFound,
    /// The requested range cannot be served from a file of this size.
    NotSatisfiable { file_size: u64 },
    /// The whole file.
    Full { body: Take<File>, file_size: u64 },
    /// A slice of the file starting at `range.start`.
    Partial {
        body: Take<File>,
        range: ByteRange,
        file_size: u64,
    },
}

/// Serves the file at a fixed path with byte-range support.
#[derive(Debug, Clone)]
pub struct RangeFileServer {
    path: PathBuf,
}

impl RangeFileServer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the published file and resolves `range_header` against it.
    ///
    /// The size comes from the opened handle, so a publish that happens
    /// between open and read cannot make length and content disagree.
    pub async fn open(&self, range_header: Option<&str>) -> std::io::Result<VideoBody> {
        let mut file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(VideoBody::NotFound),
            Err(e) => return Err(e),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Ok(VideoBody::NotFound);
        }
        let file_size = metadata.len();

        match parse_range(range_header, file_size) {
            RangeRequest::Full => Ok(VideoBody::Full {
                body: file.take(file_size),
                file_size,
            }),
            RangeRequest::NotSatisfiable => Ok(VideoBody::NotSatisfiable { file_size }),
            RangeRequest::Partial(range) => {
                file.seek(SeekFrom::Start(range.start)).await?;
                Ok(VideoBody::Partial {
                    body: file.take(range.len()),
                    range,
                    file_size,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write_sample(dir: &TempDir, len: usize) -> PathBuf {
        let path = dir.path().join("video.mp4");
        let data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
        tokio::fs::write(&path, data).await.unwrap();
        path
    }

    async fn read_all(mut body: Take<File>) -> Vec<u8> {
        let mut out = Vec::new();
        body.read_to_end(&mut out).await.unwrap();
        out
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let server = RangeFileServer::new(temp.path().join("video.mp4"));

        assert!(matches!(server.open(None).await.unwrap(), VideoBody::NotFound));
        assert!(matches!(
            server.open(Some("bytes=0-10")).await.unwrap(),
            VideoBody::NotFound
        ));
    }

    #[tokio::test]
    async fn test_directory_is_not_found() {
        let temp = TempDir::new().unwrap();
        let server = RangeFileServer::new(temp.path());
        assert!(matches!(server.open(None).await.unwrap(), VideoBody::NotFound));
    }

    #[tokio::test]
    async fn test_full_body() {
        let temp = TempDir::new().unwrap();
        let path = write_sample(&temp, 1000).await;
        let server = RangeFileServer::new(&path);

        match server.open(None).await.unwrap() {
            VideoBody::Full { body, file_size } => {
                assert_eq!(file_size, 1000);
                assert_eq!(read_all(body).await, tokio::fs::read(&path).await.unwrap());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_partial_body_has_exact_bytes() {
        let temp = TempDir::new().unwrap();
        let path = write_sample(&temp, 1000).await;
        let expected = tokio::fs::read(&path).await.unwrap();
        let server = RangeFileServer::new(&path);

        match server.open(Some("bytes=100-199")).await.unwrap() {
            VideoBody::Partial {
                body,
                range,
                file_size,
            } => {
                assert_eq!(range, ByteRange { start: 100, end: 199 });
                assert_eq!(file_size, 1000);
                assert_eq!(read_all(body).await, expected[100..200].to_vec());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_clamped_tail() {
        let temp = TempDir::new().unwrap();
        let path = write_sample(&temp, 1000).await;
        let server = RangeFileServer::new(&path);

        match server.open(Some("bytes=990-5000")).await.unwrap() {
            VideoBody::Partial { body, range, .. } => {
                assert_eq!(range.end, 999);
                assert_eq!(read_all(body).await.len(), 10);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unsatisfiable_range() {
        let temp = TempDir::new().unwrap();
        let path = write_sample(&temp, 1000).await;
        let server = RangeFileServer::new(&path);

        assert!(matches!(
            server.open(Some("bytes=2000-3000")).await.unwrap(),
            VideoBody::NotSatisfiable { file_size: 1000 }
        ));
    }

    #[tokio::test]
    async fn test_size_read_fresh_per_request() {
        let temp = TempDir::new().unwrap();
        let path = write_sample(&temp, 10).await;
        let server = RangeFileServer::new(&path);

        assert!(matches!(
            server.open(None).await.unwrap(),
            VideoBody::Full { file_size: 10, .. }
        ));

        tokio::fs::write(&path, vec![0u8; 20]).await.unwrap();
        assert!(matches!(
            server.open(None).await.unwrap(),
            VideoBody::Full { file_size: 20, .. }
        ));
    }
}
