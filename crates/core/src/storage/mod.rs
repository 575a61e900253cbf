//! Storage for the single published video artifact.
//!
//! The writer and the reader never coordinate through locks. Consistency comes
//! from the publish step: data is streamed into a `.part` sibling, forced to
//! disk, then renamed over the published path. A reader that opens the
//! published path sees either nothing, the previous complete file, or the new
//! complete file.
//!
//! # Example
//!
//! ```ignore
//! use pitwall_core::storage::{AtomicFileWriter, RangeFileServer, VideoBody};
//!
//! let writer = AtomicFileWriter::with_defaults();
//! let published = writer.materialize(stream, Path::new("video.mp4")).await?;
//!
//! let server = RangeFileServer::new("video.mp4");
//! match server.open(Some("bytes=0-99")).await? {
//!     VideoBody::Partial { body, range, file_size } => { /* 206 */ }
//!     _ => {}
//! }
//! ```

mod error;
mod reader;
mod writer;

use bytes::Bytes;
use futures::stream::BoxStream;

pub use error::DownloadError;
pub use reader::{RangeFileServer, VideoBody};
pub use writer::{AtomicFileWriter, MaterializedFile};

/// Chunked body of a remote artifact.
pub type ByteStream = BoxStream<'static, Result<Bytes, DownloadError>>;
