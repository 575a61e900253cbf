//! HTTP `Range` header parsing for single-range byte requests.
//!
//! Only the first `start-end` pair is considered. An empty start is read as
//! `0` and an empty end as the last byte of the file, so `bytes=-500` means
//! bytes `0..=500`, not the last 500 bytes.

use serde::Serialize;

/// Inclusive byte interval, `start <= end < file_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered by the range.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Always false: a valid range covers at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value for the `Content-Range` header of a 206 response.
    pub fn content_range(&self, file_size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, file_size)
    }
}

/// Outcome of interpreting a `Range` header against a file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRequest {
    /// No usable range: serve the whole file.
    Full,
    /// Serve the given slice.
    Partial(ByteRange),
    /// The header asked for something the file cannot provide.
    NotSatisfiable,
}

/// Parse a `Range` header value.
///
/// - absent header, or a header without `=`, yields [`RangeRequest::Full`]
/// - a unit other than `bytes` yields [`RangeRequest::NotSatisfiable`]
/// - non-numeric bounds, `start > end` and `start >= file_size` are not satisfiable
/// - the range token is exactly `start-end`: multiple ranges (`0-1,5-9`) and
///   extra dash-separated parts (`0-10-20`) leave a non-numeric end and are
///   not satisfiable
/// - `end` is clamped to `file_size - 1`
pub fn parse_range(header: Option<&str>, file_size: u64) -> RangeRequest {
    let Some(header) = header else {
        return RangeRequest::Full;
    };

    let Some((unit, spec)) = header.split_once('=') else {
        return RangeRequest::Full;
    };

    if unit.trim() != "bytes" {
        return RangeRequest::NotSatisfiable;
    }

    let (start_str, end_str) = match spec.split_once('-') {
        Some((start, end)) => (start.trim(), Some(end.trim())),
        None => (spec.trim(), None),
    };

    let start = if start_str.is_empty() {
        0
    } else {
        match start_str.parse::<u64>() {
            Ok(v) => v,
            Err(_) => return RangeRequest::NotSatisfiable,
        }
    };

    if start >= file_size {
        return RangeRequest::NotSatisfiable;
    }

    let last_byte = file_size - 1;
    let end = match end_str {
        Some(s) if !s.is_empty() => match s.parse::<u64>() {
            Ok(v) => v,
            Err(_) => return RangeRequest::NotSatisfiable,
        },
        _ => last_byte,
    };

    if start > end {
        return RangeRequest::NotSatisfiable;
    }

    RangeRequest::Partial(ByteRange {
        start,
        end: end.min(last_byte),
    })
}
