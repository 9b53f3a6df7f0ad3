//! Content length extraction utilities.
//!
//! A resumed transfer asks for `bytes=L-`. A server honouring the range
//! answers 206 with `Content-Range: bytes L-E/T`; one ignoring it answers
//! 200 with the whole body and a plain `Content-Length`.

use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_RANGE};
use reqwest::StatusCode;

/// Full size of the remote file as announced by a response.
///
/// For `206 Partial Content` this is the total after the slash in
/// `Content-Range`; for anything else it is `Content-Length`.
///
/// # Example
///
/// ```rust
/// use bundlesync::utils::total_length;
/// use reqwest::header::{HeaderMap, HeaderValue, CONTENT_RANGE};
/// use reqwest::StatusCode;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(CONTENT_RANGE, HeaderValue::from_static("bytes 512-1023/1024"));
/// assert_eq!(total_length(StatusCode::PARTIAL_CONTENT, &headers), Some(1024));
/// ```
pub fn total_length(status: StatusCode, headers: &HeaderMap) -> Option<u64> {
    if status == StatusCode::PARTIAL_CONTENT {
        headers
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
    } else {
        headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
    }
}

/// Parse Content-Range header to extract total size.
///
/// Content-Range header format: "bytes start-end/total"
///
/// # Example
///
/// ```rust
/// use bundlesync::utils::parse_content_range_total;
///
/// let total = parse_content_range_total("bytes 0-1023/2048");
/// assert_eq!(total, Some(2048));
/// ```
pub fn parse_content_range_total(content_range: &str) -> Option<u64> {
    content_range
        .split('/')
        .nth(1)
        .and_then(|size| size.trim().parse::<u64>().ok())
}

/// Parse the first byte position out of a Content-Range header.
///
/// ```rust
/// use bundlesync::utils::parse_content_range_start;
///
/// assert_eq!(parse_content_range_start("bytes 200-1023/5000"), Some(200));
/// ```
pub fn parse_content_range_start(content_range: &str) -> Option<u64> {
    content_range
        .trim()
        .strip_prefix("bytes")?
        .trim_start()
        .split('-')
        .next()
        .and_then(|start| start.trim().parse::<u64>().ok())
}
