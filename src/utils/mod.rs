//! Shared utility functions.
//!
//! - [`content_length`] - Remote file size from `Content-Range` and
//!   `Content-Length` headers

pub mod content_length;

pub use content_length::{parse_content_range_start, parse_content_range_total, total_length};
