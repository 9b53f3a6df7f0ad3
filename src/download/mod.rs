//! Download module containing the per-file building blocks.
//!
//! This module provides the [`RemoteVariant`] describing one fetchable
//! file, MD5 digests of files at rest, and the [`Summary`] reported for
//! every reconciled variant.
//!
//! # Overview
//!
//! - [`variant`] - `RemoteVariant` and file name extraction from URLs
//! - [`summary`] - Per-variant outcome and status reporting
//! - [`hash`] - Streaming MD5 of local files

pub mod hash;
pub mod summary;
pub mod variant;

pub use hash::{digest_file, hash_file, FileDigest};
pub use summary::{Status, Summary};
pub use variant::{filename_from_url, RemoteVariant};
