//! Persisted verification records.

use serde::{Deserialize, Serialize};

/// Cached verification result for one file at rest.
///
/// Stored as `{"name": .., "size": .., "md5": ..}` so existing metadata
/// trees stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFileRecord {
    /// File name, without directory.
    pub name: String,
    /// Size in bytes at the time the record was written.
    pub size: u64,
    /// Lowercase hex MD5.
    #[serde(rename = "md5")]
    pub digest: String,
}

impl LocalFileRecord {
    /// Create a new record.
    pub fn new(name: impl Into<String>, size: u64, digest: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            digest: digest.into(),
        }
    }
}
