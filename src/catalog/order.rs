//! Storefront order document schema.
//!
//! Only the fields the mirror needs are modelled. Everything is optional at
//! the serde level so that a missing field turns into a precise
//! [`Error::Schema`](crate::Error::Schema) for one product instead of a
//! decode failure for the whole order.

use serde::Deserialize;

/// One order, as returned by `GET /api/v1/order/<key>`.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    /// Raw subproducts, decoded one at a time.
    pub subproducts: Vec<serde_json::Value>,
}

/// A purchased item within an order.
#[derive(Debug, Clone, Deserialize)]
pub struct Subproduct {
    pub machine_name: String,
    pub human_name: String,
    #[serde(default)]
    pub downloads: Vec<DownloadGroup>,
}

/// All files of a subproduct for one platform.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadGroup {
    pub platform: String,
    #[serde(default)]
    pub download_struct: Vec<DownloadStruct>,
}

/// One downloadable file entry.
///
/// Entries without `url` are external links (Steam keys, streaming pages)
/// and are skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadStruct {
    pub name: Option<String>,
    pub url: Option<DownloadUrl>,
    pub file_size: Option<u64>,
    pub md5: Option<String>,
    pub arch: Option<serde_json::Value>,
}

impl DownloadStruct {
    /// Architecture label, whether the API sent it as a string or a number.
    pub fn arch_label(&self) -> Option<String> {
        match self.arch.as_ref()? {
            serde_json::Value::String(s) => Some(s.trim().to_string()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// URLs of a download entry.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadUrl {
    pub web: String,
}
