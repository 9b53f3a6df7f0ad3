//! Remote file variants.
//!
//! A [`RemoteVariant`] is one fetchable file of a product on a given
//! platform: the `"64-bit .tar.gz"` build, the `"FLAC"` soundtrack, the
//! `"PDF"` ebook. Variants are built by the catalog and never change
//! afterwards.
//!
//! # Examples
//!
//! ```rust
//! use bundlesync::download::RemoteVariant;
//!
//! let variant = RemoteVariant::from_url(
//!     "64-bit .tar.gz",
//!     "https://dl.example.com/foo/foo-1.2_amd64.tar.gz?ttl=123&t=abc",
//!     1024,
//!     "d41d8cd98f00b204e9800998ecf8427e",
//! )?;
//! assert_eq!(variant.filename, "foo-1.2_amd64.tar.gz");
//! # Ok::<(), bundlesync::Error>(())
//! ```

use crate::error::Error;

use reqwest::Url;

/// Represents one file to mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteVariant {
    /// Variant key within its platform, after name normalisation.
    pub name: String,
    /// File name used on disk, taken from the last URL path segment.
    pub filename: String,
    /// Signed download URL.
    pub url: Url,
    /// Size announced by the storefront, in bytes.
    pub expected_size: u64,
    /// Lowercase hex MD5 announced by the storefront.
    pub expected_digest: String,
}

impl RemoteVariant {
    /// Creates a new [`RemoteVariant`] with an explicit file name.
    pub fn new(
        name: &str,
        url: &Url,
        filename: &str,
        expected_size: u64,
        expected_digest: &str,
    ) -> Self {
        Self {
            name: String::from(name),
            filename: String::from(filename),
            url: url.clone(),
            expected_size,
            expected_digest: expected_digest.to_ascii_lowercase(),
        }
    }

    /// Creates a [`RemoteVariant`], deriving the file name from the URL.
    ///
    /// The query string is ignored and the last path segment is
    /// percent-decoded.
    pub fn from_url(
        name: &str,
        url: &str,
        expected_size: u64,
        expected_digest: &str,
    ) -> Result<Self, Error> {
        let url = Url::parse(url)
            .map_err(|e| Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", url, e)))?;
        let filename = filename_from_url(&url)?;
        Ok(Self::new(name, &url, &filename, expected_size, expected_digest))
    }
}

/// Extract the on-disk file name from a download URL.
pub fn filename_from_url(url: &Url) -> Result<String, Error> {
    let segment = url
        .path_segments()
        .ok_or_else(|| {
            Error::InvalidUrl(format!("The url \"{}\" does not contain a valid path", url))
        })?
        .next_back()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            Error::InvalidUrl(format!("The url \"{}\" does not contain a filename", url))
        })?;

    let filename = urlencoding::decode(segment)
        .map_err(|e| {
            Error::InvalidUrl(format!("The url \"{}\" has a non UTF-8 filename: {}", url, e))
        })?
        .into_owned();

    // Names end up joined onto directories; never let one climb out.
    if filename == "." || filename == ".." || filename.contains('/') || filename.contains('\\') {
        return Err(Error::InvalidUrl(format!(
            "The url \"{}\" does not contain a usable filename",
            url
        )));
    }
    Ok(filename)
}
