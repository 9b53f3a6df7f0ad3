//! Content digests for files at rest.
//!
//! The storefront announces an MD5 for every file. Local files are hashed in
//! fixed-size blocks so memory use stays flat no matter how large the file
//! is.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bundlesync::download::hash::digest_file;
//! use std::path::Path;
//!
//! let d = digest_file(Path::new("foo/foo-1.2_amd64.tar.gz"))?;
//! println!("{} bytes, md5 {}", d.size, d.digest);
//! # Ok::<(), bundlesync::Error>(())
//! ```

use crate::error::Result;

use md5::{Digest, Md5};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Block size used when streaming a file through the hasher.
pub const HASH_BLOCK_SIZE: usize = 8 * 1024 * 1024;

/// Digest of a file together with the number of bytes read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest {
    /// Lowercase hex MD5.
    pub digest: String,
    /// Bytes fed through the hasher.
    pub size: u64,
}

/// Stream a file through MD5.
pub fn digest_file(path: &Path) -> Result<FileDigest> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; HASH_BLOCK_SIZE];
    let mut size = 0u64;

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        size += n as u64;
    }

    Ok(FileDigest {
        digest: hex::encode(hasher.finalize()),
        size,
    })
}

/// Hex MD5 of a file.
pub fn hash_file(path: &Path) -> Result<String> {
    digest_file(path).map(|d| d.digest)
}
