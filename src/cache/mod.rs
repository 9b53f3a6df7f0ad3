//! Hash cache for files at rest.
//!
//! Re-verifying a multi-gigabyte file on every run is the slow part of a
//! mirror. The [`HashCache`] keeps one [`LocalFileRecord`] per mirrored file
//! in a metadata tree that parallels the content tree, so unchanged files
//! are checked by size plus a JSON read.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bundlesync::cache::HashCache;
//! use std::path::Path;
//!
//! let cache = HashCache::new("library", "library/json");
//! let digest = cache.get_or_compute(Path::new("library/foo/foo.tar.gz"), 1000)?;
//! println!("{}", digest);
//! # Ok::<(), bundlesync::Error>(())
//! ```

pub mod hash_cache;
pub mod record;

pub use hash_cache::HashCache;
pub use record::LocalFileRecord;
