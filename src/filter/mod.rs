//! Platform filters.
//!
//! A product usually offers several equivalent files per platform: 32 and
//! 64-bit builds, a tarball next to a `.deb`, MP3 next to FLAC. Every
//! [`Platform`] owns one filter that keeps only the preferred ones. Names go
//! through [`normalize_name`] first so the filters see a stable vocabulary.
//!
//! # Examples
//!
//! ```rust
//! use bundlesync::filter::Platform;
//! use std::collections::BTreeSet;
//!
//! let names: BTreeSet<String> = ["64-bit .tar.gz", "32-bit .tar.gz", "64-bit .deb"]
//!     .into_iter()
//!     .map(String::from)
//!     .collect();
//! let kept = Platform::Linux.filter(&names);
//! assert_eq!(kept.into_iter().collect::<Vec<_>>(), vec!["64-bit .tar.gz"]);
//! ```

pub mod normalize;
pub mod platform;

pub use normalize::{normalize_name, NAME_RULES};
pub use platform::Platform;
