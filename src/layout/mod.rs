//! Directory layout of the mirror.
//!
//! Related products share one physical directory named after their
//! [`stem`]: `foo_bundle` and `foo_soundtrack` both live in `foo/`, and each
//! of them gets an alias pointing there. Hash cache records live in a
//! parallel metadata tree, one directory per stem.
//!
//! ```text
//! <root>/foo/foo-1.2.tar.gz
//! <root>/foo/foo-ost-flac.zip
//! <root>/foo_bundle -> foo
//! <root>/foo_soundtrack -> foo
//! <metadata_root>/foo/foo-1.2.tar.gz.json
//! ```

pub mod alias;
pub mod organizer;

pub use alias::AliasManifest;
pub use organizer::{real_path, stem, AliasMode, Layout};
