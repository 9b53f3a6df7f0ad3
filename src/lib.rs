//! bundlesync mirrors the files of a storefront account to a local
//! directory tree and keeps them in sync across runs.
//!
//! Every run enumerates the account's orders, reduces each product's
//! downloads to the preferred variants per platform, and reconciles each
//! variant against the local copy: files that already match by size and
//! digest are left alone, anything else is fetched with a resumable range
//! request. Products whose names differ only by a suffix such as
//! `_soundtrack` share one directory.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use bundlesync::{HttpClientConfig, HttpStorefront, Layout, ReconcilerBuilder, Session, Syncer};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), bundlesync::Error> {
//! let session = Session::from_token_file("login-token".as_ref())?;
//! let storefront = HttpStorefront::with_session(
//!     &session,
//!     HttpClientConfig::default(),
//!     bundlesync::storefront::DEFAULT_BASE_URL,
//! )?;
//! let syncer = Syncer::new(
//!     storefront,
//!     Layout::new("library", "library/json"),
//!     ReconcilerBuilder::new().session(&session)?,
//! );
//! let report = syncer.run().await?;
//! println!("{} fetched, {} orphans", report.done(), report.orphans.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`cache`] - Digest records for files at rest
//! - [`catalog`] - Order documents turned into products and variants
//! - [`download`] - Remote variants, file digests and per-variant summaries
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`filter`] - Per-platform variant selection and name normalisation
//! - [`http`] - HTTP client construction and the session credential
//! - [`layout`] - Directory layout, product aliases and orphan detection
//! - [`progress`] - Progress bars and transfer accounting
//! - [`reconcile`] - Assessment and resumable transfers
//! - [`storefront`] - Source of bundle keys and order documents
//! - [`sync`] - A whole run from catalog to orphan report
//! - [`utils`] - Shared utility functions

pub mod cache;
pub mod catalog;
pub mod download;
pub mod error;
pub mod filter;
pub mod http;
pub mod layout;
pub mod progress;
pub mod reconcile;
pub mod storefront;
pub mod sync;
pub mod utils;

pub use cache::{HashCache, LocalFileRecord};
pub use catalog::{Catalog, CatalogBuilder, Product};
pub use download::{RemoteVariant, Status, Summary};
pub use error::{Error, Result};
pub use filter::Platform;
pub use http::{create_http_client, HttpClientConfig, Session};
pub use layout::{AliasMode, Layout};
pub use progress::{ProgressBarOpts, StyleOptions};
pub use reconcile::{FetchJob, Reconciler, ReconcilerBuilder, VariantState};
pub use storefront::{CachedStorefront, HttpStorefront, Storefront};
pub use sync::{SyncReport, Syncer};
