//! Orchestration of a whole run.
//!
//! ```rust,no_run
//! use bundlesync::http::{HttpClientConfig, Session};
//! use bundlesync::layout::Layout;
//! use bundlesync::reconcile::ReconcilerBuilder;
//! use bundlesync::storefront::{HttpStorefront, DEFAULT_BASE_URL};
//! use bundlesync::sync::Syncer;
//!
//! # async fn example() -> Result<(), bundlesync::Error> {
//! let session = Session::new("token")?;
//! let storefront =
//!     HttpStorefront::with_session(&session, HttpClientConfig::default(), DEFAULT_BASE_URL)?;
//! let reconciler = ReconcilerBuilder::new().session(&session)?;
//! let syncer = Syncer::new(storefront, Layout::new("library", "library/json"), reconciler);
//!
//! let report = syncer.run().await?;
//! for orphan in &report.orphans {
//!     println!("{}", orphan.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod report;
pub mod syncer;

pub use report::SyncReport;
pub use syncer::{Syncer, MAX_ORDER_WORKERS};
