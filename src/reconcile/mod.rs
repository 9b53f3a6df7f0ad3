//! Download reconciliation: decide per variant whether the local copy is
//! good, and fetch it with resumable transfers when it is not.
//!
//! # Overview
//!
//! - `reconciler` - [`Reconciler`] and [`FetchJob`], assessment and transfer logic
//! - `builder` - [`ReconcilerBuilder`] for configuring a reconciler
//! - `config` - Configuration structure and callback type
//! - `state` - [`VariantState`], the outcome of assessing a local file
//!
//! # Examples
//!
//! ```rust
//! use bundlesync::cache::HashCache;
//! use bundlesync::reconcile::ReconcilerBuilder;
//!
//! let reconciler = ReconcilerBuilder::hidden()
//!     .cache(HashCache::new("library", "library/json"))
//!     .on_complete(|summary| println!("{:?}", summary.status()))
//!     .build();
//! ```

pub mod builder;
pub mod config;
pub mod reconciler;
pub mod state;

pub use builder::ReconcilerBuilder;
pub use config::{ReconcileCallback, ReconcilerConfig};
pub use reconciler::{FetchJob, Reconciler};
pub use state::VariantState;
