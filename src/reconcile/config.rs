//! Configuration for the reconciler.
//!
//! # Examples
//!
//! ```rust
//! use bundlesync::download::{Status, Summary};
//! use bundlesync::reconcile::ReconcileCallback;
//!
//! let callback: ReconcileCallback = Box::new(|summary: &Summary| {
//!     match summary.status() {
//!         Status::Done => println!("fetched {}", summary.target().display()),
//!         Status::Failed(msg) => println!("failed {}: {}", summary.target().display(), msg),
//!         _ => {}
//!     }
//! });
//! ```

use crate::cache::HashCache;
use crate::download::Summary;
use crate::progress::StyleOptions;

use reqwest::header::HeaderMap;
use std::env::current_dir;
use std::sync::Arc;

/// Callback type for variant completion events.
pub type ReconcileCallback = Box<dyn Fn(&Summary) + Send + Sync>;

/// Configuration structure for the reconciler.
#[derive(Clone)]
pub struct ReconcilerConfig {
    /// Digest cache for files at rest.
    pub cache: HashCache,
    /// Number of retries for requests that fail before a response arrives.
    pub retries: u32,
    /// Extra HTTP headers sent with every transfer.
    pub headers: Option<HeaderMap>,
    /// Optional proxy.
    pub proxy: Option<reqwest::Proxy>,
    /// Progress bar style options.
    pub style_options: StyleOptions,
    /// Hash every completed transfer before moving it into place.
    pub verify_downloads: bool,
    /// Callback for when each variant is done.
    pub on_complete: Option<Arc<ReconcileCallback>>,
}

impl std::fmt::Debug for ReconcilerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconcilerConfig")
            .field("cache", &self.cache)
            .field("retries", &self.retries)
            .field("headers", &self.headers.as_ref().map(|h| h.len()))
            .field("proxy", &self.proxy)
            .field("style_options", &self.style_options)
            .field("verify_downloads", &self.verify_downloads)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        let root = current_dir().unwrap_or_default();
        Self {
            cache: HashCache::new(root.clone(), root.join("json")),
            retries: 3,
            headers: None,
            proxy: None,
            style_options: StyleOptions::default(),
            verify_downloads: false,
            on_complete: None,
        }
    }
}
