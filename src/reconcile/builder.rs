//! Builder for [`Reconciler`] instances.
//!
//! # Examples
//!
//! ```rust
//! use bundlesync::cache::HashCache;
//! use bundlesync::reconcile::ReconcilerBuilder;
//!
//! let reconciler = ReconcilerBuilder::new()
//!     .cache(HashCache::new("library", "library/json"))
//!     .retries(5)
//!     .verify_downloads(true)
//!     .build();
//! ```
//!
//! ## Hidden Progress Bars
//!
//! ```rust
//! use bundlesync::reconcile::ReconcilerBuilder;
//!
//! let reconciler = ReconcilerBuilder::hidden().build();
//! ```

use super::{config::ReconcilerConfig, reconciler::Reconciler};
use crate::cache::HashCache;
use crate::download::Summary;
use crate::error::Result;
use crate::http::Session;
use crate::progress::StyleOptions;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use std::sync::Arc;

/// A builder used to create a [`Reconciler`].
#[derive(Default)]
pub struct ReconcilerBuilder {
    config: ReconcilerConfig,
}

impl ReconcilerBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        ReconcilerBuilder::default()
    }

    /// Convenience function to hide the progress bars.
    pub fn hidden() -> Self {
        let mut builder = ReconcilerBuilder::default();
        builder.config.style_options = StyleOptions::hidden();
        builder
    }

    /// Sets the digest cache, which also fixes the content root.
    pub fn cache(mut self, cache: HashCache) -> Self {
        self.config.cache = cache;
        self
    }

    /// Set the number of retries per request.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Set the progress bar style options.
    pub fn style_options(mut self, style_options: StyleOptions) -> Self {
        self.config.style_options = style_options;
        self
    }

    /// Route transfers through a proxy.
    pub fn proxy(mut self, proxy: reqwest::Proxy) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Hash each completed transfer and refuse to move it into place when
    /// the digest differs from the catalog.
    pub fn verify_downloads(mut self, verify: bool) -> Self {
        self.config.verify_downloads = verify;
        self
    }

    /// Set callback for when each variant is done.
    ///
    /// The callback runs for every variant, satisfied ones included.
    ///
    /// ```rust
    /// use bundlesync::reconcile::ReconcilerBuilder;
    /// use bundlesync::download::Status;
    ///
    /// let reconciler = ReconcilerBuilder::new()
    ///     .on_complete(|summary| {
    ///         if let Status::Failed(error) = summary.status() {
    ///             eprintln!("{}: {}", summary.target().display(), error);
    ///         }
    ///     })
    ///     .build();
    /// ```
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Summary) + Send + Sync + 'static,
    {
        self.config.on_complete = Some(Arc::new(Box::new(callback)));
        self
    }

    fn new_header(&self) -> HeaderMap {
        match self.config.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Add the http headers.
    ///
    /// You can call `.headers()` multiple times and all `HeaderMap` will be
    /// merged into a single one.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.headers = Some(new);
        self
    }

    /// Add one http header.
    ///
    /// ```
    /// use reqwest::header::{self, HeaderValue};
    /// use bundlesync::reconcile::ReconcilerBuilder;
    ///
    /// let reconciler = ReconcilerBuilder::new()
    ///     .header(header::USER_AGENT, HeaderValue::from_static("bundlesync"))
    ///     .build();
    /// ```
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.headers = Some(new);
        self
    }

    /// Send the session cookie with every transfer.
    pub fn session(self, session: &Session) -> Result<Self> {
        Ok(self.headers(session.headers()?))
    }

    /// Create the [`Reconciler`] with the specified options.
    pub fn build(self) -> Reconciler {
        Reconciler::new(self.config)
    }
}
