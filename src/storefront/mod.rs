//! Where bundle keys and order documents come from.
//!
//! The [`Storefront`] trait is all the rest of the crate knows about the
//! shop: a list of bundle keys and one JSON order document per key.
//!
//! - `http` - [`HttpStorefront`], talking to the live site with a [`Session`](crate::http::Session)
//! - `cached` - [`CachedStorefront`], keeping fetched documents on disk for later runs

pub mod cached;
pub mod http;

pub use cached::CachedStorefront;
pub use http::{parse_bundle_keys, HttpStorefront, DEFAULT_BASE_URL};

use crate::error::Result;

use async_trait::async_trait;

/// Source of bundle keys and their order documents.
#[async_trait]
pub trait Storefront: Send + Sync {
    /// Every bundle key owned by the account.
    async fn list_bundle_keys(&self) -> Result<Vec<String>>;

    /// The raw order document for one key.
    async fn get_order(&self, key: &str) -> Result<serde_json::Value>;
}

#[async_trait]
impl<S: Storefront + ?Sized> Storefront for Box<S> {
    async fn list_bundle_keys(&self) -> Result<Vec<String>> {
        (**self).list_bundle_keys().await
    }

    async fn get_order(&self, key: &str) -> Result<serde_json::Value> {
        (**self).get_order(key).await
    }
}
