//! On-disk copy of the storefront's documents.
//!
//! The key list lives in `<dir>/keys.json` and each order in
//! `<dir>/<key>.json`. Whatever is present is served from disk; the rest
//! is fetched from the wrapped storefront and saved for the next run.

use super::Storefront;
use crate::error::Result;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

const KEYS_FILE: &str = "keys.json";

/// Storefront wrapper reading from and filling a cache directory.
#[derive(Debug, Clone)]
pub struct CachedStorefront<S> {
    inner: S,
    dir: PathBuf,
}

impl<S: Storefront> CachedStorefront<S> {
    /// Wrap `inner`, caching documents under `dir`.
    pub fn new(inner: S, dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            dir: dir.into(),
        }
    }

    /// Cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn order_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await?;
    }
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    fs::write(path, bytes).await?;
    Ok(())
}

#[async_trait]
impl<S: Storefront> Storefront for CachedStorefront<S> {
    async fn list_bundle_keys(&self) -> Result<Vec<String>> {
        let path = self.dir.join(KEYS_FILE);
        if let Some(keys) = read_json(&path).await? {
            debug!("Using cached bundle keys from {:?}", path);
            return Ok(keys);
        }

        let keys = self.inner.list_bundle_keys().await?;
        write_json(&path, &keys).await?;
        Ok(keys)
    }

    async fn get_order(&self, key: &str) -> Result<serde_json::Value> {
        let path = self.order_path(key);
        if let Some(order) = read_json(&path).await? {
            debug!("Using cached order {:?}", path);
            return Ok(order);
        }

        let order = self.inner.get_order(key).await?;
        write_json(&path, &order).await?;
        Ok(order)
    }
}
