//! End-to-end run: catalog, layout, reconciliation, orphans.

use super::report::SyncReport;
use crate::catalog::{Catalog, CatalogBuilder};
use crate::error::{Error, Result};
use crate::layout::{real_path, Layout};
use crate::reconcile::{FetchJob, Reconciler, ReconcilerBuilder};
use crate::storefront::Storefront;

use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Upper bound on concurrent order requests.
pub const MAX_ORDER_WORKERS: usize = 16;

/// Mirrors every purchased file of an account into a [`Layout`].
pub struct Syncer<S> {
    storefront: S,
    layout: Layout,
    reconciler: Reconciler,
    concurrency: Option<usize>,
}

impl<S: Storefront> Syncer<S> {
    /// Create a syncer.
    ///
    /// The reconciler's digest cache is set from `layout` so records always
    /// mirror the content tree.
    pub fn new(storefront: S, layout: Layout, reconciler: ReconcilerBuilder) -> Self {
        let reconciler = reconciler.cache(layout.hash_cache()).build();
        Self {
            storefront,
            layout,
            reconciler,
            concurrency: None,
        }
    }

    /// Number of order requests in flight. Defaults to one per key, at most
    /// [`MAX_ORDER_WORKERS`].
    pub fn concurrency(mut self, workers: usize) -> Self {
        self.concurrency = Some(workers.max(1));
        self
    }

    /// Gets the layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Gets the reconciler.
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Fetch every order and merge them into one catalog.
    ///
    /// Failing to list keys, or a rejected session, ends the run. Any other
    /// failure only drops the order or product concerned.
    pub async fn fetch_catalog(&self) -> Result<Catalog> {
        let keys = self.storefront.list_bundle_keys().await?;
        let workers = self
            .concurrency
            .unwrap_or_else(|| keys.len().min(MAX_ORDER_WORKERS))
            .max(1);
        info!("Fetching {} orders with {} workers", keys.len(), workers);

        let orders = stream::iter(&keys)
            .map(|key| async move { (key, self.storefront.get_order(key).await) })
            .buffered(workers)
            .collect::<Vec<_>>()
            .await;

        let mut builder = CatalogBuilder::new();
        for (key, order) in orders {
            match order {
                Ok(order) => match builder.add_order(key, &order) {
                    Ok(added) => debug!("Order {} added {} products", key, added),
                    Err(e) => warn!("Skipping order {}: {}", key, e),
                },
                Err(e @ Error::Session(_)) => return Err(e),
                Err(e) => warn!("Cannot fetch order {}: {}", key, e),
            }
        }

        let catalog = builder.build();
        info!("Catalog holds {} products", catalog.len());
        Ok(catalog)
    }

    /// Prepare the directories of every product and list the variants to
    /// reconcile, by product, platform, then variant name.
    pub fn plan(&self, catalog: &Catalog) -> Vec<FetchJob> {
        let mut jobs = Vec::new();
        for product in catalog.iter() {
            if let Err(e) = self.layout.prepare(product) {
                warn!("Skipping {}: {}", product.machine_name, e);
                continue;
            }
            for (_, variant) in product.selected_variants() {
                let target = self.layout.target_path(product, variant);
                jobs.push(FetchJob::new(variant.clone(), target));
            }
        }
        jobs
    }

    /// Run a full pass.
    pub async fn run(&self) -> Result<SyncReport> {
        let catalog = self.fetch_catalog().await?;
        let jobs = self.plan(&catalog);
        info!("Reconciling {} files", jobs.len());

        let summaries = self.reconciler.reconcile(&jobs).await?;

        let touched: HashSet<PathBuf> = jobs.iter().map(|job| real_path(&job.target)).collect();
        let orphans = self.layout.orphans(&catalog, &touched)?;

        Ok(SyncReport { summaries, orphans })
    }
}
