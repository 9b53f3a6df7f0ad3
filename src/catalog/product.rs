//! Normalised catalog entries.

use crate::download::RemoteVariant;
use crate::filter::Platform;
use crate::layout::stem;

use std::collections::btree_map::{self, BTreeMap};
use std::collections::BTreeSet;

/// Variants of one platform, keyed by normalised variant name.
pub type PlatformDownloads = BTreeMap<String, RemoteVariant>;

/// A purchased product with at least one downloadable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Order key the product was first found in.
    pub key: String,
    /// Display name.
    pub human_name: String,
    /// Filesystem-safe unique name.
    pub machine_name: String,
    /// Downloads per platform.
    pub downloads: BTreeMap<Platform, PlatformDownloads>,
}

impl Product {
    /// Canonical directory name shared with related products.
    pub fn stem(&self) -> &str {
        stem(&self.machine_name)
    }

    /// Whether this product lives in another product's directory.
    pub fn is_alias(&self) -> bool {
        self.stem() != self.machine_name
    }

    /// Variants that survive each platform's filter, sorted by platform
    /// then variant name.
    pub fn selected_variants(&self) -> Vec<(Platform, &RemoteVariant)> {
        let mut selected = Vec::new();
        for (platform, variants) in &self.downloads {
            let names: BTreeSet<String> = variants.keys().cloned().collect();
            for name in platform.filter(&names) {
                if let Some(variant) = variants.get(&name) {
                    selected.push((*platform, variant));
                }
            }
        }
        selected
    }
}

/// All products of an account, keyed by machine name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: BTreeMap<String, Product>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a product unless one with the same machine name is present.
    ///
    /// Returns `true` if the product was inserted.
    pub fn insert_if_absent(&mut self, product: Product) -> bool {
        match self.products.entry(product.machine_name.clone()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(product);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Look up a product by machine name.
    pub fn get(&self, machine_name: &str) -> Option<&Product> {
        self.products.get(machine_name)
    }

    /// Products sorted by machine name.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
