//! Turning raw order documents into a [`Catalog`].

use super::order::{DownloadStruct, Order, Subproduct};
use super::product::{Catalog, PlatformDownloads, Product};
use crate::download::RemoteVariant;
use crate::error::{Error, Result};
use crate::filter::Platform;

use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Accumulates products from successive orders.
///
/// The first order that yields a given machine name wins; later duplicates
/// (the same game in two bundles) are ignored.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    /// Create a builder with an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every product of one order.
    ///
    /// A product whose entry is malformed is logged and skipped. Returns the
    /// number of products newly added, or an error if the document is not an
    /// order at all.
    pub fn add_order(&mut self, key: &str, order: &serde_json::Value) -> Result<usize> {
        let order = Order::deserialize(order)
            .map_err(|e| Error::Schema(format!("order {}: {}", key, e)))?;

        let mut added = 0;
        for raw in &order.subproducts {
            match parse_subproduct(key, raw) {
                Ok(Some(product)) => {
                    let name = product.machine_name.clone();
                    if self.catalog.insert_if_absent(product) {
                        added += 1;
                    } else {
                        debug!("{} already seen in an earlier order, keeping that one", name);
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("Skipping a product of order {}: {}", key, e),
            }
        }
        Ok(added)
    }

    /// Finish building.
    pub fn build(self) -> Catalog {
        self.catalog
    }
}

/// Decode one subproduct. Returns `Ok(None)` when it has nothing to download.
pub fn parse_subproduct(key: &str, raw: &serde_json::Value) -> Result<Option<Product>> {
    let sub = Subproduct::deserialize(raw).map_err(|e| Error::Schema(e.to_string()))?;
    let machine_name = sub.machine_name.trim().to_string();
    if machine_name.is_empty() {
        return Err(Error::Schema(format!(
            "product \"{}\" has an empty machine name",
            sub.human_name.trim()
        )));
    }

    let mut downloads: BTreeMap<Platform, PlatformDownloads> = BTreeMap::new();
    for group in &sub.downloads {
        let platform = match group.platform.parse::<Platform>() {
            Ok(p) => p,
            Err(e) => {
                warn!("{}: {}, ignoring its files", machine_name, e);
                continue;
            }
        };

        for entry in &group.download_struct {
            if let Some(variant) = parse_entry(&machine_name, platform, entry)? {
                downloads
                    .entry(platform)
                    .or_default()
                    .insert(variant.name.clone(), variant);
            }
        }
    }

    if downloads.is_empty() {
        return Ok(None);
    }

    Ok(Some(Product {
        key: key.to_string(),
        human_name: sub.human_name.trim().to_string(),
        machine_name,
        downloads,
    }))
}

fn parse_entry(
    machine_name: &str,
    platform: Platform,
    entry: &DownloadStruct,
) -> Result<Option<RemoteVariant>> {
    let Some(url) = &entry.url else {
        return Ok(None);
    };
    let missing = |field: &str| Error::Schema(format!("{}: download entry without {}", machine_name, field));

    let raw_name = entry.name.as_deref().ok_or_else(|| missing("name"))?;
    let size = entry.file_size.ok_or_else(|| missing("file_size"))?;
    let md5 = entry.md5.as_deref().ok_or_else(|| missing("md5"))?;

    let name = match (platform, entry.arch_label()) {
        (Platform::Linux, Some(arch)) => format!("{}-bit {}", arch, raw_name),
        _ => raw_name.to_string(),
    };
    let name = platform.normalize(&name);

    RemoteVariant::from_url(&name, &url.web, size, md5.trim()).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(name: &str, url: &str) -> serde_json::Value {
        json!({
            "name": name,
            "url": { "web": url, "bittorrent": "ignored" },
            "file_size": 10,
            "md5": "D41D8CD98F00B204E9800998ECF8427E",
        })
    }

    #[test]
    fn test_linux_arch_prefix_and_normalisation() {
        let raw = json!({
            "machine_name": " foo ",
            "human_name": " Foo ",
            "downloads": [{
                "platform": "linux",
                "download_struct": [
                    {
                        "name": ".deb",
                        "arch": "64",
                        "url": { "web": "https://dl.example.com/foo_amd64.deb?t=1" },
                        "file_size": 10,
                        "md5": "d41d8cd98f00b204e9800998ecf8427e"
                    },
                    entry("tar.gz", "https://dl.example.com/foo.tar.gz"),
                ]
            }]
        });

        let product = parse_subproduct("KEY", &raw).unwrap().unwrap();
        assert_eq!(product.machine_name, "foo");
        assert_eq!(product.human_name, "Foo");
        assert_eq!(product.key, "KEY");

        let linux = &product.downloads[&Platform::Linux];
        assert!(linux.contains_key("64-bit .deb"));
        assert!(linux.contains_key(".tar.gz"));
        assert_eq!(linux["64-bit .deb"].filename, "foo_amd64.deb");
        assert_eq!(linux[".tar.gz"].expected_digest, "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_arch_only_applies_to_linux() {
        let raw = json!({
            "machine_name": "foo",
            "human_name": "Foo",
            "downloads": [{
                "platform": "windows",
                "download_struct": [{
                    "name": "Installer",
                    "arch": "64",
                    "url": { "web": "https://dl.example.com/foo_setup.exe" },
                    "file_size": 10,
                    "md5": "d41d8cd98f00b204e9800998ecf8427e"
                }]
            }]
        });

        let product = parse_subproduct("KEY", &raw).unwrap().unwrap();
        assert!(product.downloads[&Platform::Windows].contains_key("Installer"));
    }

    #[test]
    fn test_entries_without_url_skipped() {
        let raw = json!({
            "machine_name": "foo_steam",
            "human_name": "Foo",
            "downloads": [{
                "platform": "windows",
                "download_struct": [{ "name": "Steam key" }]
            }]
        });
        assert!(parse_subproduct("KEY", &raw).unwrap().is_none());
    }

    #[test]
    fn test_missing_md5_is_schema_error() {
        let raw = json!({
            "machine_name": "foo",
            "human_name": "Foo",
            "downloads": [{
                "platform": "ebook",
                "download_struct": [{
                    "name": "PDF",
                    "url": { "web": "https://dl.example.com/foo.pdf" },
                    "file_size": 10
                }]
            }]
        });
        assert!(matches!(parse_subproduct("KEY", &raw), Err(Error::Schema(_))));
    }

    #[test]
    fn test_unknown_platform_ignored() {
        let raw = json!({
            "machine_name": "foo",
            "human_name": "Foo",
            "downloads": [
                { "platform": "amiga", "download_struct": [entry("ADF", "https://dl.example.com/foo.adf")] },
                { "platform": "ebook", "download_struct": [entry("PDF", "https://dl.example.com/foo.pdf")] }
            ]
        });
        let product = parse_subproduct("KEY", &raw).unwrap().unwrap();
        assert_eq!(product.downloads.len(), 1);
        assert!(product.downloads.contains_key(&Platform::Ebook));
    }

    #[test]
    fn test_not_an_order() {
        let mut builder = CatalogBuilder::new();
        assert!(matches!(
            builder.add_order("KEY", &json!({ "error": "nope" })),
            Err(Error::Schema(_))
        ));
    }
}
