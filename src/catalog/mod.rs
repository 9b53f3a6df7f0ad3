//! Catalog module: from order documents to products and variants.
//!
//! The storefront hands out one JSON order per purchased bundle. The
//! [`CatalogBuilder`] folds them into a [`Catalog`]: product, then platform,
//! then variant name, then [`RemoteVariant`](crate::download::RemoteVariant).
//! The catalog is rebuilt on every run and never persisted.
//!
//! # Examples
//!
//! ```rust
//! use bundlesync::catalog::CatalogBuilder;
//! use serde_json::json;
//!
//! let order = json!({
//!     "subproducts": [{
//!         "machine_name": "foo_soundtrack",
//!         "human_name": "Foo Soundtrack",
//!         "downloads": [{
//!             "platform": "audio",
//!             "download_struct": [{
//!                 "name": "FLAC",
//!                 "url": { "web": "https://dl.example.com/foo_flac.zip" },
//!                 "file_size": 1000,
//!                 "md5": "d41d8cd98f00b204e9800998ecf8427e"
//!             }]
//!         }]
//!     }]
//! });
//!
//! let mut builder = CatalogBuilder::new();
//! builder.add_order("ORDERKEY", &order)?;
//! let catalog = builder.build();
//! assert_eq!(catalog.get("foo_soundtrack").map(|p| p.stem()), Some("foo"));
//! # Ok::<(), bundlesync::Error>(())
//! ```

pub mod builder;
pub mod order;
pub mod product;

pub use builder::{parse_subproduct, CatalogBuilder};
pub use order::{DownloadGroup, DownloadStruct, DownloadUrl, Order, Subproduct};
pub use product::{Catalog, PlatformDownloads, Product};
