//! Tests for building a catalog out of several orders.

use bundlesync::catalog::CatalogBuilder;
use bundlesync::filter::Platform;
use bundlesync::Error;

use serde_json::json;

mod common;
use common::helpers::*;

#[test]
fn test_first_order_wins() {
    let content = create_test_content(10);
    let first = order(vec![subproduct(
        "foo",
        "windows",
        vec![download_entry("Download", "https://dl.example.com/foo-1.0.exe", &content)],
    )]);
    let second = order(vec![subproduct(
        "foo",
        "windows",
        vec![download_entry("Download", "https://dl.example.com/foo-2.0.exe", &content)],
    )]);

    let mut builder = CatalogBuilder::new();
    assert_eq!(builder.add_order("KEYA", &first).unwrap(), 1);
    assert_eq!(builder.add_order("KEYB", &second).unwrap(), 0);
    let catalog = builder.build();

    let foo = catalog.get("foo").unwrap();
    assert_eq!(foo.key, "KEYA");
    assert_eq!(foo.downloads[&Platform::Windows]["Download"].filename, "foo-1.0.exe");
}

#[test]
fn test_bad_product_does_not_spoil_order() {
    let content = create_test_content(10);
    let doc = order(vec![
        json!({ "human_name": "No machine name" }),
        subproduct(
            "bar",
            "ebook",
            vec![download_entry("PDF", "https://dl.example.com/bar.pdf", &content)],
        ),
    ]);

    let mut builder = CatalogBuilder::new();
    assert_eq!(builder.add_order("KEY", &doc).unwrap(), 1);
    assert!(builder.build().get("bar").is_some());
}

#[test]
fn test_products_without_files_dropped() {
    let doc = order(vec![json!({
        "machine_name": "keyonly",
        "human_name": "Steam key only",
        "downloads": [],
    })]);

    let mut builder = CatalogBuilder::new();
    assert_eq!(builder.add_order("KEY", &doc).unwrap(), 0);
    assert!(builder.build().is_empty());
}

#[test]
fn test_non_order_document() {
    let mut builder = CatalogBuilder::new();
    assert!(matches!(
        builder.add_order("KEY", &json!(["not", "an", "order"])),
        Err(Error::Schema(_))
    ));
}

#[test]
fn test_selected_variants_sorted_and_filtered() {
    let content = create_test_content(10);
    let doc = order(vec![json!({
        "machine_name": "baz_soundtrack",
        "human_name": "Baz Soundtrack",
        "downloads": [
            {
                "platform": "audio",
                "download_struct": [
                    download_entry("MP3", "https://dl.example.com/baz_mp3.zip", &content),
                    download_entry("FLAC", "https://dl.example.com/baz_flac.zip", &content),
                ]
            },
            {
                "platform": "ebook",
                "download_struct": [
                    download_entry("PDF", "https://dl.example.com/baz.pdf", &content),
                    download_entry("EPUB", "https://dl.example.com/baz.epub", &content),
                ]
            },
        ],
    })]);

    let mut builder = CatalogBuilder::new();
    builder.add_order("KEY", &doc).unwrap();
    let catalog = builder.build();
    let product = catalog.get("baz_soundtrack").unwrap();

    assert_eq!(product.stem(), "baz");
    assert!(product.is_alias());

    let selected: Vec<(Platform, &str)> = product
        .selected_variants()
        .into_iter()
        .map(|(p, v)| (p, v.name.as_str()))
        .collect();
    assert_eq!(
        selected,
        vec![
            (Platform::Audio, "FLAC"),
            (Platform::Ebook, "EPUB"),
            (Platform::Ebook, "PDF"),
        ]
    );
}
