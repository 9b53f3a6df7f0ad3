//! Tests for the directory layout: stems, aliases and the orphan report.

use bundlesync::catalog::{Catalog, CatalogBuilder, Product};
use bundlesync::layout::{real_path, AliasManifest, AliasMode, Layout};

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

mod common;
use common::helpers::*;

fn family_catalog() -> Catalog {
    let content = create_test_content(10);
    let doc = order(vec![
        subproduct(
            "foo_bundle",
            "windows",
            vec![download_entry("Download", "https://dl.example.com/foo-setup.exe", &content)],
        ),
        subproduct(
            "foo_soundtrack",
            "audio",
            vec![download_entry("FLAC", "https://dl.example.com/foo-ost.zip", &content)],
        ),
    ]);
    let mut builder = CatalogBuilder::new();
    builder.add_order("KEY", &doc).unwrap();
    builder.build()
}

fn product<'a>(catalog: &'a Catalog, name: &str) -> &'a Product {
    catalog.get(name).unwrap()
}

#[cfg(unix)]
#[test]
fn test_family_shares_one_directory() {
    let root = create_temp_dir();
    let layout = Layout::new(root.path(), root.path().join("json"));
    let catalog = family_catalog();

    for p in catalog.iter() {
        let dir = layout.prepare(p).unwrap();
        assert_eq!(dir, root.path().join("foo"));
    }

    for alias in ["foo_bundle", "foo_soundtrack"] {
        let path = root.path().join(alias);
        assert!(fs::symlink_metadata(&path).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&path).unwrap(), PathBuf::from("foo"));
        assert_eq!(real_path(&path), real_path(&root.path().join("foo")));
    }
    assert!(root.path().join("json/foo").is_dir());

    // Files land in the shared directory whichever alias they came from.
    let bundle = product(&catalog, "foo_bundle");
    let (_, variant) = bundle.selected_variants()[0];
    assert_eq!(
        layout.target_path(bundle, variant),
        root.path().join("foo/foo-setup.exe")
    );
}

#[test]
fn test_prepare_twice_is_harmless() {
    let root = create_temp_dir();
    let layout = Layout::new(root.path(), root.path().join("json"));
    let catalog = family_catalog();

    for _ in 0..2 {
        for p in catalog.iter() {
            layout.prepare(p).unwrap();
        }
    }
    assert!(root.path().join("foo").is_dir());
}

#[test]
fn test_manifest_aliases() {
    let root = create_temp_dir();
    let metadata = root.path().join("json");
    let layout =
        Layout::new(root.path(), &metadata).with_alias_mode(AliasMode::Manifest);
    let catalog = family_catalog();

    for p in catalog.iter() {
        layout.prepare(p).unwrap();
    }

    assert!(fs::symlink_metadata(root.path().join("foo_bundle")).is_err());
    let manifest = AliasManifest::load(&metadata.join("aliases.json")).unwrap();
    assert_eq!(manifest.get("foo_bundle"), Some("foo"));
    assert_eq!(manifest.get("foo_soundtrack"), Some("foo"));

    assert_eq!(layout.resolve("foo_bundle").unwrap(), root.path().join("foo"));
    assert_eq!(layout.resolve("bar").unwrap(), root.path().join("bar"));
}

#[test]
fn test_orphan_reported_once_across_aliases() {
    for mode in [AliasMode::default(), AliasMode::Manifest] {
        let root = create_temp_dir();
        let layout = Layout::new(root.path(), root.path().join("json")).with_alias_mode(mode);
        let catalog = family_catalog();
        for p in catalog.iter() {
            layout.prepare(p).unwrap();
        }

        let kept = create_temp_file(root.path(), "foo/foo-setup.exe", b"current");
        create_temp_file(root.path(), "foo/foo-setup-old.exe", b"stale");

        let touched: HashSet<PathBuf> = [real_path(&kept)].into_iter().collect();
        let orphans = layout.orphans(&catalog, &touched).unwrap();

        assert_eq!(orphans.len(), 1, "mode {:?}: {:?}", mode, orphans);
        assert_eq!(
            orphans[0].file_name().unwrap().to_str(),
            Some("foo-setup-old.exe")
        );
    }
}

#[test]
fn test_orphans_ignore_missing_directories() {
    let root = create_temp_dir();
    let layout = Layout::new(root.path(), root.path().join("json"));
    let orphans = layout.orphans(&family_catalog(), &HashSet::new()).unwrap();
    assert!(orphans.is_empty());
}

#[test]
fn test_orphans_are_not_deleted() {
    let root = create_temp_dir();
    let layout = Layout::new(root.path(), root.path().join("json"));
    let catalog = family_catalog();
    for p in catalog.iter() {
        layout.prepare(p).unwrap();
    }
    let stray = create_temp_file(root.path(), "foo/notes.txt", b"mine");

    let orphans = layout.orphans(&catalog, &HashSet::new()).unwrap();
    assert_eq!(orphans.len(), 1);
    assert_file_content(&stray, b"mine");
}
