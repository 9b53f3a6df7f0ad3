//! Stem directories, product aliases and orphan detection.

use super::alias::AliasManifest;
use crate::cache::HashCache;
use crate::catalog::{Catalog, Product};
use crate::download::RemoteVariant;
use crate::error::Result;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

static GROUPING_SUFFIXES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(_(soundtrack_only|no_soundtrack|soundtrack|android_and_pc|android|pc|bundle|boxart))+$")
        .expect("valid regex")
});

/// File name of the alias manifest inside the metadata root.
pub const ALIAS_MANIFEST: &str = "aliases.json";

/// Strip trailing grouping suffixes from a machine name.
///
/// ```rust
/// use bundlesync::layout::stem;
///
/// assert_eq!(stem("foo_soundtrack"), "foo");
/// assert_eq!(stem("foo_android_and_pc_bundle"), "foo");
/// assert_eq!(stem("foo"), "foo");
/// ```
pub fn stem(machine_name: &str) -> &str {
    match GROUPING_SUFFIXES.find(machine_name) {
        Some(m) if m.start() > 0 => &machine_name[..m.start()],
        _ => machine_name,
    }
}

/// How a product directory points at its stem directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasMode {
    /// Relative directory symlink `<root>/<machine_name> -> <stem>`.
    Symlink,
    /// Entry in `<metadata_root>/aliases.json`.
    Manifest,
}

impl Default for AliasMode {
    fn default() -> Self {
        if cfg!(any(unix, windows)) {
            AliasMode::Symlink
        } else {
            AliasMode::Manifest
        }
    }
}

/// Maps products to directories under a content root.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
    metadata_root: PathBuf,
    alias_mode: AliasMode,
}

impl Layout {
    /// Create a layout with the platform's default alias mode.
    pub fn new(root: impl Into<PathBuf>, metadata_root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            metadata_root: metadata_root.into(),
            alias_mode: AliasMode::default(),
        }
    }

    /// Choose how aliases are represented.
    pub fn with_alias_mode(mut self, alias_mode: AliasMode) -> Self {
        self.alias_mode = alias_mode;
        self
    }

    /// Content root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Metadata root.
    pub fn metadata_root(&self) -> &Path {
        &self.metadata_root
    }

    /// Alias representation in use.
    pub fn alias_mode(&self) -> AliasMode {
        self.alias_mode
    }

    /// Hash cache whose records mirror this layout.
    pub fn hash_cache(&self) -> HashCache {
        HashCache::new(&self.root, &self.metadata_root)
    }

    /// Physical directory holding a product's files.
    pub fn stem_dir(&self, product: &Product) -> PathBuf {
        self.root.join(product.stem())
    }

    /// Directory named after the product itself; an alias when the
    /// product has a stem.
    pub fn product_dir(&self, product: &Product) -> PathBuf {
        self.root.join(&product.machine_name)
    }

    /// Final location of a variant.
    pub fn target_path(&self, product: &Product, variant: &RemoteVariant) -> PathBuf {
        self.stem_dir(product).join(&variant.filename)
    }

    fn manifest_path(&self) -> PathBuf {
        self.metadata_root.join(ALIAS_MANIFEST)
    }

    /// Create the stem directory, the product alias and the metadata
    /// directory. Returns the stem directory.
    pub fn prepare(&self, product: &Product) -> Result<PathBuf> {
        let stem = product.stem();
        let stem_dir = self.stem_dir(product);
        fs::create_dir_all(&stem_dir)?;

        if product.is_alias() {
            let alias = self.product_dir(product);
            match self.alias_mode {
                AliasMode::Symlink => {
                    if fs::symlink_metadata(&alias).is_err() {
                        debug!("Linking {:?} -> {}", alias, stem);
                        link_dir(Path::new(stem), &alias)?;
                    }
                }
                AliasMode::Manifest => {
                    if !alias.exists() {
                        let path = self.manifest_path();
                        let mut manifest = AliasManifest::load(&path)?;
                        if manifest.insert(&product.machine_name, stem) {
                            debug!("Recording alias {} -> {}", product.machine_name, stem);
                            manifest.save(&path)?;
                        }
                    }
                }
            }
        }

        fs::create_dir_all(self.metadata_root.join(stem))?;
        Ok(stem_dir)
    }

    /// Directory a machine name resolves to.
    pub fn resolve(&self, machine_name: &str) -> Result<PathBuf> {
        if self.alias_mode == AliasMode::Manifest {
            let manifest = AliasManifest::load(&self.manifest_path())?;
            if let Some(stem) = manifest.get(machine_name) {
                return Ok(self.root.join(stem));
            }
        }
        Ok(self.root.join(machine_name))
    }

    /// Files under product directories that no reconciled variant accounts
    /// for.
    ///
    /// `touched` holds real paths (see [`real_path`]). Each real path is
    /// reported once, under the first product directory that shows it.
    /// Nothing is deleted.
    pub fn orphans(&self, catalog: &Catalog, touched: &HashSet<PathBuf>) -> Result<Vec<PathBuf>> {
        let mut reported = HashSet::new();
        let mut orphans = Vec::new();

        for product in catalog.iter() {
            let dir = self.resolve(&product.machine_name)?;
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            let mut files = Vec::new();
            for entry in entries {
                let path = entry?.path();
                if path.is_file() {
                    files.push(path);
                }
            }
            files.sort();

            for file in files {
                let real = fs::canonicalize(&file)?;
                if !touched.contains(&real) && reported.insert(real) {
                    orphans.push(file);
                }
            }
        }

        Ok(orphans)
    }
}

/// Resolve symlinks in a path, including when the file itself does not
/// exist yet.
pub fn real_path(path: &Path) -> PathBuf {
    if let Ok(real) = fs::canonicalize(path) {
        return real;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => fs::canonicalize(parent)
            .map(|p| p.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

#[cfg(unix)]
fn link_dir(target: &Path, link: &Path) -> Result<()> {
    std::os::unix::fs::symlink(target, link)?;
    Ok(())
}

#[cfg(windows)]
fn link_dir(target: &Path, link: &Path) -> Result<()> {
    std::os::windows::fs::symlink_dir(target, link)?;
    Ok(())
}

#[cfg(not(any(unix, windows)))]
fn link_dir(_target: &Path, link: &Path) -> Result<()> {
    Err(crate::error::Error::Internal(format!(
        "cannot create directory link {}, use the manifest alias mode",
        link.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_suffixes() {
        assert_eq!(stem("foo_bundle"), "foo");
        assert_eq!(stem("foo_soundtrack"), "foo");
        assert_eq!(stem("foo_soundtrack_only"), "foo");
        assert_eq!(stem("foo_no_soundtrack"), "foo");
        assert_eq!(stem("foo_android_and_pc"), "foo");
        assert_eq!(stem("foo_pc_soundtrack"), "foo");
        assert_eq!(stem("foo_boxart"), "foo");
    }

    #[test]
    fn test_stem_keeps_inner_words() {
        assert_eq!(stem("soundtrack_maker"), "soundtrack_maker");
        assert_eq!(stem("foo_bundlex"), "foo_bundlex");
        assert_eq!(stem("foo_bar"), "foo_bar");
    }

    #[test]
    fn test_stem_never_empty() {
        assert_eq!(stem("_bundle"), "_bundle");
    }

    #[test]
    fn test_real_path_of_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let real_dir = fs::canonicalize(dir.path()).unwrap();
        assert_eq!(real_path(&dir.path().join("later.zip")), real_dir.join("later.zip"));
    }
}
