//! Alias manifest for filesystems without reliable directory links.

use crate::error::Result;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Persisted `alias -> stem` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasManifest {
    aliases: BTreeMap<String, String>,
}

impl AliasManifest {
    /// Read a manifest. A missing file is an empty manifest.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read(path) {
            Ok(raw) => Ok(serde_json::from_slice(&raw)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Write the manifest through a temporary file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, serde_json::to_vec_pretty(self)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Stem an alias points at.
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// Record an alias. Returns `true` if the manifest changed.
    pub fn insert(&mut self, alias: &str, stem: &str) -> bool {
        self.aliases.insert(alias.to_string(), stem.to_string()).as_deref() != Some(stem)
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Whether the manifest is empty.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_manifest_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = AliasManifest::load(&dir.path().join("aliases.json")).unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_manifest_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta").join("aliases.json");

        let mut manifest = AliasManifest::default();
        assert!(manifest.insert("foo_bundle", "foo"));
        assert!(!manifest.insert("foo_bundle", "foo"));
        manifest.save(&path).unwrap();

        let loaded = AliasManifest::load(&path).unwrap();
        assert_eq!(loaded.get("foo_bundle"), Some("foo"));
        assert_eq!(loaded.get("foo"), None);
        assert_eq!(loaded.len(), 1);
    }
}
