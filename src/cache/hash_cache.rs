//! Path-keyed digest cache backed by a parallel metadata tree.
//!
//! A file at `<content_root>/<rel>` has its record at
//! `<metadata_root>/<rel>.json`. A record is trusted for as long as it
//! exists; anything that replaces the file it describes must call
//! [`HashCache::invalidate`] or [`HashCache::store`] first.

use super::record::LocalFileRecord;
use crate::download::hash::digest_file;
use crate::error::{Error, Result};

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Digest cache for files under a content root.
#[derive(Debug, Clone)]
pub struct HashCache {
    content_root: PathBuf,
    metadata_root: PathBuf,
}

impl HashCache {
    /// Create a cache mirroring `content_root` under `metadata_root`.
    pub fn new(content_root: impl Into<PathBuf>, metadata_root: impl Into<PathBuf>) -> Self {
        Self {
            content_root: content_root.into(),
            metadata_root: metadata_root.into(),
        }
    }

    /// Root of the mirrored files.
    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// Root of the metadata tree.
    pub fn metadata_root(&self) -> &Path {
        &self.metadata_root
    }

    /// Location of the record describing `path`.
    pub fn record_path(&self, path: &Path) -> Result<PathBuf> {
        let rel = path.strip_prefix(&self.content_root).map_err(|_| {
            Error::Internal(format!(
                "{} is outside the content root {}",
                path.display(),
                self.content_root.display()
            ))
        })?;
        if rel.as_os_str().is_empty() {
            return Err(Error::Internal(format!(
                "{} is the content root itself",
                path.display()
            )));
        }

        let mut name: OsString = rel.as_os_str().to_owned();
        name.push(".json");
        Ok(self.metadata_root.join(name))
    }

    /// Read the record for `path`, if any.
    pub fn lookup(&self, path: &Path) -> Result<Option<LocalFileRecord>> {
        let record_path = self.record_path(path)?;
        match fs::read(&record_path) {
            Ok(raw) => Ok(Some(serde_json::from_slice(&raw)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Return the digest of `path`, hashing the file only when no record exists.
    ///
    /// The recorded size plays no part in trusting a record. `expected_size`
    /// is what the caller believes the file holds; a freshly computed record
    /// always stores the number of bytes actually hashed.
    pub fn get_or_compute(&self, path: &Path, expected_size: u64) -> Result<String> {
        if let Some(record) = self.lookup(path)? {
            debug!("Using cached digest for {:?}", path);
            return Ok(record.digest);
        }

        debug!("Hashing {:?}", path);
        let computed = digest_file(path)?;
        if computed.size != expected_size {
            debug!(
                "Hashed {} bytes of {:?}, caller expected {}",
                computed.size, path, expected_size
            );
        }

        let record = LocalFileRecord::new(file_name(path), computed.size, computed.digest.clone());
        self.store(path, &record)?;
        Ok(computed.digest)
    }

    /// Write the record for `path`, replacing any previous one atomically.
    pub fn store(&self, path: &Path, record: &LocalFileRecord) -> Result<()> {
        let record_path = self.record_path(path)?;
        if let Some(parent) = record_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut tmp_name = record_path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let mut file = fs::File::create(&tmp_path)?;
        serde_json::to_writer_pretty(&mut file, record)?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp_path, &record_path)?;
        Ok(())
    }

    /// Forget the record for `path`. A missing record is not an error.
    pub fn invalidate(&self, path: &Path) -> Result<()> {
        let record_path = self.record_path(path)?;
        match fs::remove_file(&record_path) {
            Ok(()) => {
                debug!("Invalidated cached digest for {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
