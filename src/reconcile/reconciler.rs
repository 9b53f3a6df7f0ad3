//! Per-variant reconciliation with resumable transfers.
//!
//! Each [`FetchJob`] pairs a [`RemoteVariant`] with the path it should end up
//! at. The reconciler assesses the local file, and when it does not match,
//! fetches the variant into `<target>.part` with a `Range: bytes=L-` request,
//! `L` being whatever a previous run left behind. Once every byte has
//! arrived the previous target, if any, is kept as `<target>.old` and the
//! artifact is renamed into place.
//!
//! Jobs run one after the other. An interrupted run leaves either a
//! complete file with its record, or a `.part` the next run resumes.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bundlesync::cache::HashCache;
//! use bundlesync::download::RemoteVariant;
//! use bundlesync::reconcile::{FetchJob, ReconcilerBuilder};
//!
//! # async fn example() -> Result<(), bundlesync::Error> {
//! let variant = RemoteVariant::from_url(
//!     "PDF",
//!     "https://dl.example.com/book.pdf?ttl=60",
//!     1_048_576,
//!     "0cc175b9c0f1b6a831c399e269772661",
//! )?;
//! let reconciler = ReconcilerBuilder::new()
//!     .cache(HashCache::new("library", "library/json"))
//!     .build();
//!
//! let jobs = vec![FetchJob::new(variant, "library/book/book.pdf")];
//! for summary in reconciler.reconcile(&jobs).await? {
//!     println!("{}: {:?}", summary.target().display(), summary.status());
//! }
//! # Ok(())
//! # }
//! ```

use super::config::ReconcilerConfig;
use super::state::VariantState;
use crate::cache::{HashCache, LocalFileRecord};
use crate::download::{hash_file, RemoteVariant, Status, Summary};
use crate::error::{Error, Result};
use crate::http::{create_http_client, HttpClientConfig};
use crate::progress::{ProgressDisplay, TransferStats};
use crate::utils::{parse_content_range_start, total_length};

use futures::StreamExt;
use reqwest::{
    header::{HeaderMap, CONTENT_RANGE, RANGE},
    StatusCode,
};
use reqwest_middleware::ClientWithMiddleware;
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use tokio::{fs, fs::OpenOptions, io::AsyncWriteExt};
use tracing::{debug, info, warn};

/// One variant and the path it is mirrored to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchJob {
    pub variant: RemoteVariant,
    pub target: PathBuf,
}

impl FetchJob {
    /// Create a job placing `variant` at `target`.
    pub fn new(variant: RemoteVariant, target: impl Into<PathBuf>) -> Self {
        Self {
            variant,
            target: target.into(),
        }
    }

    /// Partial-transfer artifact, `<target>.part`.
    pub fn part_path(&self) -> PathBuf {
        with_suffix(&self.target, ".part")
    }

    /// Backup of the replaced file, `<target>.old`.
    pub fn backup_path(&self) -> PathBuf {
        with_suffix(&self.target, ".old")
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Represents the reconciliation controller.
///
/// ```rust
/// use bundlesync::reconcile::ReconcilerBuilder;
///
/// let r = ReconcilerBuilder::new().build();
/// ```
#[derive(Clone)]
pub struct Reconciler {
    config: ReconcilerConfig,
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .finish()
    }
}

impl Reconciler {
    pub(crate) fn new(config: ReconcilerConfig) -> Self {
        Self { config }
    }

    /// Gets the digest cache.
    pub fn cache(&self) -> &HashCache {
        &self.config.cache
    }

    /// Gets the number of retries per request.
    pub fn retries(&self) -> u32 {
        self.config.retries
    }

    /// Gets whether completed transfers are hashed before use.
    pub fn verify_downloads(&self) -> bool {
        self.config.verify_downloads
    }

    /// Gets the custom headers.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.config.headers.as_ref()
    }

    /// Compare the file at the job's target with its variant.
    ///
    /// Only the digest cache is written to, when a file that has no record
    /// yet gets hashed.
    pub async fn assess(&self, job: &FetchJob) -> Result<VariantState> {
        let metadata = match fs::metadata(&job.target).await {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(VariantState::Missing),
            Err(e) => return Err(e.into()),
        };

        let expected_size = job.variant.expected_size;
        if metadata.len() != expected_size {
            return Ok(VariantState::Stale(format!(
                "size {} differs from expected {}",
                metadata.len(),
                expected_size
            )));
        }

        let target = job.target.clone();
        let digest = self
            .with_cache(move |cache| cache.get_or_compute(&target, expected_size))
            .await?;

        if !digest.eq_ignore_ascii_case(&job.variant.expected_digest) {
            return Ok(VariantState::Stale(format!(
                "digest {} differs from expected {}",
                digest, job.variant.expected_digest
            )));
        }

        Ok(VariantState::Satisfied)
    }

    /// Reconcile every job in order, one at a time.
    ///
    /// Failures are reported per job in the returned summaries; only a
    /// failure to set up the HTTP client is returned as an error.
    pub async fn reconcile(&self, jobs: &[FetchJob]) -> Result<Vec<Summary>> {
        let client = create_http_client(HttpClientConfig {
            retries: self.config.retries,
            proxy: self.config.proxy.clone(),
            headers: self.config.headers.clone(),
            ..HttpClientConfig::default()
        })?;

        let progress_display = ProgressDisplay::new(self.config.style_options.clone(), jobs.len());

        let mut summaries = Vec::with_capacity(jobs.len());
        for job in jobs {
            let summary = self.reconcile_one(&client, job, &progress_display).await;
            progress_display.increment_main();

            if let Some(ref callback) = self.config.on_complete {
                callback(&summary);
            }
            summaries.push(summary);
        }

        progress_display.finish();
        Ok(summaries)
    }

    async fn reconcile_one(
        &self,
        client: &ClientWithMiddleware,
        job: &FetchJob,
        progress_display: &ProgressDisplay,
    ) -> Summary {
        let state = match self.assess(job).await {
            Ok(state) => state,
            Err(e) => {
                warn!("Cannot assess {:?}: {}", job.target, e);
                let state = VariantState::Stale(e.to_string());
                return Summary::new(job.variant.clone(), job.target.clone(), state).fail(e);
            }
        };

        let summary = Summary::new(job.variant.clone(), job.target.clone(), state.clone());
        if !state.needs_fetch() {
            debug!("{:?} is up to date", job.target);
            return summary.satisfied();
        }

        info!("Fetching {:?}: {}", job.target, state);
        let summary = self.fetch(client, job, summary, progress_display).await;
        match summary.status() {
            Status::Failed(msg) | Status::IntegrityMismatch(msg) => {
                warn!("{:?} failed: {}", job.target, msg)
            }
            _ => (),
        }
        summary
    }

    /// Bring `<target>.part` up to the full size and move it into place.
    async fn fetch(
        &self,
        client: &ClientWithMiddleware,
        job: &FetchJob,
        summary: Summary,
        progress_display: &ProgressDisplay,
    ) -> Summary {
        let part = job.part_path();
        let expected_size = job.variant.expected_size;

        if let Some(dir) = job.target.parent() {
            if let Err(e) = fs::create_dir_all(dir).await {
                return summary.fail(e);
            }
        }

        let mut on_disk = match fs::metadata(&part).await {
            Ok(m) => Some(m.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return summary.fail(e),
        };

        match on_disk {
            Some(len) if len > expected_size => {
                // The remote file changed since the artifact was started.
                warn!(
                    "{:?} holds {} bytes, more than the expected {}; restarting",
                    part, len, expected_size
                );
                if let Err(e) = fs::remove_file(&part).await {
                    return summary.fail(e);
                }
                on_disk = None;
            }
            Some(len) if len == expected_size => {
                match self.digest(&part).await {
                    Ok(actual) if actual == job.variant.expected_digest => {
                        debug!("{:?} is already complete", part);
                        return self.finalize(job, summary.with_transfer(len, 0), true).await;
                    }
                    Ok(actual) => {
                        warn!(
                            "{:?} is complete but has digest {}; restarting",
                            part, actual
                        );
                        if let Err(e) = fs::remove_file(&part).await {
                            return summary.fail(e);
                        }
                        on_disk = None;
                    }
                    Err(e) => return summary.fail(e),
                }
            }
            _ => (),
        }

        // Nothing to request for an empty file; `bytes=0-` is unsatisfiable.
        if expected_size == 0 && on_disk.is_none() {
            if let Err(e) = fs::File::create(&part).await {
                return summary.fail(e);
            }
            return self.finalize(job, summary.with_transfer(0, 0), false).await;
        }

        let mut offset = on_disk.unwrap_or(0);
        let mut res = match request_from(client, job, offset).await {
            Ok(res) => res,
            Err(e) => return summary.with_transfer(offset, 0).fail(e),
        };

        if res.status() == StatusCode::RANGE_NOT_SATISFIABLE && offset > 0 {
            // The remote file shrank below what the artifact already holds.
            warn!(
                "{} cannot serve {:?} from byte {}; restarting",
                job.variant.url, part, offset
            );
            if let Err(e) = fs::remove_file(&part).await {
                return summary.fail(e);
            }
            offset = 0;
            res = match request_from(client, job, offset).await {
                Ok(res) => res,
                Err(e) => return summary.with_transfer(offset, 0).fail(e),
            };
        }

        let status = res.status();
        let summary = summary.with_statuscode(status);
        if !status.is_success() {
            return summary.with_transfer(offset, 0).fail(Error::Network {
                url: job.variant.url.to_string(),
                status,
            });
        }

        let restart = if status == StatusCode::PARTIAL_CONTENT {
            let start = res
                .headers()
                .get(CONTENT_RANGE)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_content_range_start);
            if start != Some(offset) {
                return summary.with_transfer(offset, 0).fail(format!(
                    "asked for bytes from {} but the server sent {:?}",
                    offset, start
                ));
            }
            false
        } else {
            if offset > 0 {
                debug!("Server ignored the range request, restarting {:?}", part);
            }
            offset = 0;
            true
        };

        let total = total_length(status, res.headers()).unwrap_or(expected_size);
        if total != expected_size {
            return summary
                .with_transfer(offset, 0)
                .integrity_mismatch(Error::SizeMismatch {
                    url: job.variant.url.to_string(),
                    expected: expected_size,
                    actual: total,
                });
        }

        debug!("Opening {:?}", part);
        let mut file = match OpenOptions::new()
            .create(true)
            .write(true)
            .append(!restart)
            .truncate(restart)
            .open(&part)
            .await
        {
            Ok(file) => file,
            Err(e) => return summary.with_transfer(offset, 0).fail(e),
        };

        let mut stats = TransferStats::new(offset, total);
        let pb = progress_display.create_transfer(total, offset, &job.variant.filename);

        // Append chunk by chunk; a chunk only counts once it is flushed.
        let mut stream = res.bytes_stream();
        while let Some(item) = stream.next().await {
            let chunk = match item {
                Ok(chunk) => chunk,
                Err(e) => {
                    progress_display.abandon_transfer(pb);
                    return summary.with_transfer(offset, stats.received()).fail(e);
                }
            };

            if let Err(e) = write_chunk(&mut file, &chunk).await {
                progress_display.abandon_transfer(pb);
                return summary.with_transfer(offset, stats.received()).fail(e);
            }
            stats.record(chunk.len() as u64);
            pb.inc(chunk.len() as u64);
        }

        if let Err(e) = file.sync_all().await {
            progress_display.abandon_transfer(pb);
            return summary.with_transfer(offset, stats.received()).fail(e);
        }
        drop(file);

        progress_display.finish_transfer(pb);
        debug!("{:?}: {}", part, stats.status_line());

        let summary = summary.with_transfer(offset, stats.received());
        if !stats.is_complete() {
            return summary.fail(format!(
                "transfer stopped at {} of {} bytes",
                stats.downloaded(),
                total
            ));
        }

        self.finalize(job, summary, false).await
    }

    /// Move a complete artifact into place and record its digest.
    async fn finalize(&self, job: &FetchJob, summary: Summary, verified: bool) -> Summary {
        let part = job.part_path();
        let variant = &job.variant;

        if self.config.verify_downloads && !verified {
            match self.digest(&part).await {
                Ok(actual) if actual != variant.expected_digest => {
                    if let Err(e) = fs::remove_file(&part).await {
                        warn!("Cannot remove {:?}: {}", part, e);
                    }
                    return summary.integrity_mismatch(Error::IntegrityMismatch {
                        path: job.target.clone(),
                        expected: variant.expected_digest.clone(),
                        actual,
                    });
                }
                Ok(_) => (),
                Err(e) => return summary.fail(e),
            }
        }

        if let Err(e) = self.replace_target(job).await {
            return summary.fail(e);
        }

        let record = LocalFileRecord::new(
            variant.filename.clone(),
            variant.expected_size,
            variant.expected_digest.clone(),
        );
        let target = job.target.clone();
        if let Err(e) = self
            .with_cache(move |cache| cache.store(&target, &record))
            .await
        {
            // Without a record the next run hashes the file instead.
            warn!("Cannot record digest of {:?}: {}", job.target, e);
        }

        summary.with_status(Status::Done)
    }

    async fn replace_target(&self, job: &FetchJob) -> Result<()> {
        let target = job.target.clone();
        self.with_cache(move |cache| cache.invalidate(&target))
            .await?;

        match fs::symlink_metadata(&job.target).await {
            Ok(_) => {
                let backup = job.backup_path();
                debug!("Keeping previous {:?} as {:?}", job.target, backup);
                fs::rename(&job.target, &backup).await?;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => (),
            Err(e) => return Err(e.into()),
        }

        fs::rename(job.part_path(), &job.target).await?;
        Ok(())
    }

    /// Run a blocking digest cache operation off the async workers.
    async fn with_cache<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&HashCache) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let cache = self.config.cache.clone();
        tokio::task::spawn_blocking(move || op(&cache))
            .await
            .map_err(|e| Error::Internal(format!("digest cache task failed: {}", e)))?
    }

    async fn digest(&self, path: &Path) -> Result<String> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || hash_file(&path))
            .await
            .map_err(|e| Error::Internal(format!("hashing task failed: {}", e)))?
    }
}

async fn request_from(
    client: &ClientWithMiddleware,
    job: &FetchJob,
    offset: u64,
) -> reqwest_middleware::Result<reqwest::Response> {
    debug!("Requesting {} from byte {}", job.variant.url, offset);
    client
        .get(job.variant.url.as_str())
        .header(RANGE, format!("bytes={}-", offset))
        .send()
        .await
}

async fn write_chunk(file: &mut fs::File, chunk: &[u8]) -> io::Result<()> {
    file.write_all(chunk).await?;
    file.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_paths() {
        let variant = RemoteVariant::from_url(
            "PDF",
            "https://dl.example.com/book.pdf",
            10,
            "d41d8cd98f00b204e9800998ecf8427e",
        )
        .unwrap();
        let job = FetchJob::new(variant, "library/book/book.pdf");

        assert_eq!(job.part_path(), PathBuf::from("library/book/book.pdf.part"));
        assert_eq!(job.backup_path(), PathBuf::from("library/book/book.pdf.old"));
    }
}
