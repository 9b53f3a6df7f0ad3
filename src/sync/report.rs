//! Outcome of a full run.

use crate::download::{Status, Summary};

use std::path::PathBuf;

/// Per-variant summaries plus the orphan report.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// One summary per reconciled variant, in processing order.
    pub summaries: Vec<Summary>,
    /// Files under product directories that no variant accounts for.
    pub orphans: Vec<PathBuf>,
}

impl SyncReport {
    /// Variants that were already up to date.
    pub fn satisfied(&self) -> usize {
        self.count(|s| matches!(s, Status::Satisfied))
    }

    /// Variants fetched during this run.
    pub fn done(&self) -> usize {
        self.count(|s| matches!(s, Status::Done))
    }

    /// Variants that failed, integrity mismatches included.
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, Status::Failed(_) | Status::IntegrityMismatch(_)))
    }

    /// Bytes received over the network during this run.
    pub fn transferred(&self) -> u64 {
        self.summaries.iter().map(|s| s.transferred()).sum()
    }

    /// Whether every variant ended with a good local copy.
    pub fn is_success(&self) -> bool {
        self.summaries.iter().all(|s| s.is_ok())
    }

    fn count(&self, pred: impl Fn(&Status) -> bool) -> usize {
        self.summaries.iter().filter(|s| pred(s.status())).count()
    }
}
