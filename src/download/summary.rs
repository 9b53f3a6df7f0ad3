//! Per-variant reconciliation results.
//!
//! Every variant handed to the reconciler produces exactly one [`Summary`],
//! whatever happened to it: already satisfied, fetched, or failed.
//!
//! # Examples
//!
//! ```rust
//! use bundlesync::download::{RemoteVariant, Status, Summary};
//! use bundlesync::reconcile::VariantState;
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), bundlesync::Error> {
//! let variant = RemoteVariant::from_url(
//!     "PDF",
//!     "https://dl.example.com/book.pdf",
//!     2048,
//!     "d41d8cd98f00b204e9800998ecf8427e",
//! )?;
//! let summary = Summary::new(variant, PathBuf::from("book/book.pdf"), VariantState::Missing)
//!     .fail("connection reset");
//!
//! match summary.status() {
//!     Status::Failed(msg) => println!("failed: {}", msg),
//!     _ => {}
//! }
//! # Ok(())
//! # }
//! ```

use super::variant::RemoteVariant;
use crate::reconcile::VariantState;

use reqwest::StatusCode;
use std::path::{Path, PathBuf};

/// Final status of one variant for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Not processed yet.
    NotStarted,
    /// The local copy already matches; nothing was transferred.
    Satisfied,
    /// The file was fetched and moved into place.
    Done,
    /// The transfer failed; any `.part` artifact is left for the next run.
    Failed(String),
    /// The transfer completed but the bytes do not hash to the expected digest.
    IntegrityMismatch(String),
}

/// Represents the outcome of reconciling a [`RemoteVariant`].
#[derive(Debug, Clone)]
pub struct Summary {
    /// Reconciled variant.
    variant: RemoteVariant,
    /// Final location of the file.
    target: PathBuf,
    /// What the assessment found before any transfer.
    state: VariantState,
    /// HTTP status of the transfer request, if one was made.
    statuscode: Option<StatusCode>,
    /// Offset the transfer resumed from.
    resumed_from: u64,
    /// Bytes received during this run.
    transferred: u64,
    /// Status.
    status: Status,
}

impl Summary {
    /// Create a new [`Summary`].
    pub fn new(variant: RemoteVariant, target: PathBuf, state: VariantState) -> Self {
        Self {
            variant,
            target,
            state,
            statuscode: None,
            resumed_from: 0,
            transferred: 0,
            status: Status::NotStarted,
        }
    }

    /// Attach a status.
    pub fn with_status(self, status: Status) -> Self {
        Self { status, ..self }
    }

    /// Attach the HTTP status of the transfer request.
    pub fn with_statuscode(self, statuscode: StatusCode) -> Self {
        Self {
            statuscode: Some(statuscode),
            ..self
        }
    }

    /// Record the resume offset and the bytes received.
    pub fn with_transfer(self, resumed_from: u64, transferred: u64) -> Self {
        Self {
            resumed_from,
            transferred,
            ..self
        }
    }

    /// Get a reference to the reconciled variant.
    pub fn variant(&self) -> &RemoteVariant {
        &self.variant
    }

    /// Get the target path.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Get the assessment state.
    pub fn state(&self) -> &VariantState {
        &self.state
    }

    /// Get the HTTP status of the transfer request.
    pub fn statuscode(&self) -> Option<StatusCode> {
        self.statuscode
    }

    /// Get the offset the transfer resumed from.
    pub fn resumed_from(&self) -> u64 {
        self.resumed_from
    }

    /// Get the number of bytes received during this run.
    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    /// Get a reference to the summary's status.
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Whether the variant ended the run with a good local copy.
    pub fn is_ok(&self) -> bool {
        matches!(self.status, Status::Satisfied | Status::Done)
    }

    /// Mark the summary as satisfied.
    pub fn satisfied(self) -> Self {
        self.with_status(Status::Satisfied)
    }

    /// Mark the summary as failed with a message.
    pub fn fail(self, msg: impl std::fmt::Display) -> Self {
        Self {
            status: Status::Failed(format!("{}", msg)),
            ..self
        }
    }

    /// Mark the summary as having a digest mismatch with a message.
    pub fn integrity_mismatch(self, msg: impl std::fmt::Display) -> Self {
        Self {
            status: Status::IntegrityMismatch(format!("{}", msg)),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_summary() -> Summary {
        let variant = RemoteVariant::from_url(
            "Download",
            "http://example.com/test.zip",
            1024,
            "d41d8cd98f00b204e9800998ecf8427e",
        )
        .unwrap();
        Summary::new(variant, PathBuf::from("test/test.zip"), VariantState::Missing)
    }

    #[test]
    fn test_summary_creation() {
        let summary = create_test_summary();

        assert_eq!(summary.variant().filename, "test.zip");
        assert_eq!(summary.target(), Path::new("test/test.zip"));
        assert_eq!(summary.state(), &VariantState::Missing);
        assert_eq!(summary.status(), &Status::NotStarted);
        assert_eq!(summary.statuscode(), None);
        assert_eq!(summary.transferred(), 0);
        assert!(!summary.is_ok());
    }

    #[test]
    fn test_summary_done_with_transfer() {
        let summary = create_test_summary()
            .with_statuscode(StatusCode::PARTIAL_CONTENT)
            .with_transfer(512, 512)
            .with_status(Status::Done);

        assert_eq!(summary.statuscode(), Some(StatusCode::PARTIAL_CONTENT));
        assert_eq!(summary.resumed_from(), 512);
        assert_eq!(summary.transferred(), 512);
        assert!(summary.is_ok());
    }

    #[test]
    fn test_summary_fail() {
        let summary = create_test_summary().fail("Network error");

        match summary.status() {
            Status::Failed(msg) => assert_eq!(msg, "Network error"),
            _ => panic!("Expected Failed status"),
        }
        assert!(!summary.is_ok());
    }

    #[test]
    fn test_summary_integrity_mismatch() {
        let summary = create_test_summary().integrity_mismatch("expected abc, got def");

        match summary.status() {
            Status::IntegrityMismatch(msg) => assert_eq!(msg, "expected abc, got def"),
            _ => panic!("Expected IntegrityMismatch status"),
        }
    }

    #[test]
    fn test_summary_satisfied() {
        assert!(create_test_summary().satisfied().is_ok());
    }
}
