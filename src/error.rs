//! Error handling for bundlesync.
//!
//! A single error enum covers every failure the library can report. Most of
//! them are local to one variant or one product: the reconciler turns them
//! into a failed [`Summary`](crate::download::Summary) and moves on, the
//! catalog builder logs them and skips the product. Only [`Error::Session`]
//! is meant to stop a whole run.

use reqwest::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can happen while mirroring a catalog.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    ///
    /// Captures failures that don't fit any other category, such as a
    /// panicked blocking task.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A download URL could not be parsed or carries no file name.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// I/O Error.
    ///
    /// Permission problems, full disks and path collisions all land here.
    #[error("I/O error: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest error: {source}")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Error raised by the HTTP middleware stack (retries, tracing).
    #[error("HTTP middleware error: {source}")]
    Middleware {
        #[from]
        source: reqwest_middleware::Error,
    },

    /// A JSON document could not be read or written.
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// The server answered a transfer request with a non-success status.
    #[error("{url} answered with HTTP {status}")]
    Network { url: String, status: StatusCode },

    /// A completed file does not hash to the digest the catalog announced.
    #[error("{} has digest {actual}, expected {expected}", path.display())]
    IntegrityMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// The server is about to send a file of another size than the catalog
    /// announced.
    #[error("{url} serves {actual} bytes, the catalog announced {expected}")]
    SizeMismatch {
        url: String,
        expected: u64,
        actual: u64,
    },

    /// An order document is missing fields or changed shape.
    #[error("Unexpected order schema: {0}")]
    Schema(String),

    /// The storefront used a platform tag this crate does not know.
    #[error("Unknown platform \"{0}\"")]
    UnknownPlatform(String),

    /// The session credential is missing or was rejected.
    #[error("Session error: {0}")]
    Session(String),
}

/// Result type alias for bundlesync operations.
pub type Result<T> = std::result::Result<T, Error>;
