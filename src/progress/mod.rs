//! Progress reporting.
//!
//! Console bars for a reconciliation pass plus the byte accounting behind
//! the throughput and ETA figures written to the log. Reporting is best
//! effort: nothing in here can fail a transfer.
//!
//! # Overview
//!
//! - `style` - Bar templates and options
//! - `display` - Overall and per-transfer bar coordination
//! - `transfer` - Throughput and time remaining for one transfer

pub(crate) mod display;
pub(crate) mod style;
pub mod transfer;

pub use display::ProgressDisplay;
pub use style::{ProgressBarOpts, StyleOptions};
pub use transfer::{format_eta, TransferStats};
