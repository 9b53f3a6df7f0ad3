//! Throughput and time-remaining accounting for one transfer.

use indicatif::HumanBytes;
use std::time::{Duration, Instant};

/// Byte counters of an in-flight transfer.
///
/// Throughput only counts bytes received in this run, so a resumed
/// transfer does not look faster than it is.
#[derive(Debug, Clone)]
pub struct TransferStats {
    started: Instant,
    offset: u64,
    downloaded: u64,
    total: u64,
}

impl TransferStats {
    /// Start accounting a transfer resuming at `offset` of `total` bytes.
    pub fn new(offset: u64, total: u64) -> Self {
        Self {
            started: Instant::now(),
            offset,
            downloaded: offset,
            total,
        }
    }

    /// Account `n` more bytes written to disk.
    pub fn record(&mut self, n: u64) {
        self.downloaded += n;
    }

    /// Bytes on disk, including the resumed part.
    pub fn downloaded(&self) -> u64 {
        self.downloaded
    }

    /// Bytes received during this run.
    pub fn received(&self) -> u64 {
        self.downloaded - self.offset
    }

    /// Full size of the file.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Whether exactly the announced number of bytes has arrived.
    pub fn is_complete(&self) -> bool {
        self.downloaded == self.total
    }

    /// Bytes per second over `elapsed`.
    pub fn throughput_over(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.received() as f64 / secs
    }

    /// Time remaining at the throughput observed over `elapsed`.
    pub fn eta_over(&self, elapsed: Duration) -> Option<Duration> {
        let speed = self.throughput_over(elapsed);
        if speed <= 0.0 {
            return None;
        }
        let remaining = self.total.saturating_sub(self.downloaded) as f64;
        Some(Duration::from_secs((remaining / speed) as u64))
    }

    /// Time since the transfer started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// One-line status: `done / total speed/s eta`.
    pub fn status_line(&self) -> String {
        let elapsed = self.elapsed();
        let eta = self
            .eta_over(elapsed)
            .map(format_eta)
            .unwrap_or_else(|| "-:--:--".to_string());
        format!(
            "{} / {} {}/s {:>8}",
            HumanBytes(self.downloaded),
            HumanBytes(self.total),
            HumanBytes(self.throughput_over(elapsed) as u64),
            eta
        )
    }
}

/// Format a duration as `H:MM:SS`.
pub fn format_eta(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_ignores_resumed_bytes() {
        let mut stats = TransferStats::new(500, 1500);
        stats.record(100);
        assert_eq!(stats.downloaded(), 600);
        assert_eq!(stats.received(), 100);
        assert_eq!(stats.throughput_over(Duration::from_secs(2)), 50.0);
    }

    #[test]
    fn test_eta() {
        let mut stats = TransferStats::new(0, 1000);
        stats.record(100);
        // 100 B/s, 900 bytes left
        assert_eq!(stats.eta_over(Duration::from_secs(1)), Some(Duration::from_secs(9)));
    }

    #[test]
    fn test_eta_without_progress() {
        let stats = TransferStats::new(0, 1000);
        assert_eq!(stats.throughput_over(Duration::ZERO), 0.0);
        assert_eq!(stats.eta_over(Duration::from_secs(5)), None);
        assert!(!stats.status_line().is_empty());
    }

    #[test]
    fn test_completion() {
        let mut stats = TransferStats::new(10, 20);
        assert!(!stats.is_complete());
        stats.record(10);
        assert!(stats.is_complete());
        stats.record(1);
        assert!(!stats.is_complete());
    }

    #[test]
    fn test_format_eta() {
        assert_eq!(format_eta(Duration::from_secs(0)), "0:00:00");
        assert_eq!(format_eta(Duration::from_secs(3725)), "1:02:05");
    }
}
