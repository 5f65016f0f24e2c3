//! Session summary aggregation
//!
//! Callers fold each outcome into a `DownloadSummary` as it arrives. When
//! several collections fail, the most recent failure is the one retained.

use std::time::{Duration, Instant};

use crate::app::models::DownloadOutcome;

/// Aggregated totals of a download session
#[derive(Debug, Clone)]
pub struct DownloadSummary {
    /// Collections expected in this session
    pub expected: usize,
    /// Outcomes received so far
    pub processed: usize,
    /// Collections that completed
    pub succeeded: usize,
    /// Collections that failed
    pub failed: usize,
    /// Files transferred across successful collections
    pub files: usize,
    /// Bytes transferred across successful collections
    pub bytes: u64,
    /// Individual file transfers that were skipped
    pub files_skipped: usize,
    /// Most recent failure, as "code: message"
    pub last_error: Option<String>,
    started: Instant,
}

impl DownloadSummary {
    /// Start a summary for a session of `expected` collections
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            processed: 0,
            succeeded: 0,
            failed: 0,
            files: 0,
            bytes: 0,
            files_skipped: 0,
            last_error: None,
            started: Instant::now(),
        }
    }

    /// Fold one outcome into the totals
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        self.processed += 1;
        if outcome.success {
            self.succeeded += 1;
            self.files += outcome.file_count;
            self.bytes += outcome.total_bytes;
            self.files_skipped += outcome.files_failed;
        } else {
            self.failed += 1;
            let message = outcome
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "unknown error".to_string());
            self.last_error = Some(format!("{}: {}", outcome.code(), message));
        }
    }

    /// Time since the summary was started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whether every received outcome succeeded
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Whether as many outcomes as expected have been received
    pub fn is_complete(&self) -> bool {
        self.processed >= self.expected
    }
}
