//! Live outcome reporting for download sessions
//!
//! Prints one table row per collection the moment its outcome arrives,
//! followed by a summary once the outcome stream closes. On a terminal an
//! indicatif bar tracks how many collections are done; rows are printed above
//! it. Without a terminal, plain lines are written.

use std::io::{self, Write};

use indicatif::{HumanBytes, HumanDuration, ProgressBar, ProgressStyle};
use tracing::debug;

use crate::app::manager::DownloadSummary;
use crate::app::models::DownloadOutcome;

/// Configuration for progress display
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Show a progress bar when stderr is a terminal
    pub enable_progress_bar: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enable_progress_bar: true,
        }
    }
}

/// Reporter consuming outcomes as they arrive
pub struct OutcomeReporter {
    summary: DownloadSummary,
    progress_bar: Option<ProgressBar>,
}

impl OutcomeReporter {
    /// Create a reporter for a session of `expected` collections
    pub fn new(expected: usize, config: ProgressConfig) -> Self {
        let is_terminal = atty::is(atty::Stream::Stderr);
        let progress_bar = if config.enable_progress_bar && is_terminal && expected > 0 {
            Some(create_progress_bar(expected))
        } else {
            debug!("Progress bar disabled, using plain output");
            None
        };

        Self {
            summary: DownloadSummary::new(expected),
            progress_bar,
        }
    }

    /// Print the table header
    pub fn start(&self) {
        self.print(&format_header());
    }

    /// Record one outcome and print its row
    pub fn report(&mut self, outcome: &DownloadOutcome) {
        self.summary.record(outcome);
        let row = format_row(outcome, self.summary.processed, self.summary.expected);
        self.print(&row);

        if let Some(bar) = &self.progress_bar {
            bar.inc(1);
            bar.set_message(outcome.code().to_string());
        }
    }

    /// Current totals
    pub fn summary(&self) -> &DownloadSummary {
        &self.summary
    }

    /// Clear the progress bar, print the summary, and hand back the totals
    pub fn finish(self) -> DownloadSummary {
        if let Some(bar) = &self.progress_bar {
            bar.finish_and_clear();
        }
        println!("{}", format_summary(&self.summary));
        self.summary
    }

    fn print(&self, line: &str) {
        match &self.progress_bar {
            Some(bar) => bar.suspend(|| println!("{}", line)),
            None => {
                println!("{}", line);
                let _ = io::stdout().flush();
            }
        }
    }
}

fn create_progress_bar(expected: usize) -> ProgressBar {
    let bar = ProgressBar::new(expected as u64);
    match ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        Ok(style) => bar.set_style(style.progress_chars("##-")),
        Err(e) => debug!("Progress bar template error: {}", e),
    }
    bar.enable_steady_tick(std::time::Duration::from_millis(120));
    bar
}

/// Table header with its rule line
pub fn format_header() -> String {
    format!(
        "{:<15} {:<20} {:<10} {:<10}\n{}",
        "LANGUAGE",
        "STATUS",
        "FILES",
        "SIZE",
        "-".repeat(60)
    )
}

/// One table row: code, status, file count, size, and `[completed/total]`
pub fn format_row(outcome: &DownloadOutcome, completed: usize, total: usize) -> String {
    let status = if !outcome.success {
        "ERROR".to_string()
    } else if outcome.files_failed > 0 {
        format!("COMPLETED, {} skipped", outcome.files_failed)
    } else {
        "COMPLETED".to_string()
    };

    let size = if outcome.success {
        HumanBytes(outcome.total_bytes).to_string()
    } else {
        "N/A".to_string()
    };

    format!(
        "{:<15} {:<20} {:<10} {:<10} [{}/{}]",
        outcome.code(),
        status,
        outcome.file_count,
        size,
        completed,
        total
    )
}

/// Final summary block
pub fn format_summary(summary: &DownloadSummary) -> String {
    let mut text = format!(
        "\nDownload summary:\n- Languages processed: {}\n- Succeeded: {}\n- Failed: {}\n- Files: {} ({})\n- Time elapsed: {}",
        summary.processed,
        summary.succeeded,
        summary.failed,
        summary.files,
        HumanBytes(summary.bytes),
        HumanDuration(summary.elapsed())
    );

    if summary.files_skipped > 0 {
        text.push_str(&format!(
            "\n- Files skipped after errors: {}",
            summary.files_skipped
        ));
    }

    if let Some(error) = &summary.last_error {
        text.push_str(&format!("\n- Last error: {}", error));
    }

    text
}
