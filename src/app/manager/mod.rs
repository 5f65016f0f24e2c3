//! Concurrent download orchestration
//!
//! The manager runs one collection download per selected collection with a
//! fixed upper bound on how many run at once, and hands the caller an
//! [`OutcomeStream`] that yields each outcome as soon as its collection
//! finishes.
//!
//! # Architecture
//!
//! - Every collection gets its own task, spawned eagerly. A task waits for a
//!   permit from a shared semaphore sized to `max_concurrency`, runs the
//!   downloader, publishes its outcome, and drops the permit.
//! - A supervisor task owns the completion barrier (a `JoinSet` drained to
//!   empty) and the last sender of the outcome channel. Dropping that sender
//!   after the barrier is the only way the stream closes.
//! - A panicking download still produces a failed outcome, so the caller
//!   always receives exactly one outcome per collection.
//!
//! - [`config`] - Session configuration and validation
//! - [`stream`] - The outcome stream handed to callers
//! - [`summary`] - Caller-side aggregation of outcomes
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lexin_fetcher::app::{CollectionDownloader, DownloadManager, LexinClient, ManagerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(LexinClient::new()?);
//! let collections = client.fetch_catalog("https://sprakresurser.isof.se/lexin/").await?;
//!
//! let manager = DownloadManager::new(
//!     ManagerConfig::new("lexin_downloads", 3),
//!     Arc::new(CollectionDownloader::new(client)),
//! )?;
//!
//! let mut outcomes = manager.start(collections);
//! while let Some(outcome) = outcomes.recv().await {
//!     println!("{}: {}", outcome.code(), outcome.success);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod stream;
pub mod summary;

#[cfg(test)]
pub mod tests;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::app::collection::CollectionDownload;
use crate::app::models::{Collection, DownloadOutcome};
use crate::errors::{CollectionError, ConfigResult};

pub use config::ManagerConfig;
pub use stream::OutcomeStream;
pub use summary::DownloadSummary;

/// Runs collection downloads with bounded parallelism
pub struct DownloadManager {
    config: ManagerConfig,
    downloader: Arc<dyn CollectionDownload>,
}

impl DownloadManager {
    /// Create a manager for the given configuration and downloader
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid
    pub fn new(
        config: ManagerConfig,
        downloader: Arc<dyn CollectionDownload>,
    ) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { config, downloader })
    }

    /// Active configuration
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Start downloading the given collections
    ///
    /// Returns immediately; the work proceeds on the tokio runtime whether or
    /// not the stream is polled. Must be called from within a runtime.
    pub fn start(&self, collections: Vec<Collection>) -> OutcomeStream {
        let expected = collections.len();
        let (sender, receiver) = mpsc::channel(expected.max(1));

        info!(
            "Starting download of {} collections into {} ({} at a time)",
            expected,
            self.config.output_root.display(),
            self.config.max_concurrency
        );

        let supervisor = Supervisor {
            output_root: self.config.output_root.clone(),
            permits: Arc::new(Semaphore::new(self.config.max_concurrency)),
            downloader: Arc::clone(&self.downloader),
            sender,
        };
        tokio::spawn(supervisor.run(collections));

        OutcomeStream::new(receiver, expected)
    }
}

/// Owner of the completion barrier and the last outcome sender
struct Supervisor {
    output_root: PathBuf,
    permits: Arc<Semaphore>,
    downloader: Arc<dyn CollectionDownload>,
    sender: mpsc::Sender<DownloadOutcome>,
}

impl Supervisor {
    async fn run(self, collections: Vec<Collection>) {
        if let Err(source) = tokio::fs::create_dir_all(&self.output_root).await {
            error!(
                "Cannot create output directory {}: {}",
                self.output_root.display(),
                source
            );
            self.fail_all(collections, &source).await;
            return;
        }

        let mut tasks = JoinSet::new();
        for collection in collections {
            tasks.spawn(run_collection(
                collection,
                self.output_root.clone(),
                Arc::clone(&self.permits),
                Arc::clone(&self.downloader),
                self.sender.clone(),
            ));
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!("Collection task did not finish: {}", e);
            }
        }

        debug!("All collection tasks finished, closing outcome stream");
        // `self.sender` is dropped here, closing the stream
    }

    async fn fail_all(&self, collections: Vec<Collection>, source: &std::io::Error) {
        for collection in collections {
            let error = CollectionError::Directory {
                path: self.output_root.clone(),
                source: std::io::Error::new(source.kind(), source.to_string()),
            };
            if self
                .sender
                .send(DownloadOutcome::failed(collection, error))
                .await
                .is_err()
            {
                debug!("Outcome stream dropped by caller");
                return;
            }
        }
    }
}

async fn run_collection(
    collection: Collection,
    output_root: PathBuf,
    permits: Arc<Semaphore>,
    downloader: Arc<dyn CollectionDownload>,
    sender: mpsc::Sender<DownloadOutcome>,
) {
    // The semaphore is never closed
    let permit = permits.acquire_owned().await.ok();
    debug!("{}: download started", collection.code);

    let result = AssertUnwindSafe(downloader.download_collection(&collection, &output_root))
        .catch_unwind()
        .await;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("{}: download panicked: {}", collection.code, message);
            DownloadOutcome::failed(collection, CollectionError::Panicked { message })
        }
    };

    if sender.send(outcome).await.is_err() {
        debug!("Outcome stream dropped by caller");
    }
    drop(permit);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
