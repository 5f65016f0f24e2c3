//! Unit tests for the download manager
//!
//! These tests drive the manager with in-memory downloaders so concurrency,
//! completion, and failure isolation can be observed without a network.
//! End-to-end runs against a mock server live in the top-level tests
//! directory.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use tempfile::TempDir;
use tokio::sync::Notify;
use tokio_test::assert_pending;

use crate::app::collection::CollectionDownload;
use crate::app::models::{Collection, DownloadOutcome};
use crate::errors::{CollectionError, ConfigError};

use super::*;

/// Downloader that records how many runs overlap
#[derive(Default)]
struct InstrumentedDownload {
    current: AtomicUsize,
    peak: AtomicUsize,
    started: AtomicUsize,
    delay: Duration,
    failing: HashSet<String>,
    panicking: HashSet<String>,
}

impl InstrumentedDownload {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    fn failing(mut self, code: &str) -> Self {
        self.failing.insert(code.to_string());
        self
    }

    fn panicking(mut self, code: &str) -> Self {
        self.panicking.insert(code.to_string());
        self
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CollectionDownload for InstrumentedDownload {
    async fn download_collection(
        &self,
        collection: &Collection,
        output_root: &Path,
    ) -> DownloadOutcome {
        self.started.fetch_add(1, Ordering::SeqCst);
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;
        self.current.fetch_sub(1, Ordering::SeqCst);

        if self.panicking.contains(&collection.code) {
            panic!("simulated crash in {}", collection.code);
        }

        if self.failing.contains(&collection.code) {
            let url = collection.source_url.clone();
            return DownloadOutcome::failed(
                collection.clone(),
                CollectionError::Fetch {
                    url: url.clone(),
                    source: crate::errors::FetchError::Status { url, status: 404 },
                },
            );
        }

        assert!(output_root.is_dir());
        DownloadOutcome::succeeded(collection.clone(), 2, 10, 0)
    }
}

/// Downloader that blocks until released
struct GatedDownload {
    gate: Arc<Notify>,
}

#[async_trait]
impl CollectionDownload for GatedDownload {
    async fn download_collection(&self, collection: &Collection, _: &Path) -> DownloadOutcome {
        self.gate.notified().await;
        DownloadOutcome::succeeded(collection.clone(), 1, 1, 0)
    }
}

/// Create `count` distinct test collections
pub fn create_test_collections(count: usize) -> Vec<Collection> {
    (0..count)
        .map(|i| {
            let code = format!("lang{:02}", i);
            Collection::from_catalog_entry(&code, &format!("{}/", code), "http://host/lexin/")
        })
        .collect()
}

fn manager_with(
    temp_dir: &TempDir,
    max_concurrency: usize,
    downloader: Arc<dyn CollectionDownload>,
) -> DownloadManager {
    DownloadManager::new(
        ManagerConfig::new(temp_dir.path().join("out"), max_concurrency),
        downloader,
    )
    .unwrap()
}

#[tokio::test]
async fn test_rejects_zero_concurrency() {
    let result = DownloadManager::new(
        ManagerConfig::new("out", 0),
        Arc::new(InstrumentedDownload::default()),
    );
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

/// Never more than `max_concurrency` downloads run at once, and the bound is
/// actually reached when there is enough work
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_is_bounded() {
    let temp_dir = TempDir::new().unwrap();
    let downloader = Arc::new(InstrumentedDownload::with_delay(Duration::from_millis(30)));
    let manager = manager_with(&temp_dir, 3, downloader.clone());

    let outcomes = manager.start(create_test_collections(10)).collect_all().await;

    assert_eq!(outcomes.len(), 10);
    assert!(downloader.peak() <= 3, "peak was {}", downloader.peak());
    assert_eq!(downloader.peak(), 3);
    assert_eq!(downloader.current.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_permit_serializes_downloads() {
    let temp_dir = TempDir::new().unwrap();
    let downloader = Arc::new(InstrumentedDownload::with_delay(Duration::from_millis(5)));
    let manager = manager_with(&temp_dir, 1, downloader.clone());

    let outcomes = manager.start(create_test_collections(5)).collect_all().await;

    assert_eq!(outcomes.len(), 5);
    assert_eq!(downloader.peak(), 1);
}

/// One outcome per input, each collection exactly once, then end of stream
#[tokio::test]
async fn test_one_outcome_per_collection_then_close() {
    let temp_dir = TempDir::new().unwrap();
    let downloader = Arc::new(InstrumentedDownload::with_delay(Duration::from_millis(1)));
    let manager = manager_with(&temp_dir, 4, downloader.clone());
    let collections = create_test_collections(7);

    let mut stream = manager.start(collections.clone());
    assert_eq!(stream.expected(), 7);

    let mut seen = HashSet::new();
    while let Some(outcome) = stream.recv().await {
        assert!(seen.insert(outcome.code().to_string()), "duplicate outcome");
    }

    assert_eq!(seen.len(), 7);
    for collection in &collections {
        assert!(seen.contains(&collection.code));
    }
    assert_eq!(downloader.started.load(Ordering::SeqCst), 7);
    // Closed streams stay closed
    assert!(stream.recv().await.is_none());
}

#[tokio::test]
async fn test_empty_selection_closes_immediately() {
    let temp_dir = TempDir::new().unwrap();
    let manager = manager_with(&temp_dir, 2, Arc::new(InstrumentedDownload::default()));

    let mut stream = manager.start(Vec::new());
    assert_eq!(stream.expected(), 0);
    assert!(stream.recv().await.is_none());
}

#[tokio::test]
async fn test_failure_does_not_affect_siblings() {
    let temp_dir = TempDir::new().unwrap();
    let downloader = Arc::new(
        InstrumentedDownload::with_delay(Duration::from_millis(2)).failing("lang01"),
    );
    let manager = manager_with(&temp_dir, 2, downloader);

    let outcomes = manager.start(create_test_collections(4)).collect_all().await;

    assert_eq!(outcomes.len(), 4);
    for outcome in &outcomes {
        if outcome.code() == "lang01" {
            assert!(!outcome.success);
            assert_eq!(outcome.file_count, 0);
            assert!(matches!(outcome.error, Some(CollectionError::Fetch { .. })));
        } else {
            assert!(outcome.success);
            assert!(outcome.error.is_none());
            assert_eq!(outcome.file_count, 2);
        }
    }
}

#[tokio::test]
async fn test_panic_becomes_failed_outcome() {
    let temp_dir = TempDir::new().unwrap();
    let downloader = Arc::new(
        InstrumentedDownload::with_delay(Duration::from_millis(1)).panicking("lang02"),
    );
    let manager = manager_with(&temp_dir, 2, downloader);

    let outcomes = manager.start(create_test_collections(3)).collect_all().await;

    assert_eq!(outcomes.len(), 3);
    let crashed = outcomes
        .iter()
        .find(|outcome| outcome.code() == "lang02")
        .unwrap();
    assert!(!crashed.success);
    match &crashed.error {
        Some(CollectionError::Panicked { message }) => {
            assert!(message.contains("simulated crash in lang02"))
        }
        other => panic!("Expected Panicked error, got {:?}", other),
    }
    assert_eq!(outcomes.iter().filter(|outcome| outcome.success).count(), 2);
}

/// An output root that cannot be created fails every collection explicitly
#[tokio::test]
async fn test_unusable_output_root_fails_every_collection() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    tokio::fs::write(&blocker, "not a directory").await.unwrap();

    let downloader = Arc::new(InstrumentedDownload::default());
    let manager = DownloadManager::new(
        ManagerConfig::new(blocker.join("out"), 2),
        downloader.clone(),
    )
    .unwrap();

    let outcomes = manager.start(create_test_collections(3)).collect_all().await;

    assert_eq!(outcomes.len(), 3);
    for outcome in &outcomes {
        assert!(!outcome.success);
        assert!(matches!(outcome.error, Some(CollectionError::Directory { .. })));
    }
    assert_eq!(downloader.started.load(Ordering::SeqCst), 0);
}

/// The stream stays open while a run is still in flight
#[tokio::test]
async fn test_stream_pending_until_runs_complete() {
    let temp_dir = TempDir::new().unwrap();
    let gate = Arc::new(Notify::new());
    let manager = manager_with(&temp_dir, 2, Arc::new(GatedDownload { gate: gate.clone() }));

    let mut stream = manager.start(create_test_collections(1));

    // Let the supervisor spawn its task and block on the gate
    tokio::time::sleep(Duration::from_millis(20)).await;
    {
        let mut next = tokio_test::task::spawn(stream.recv());
        assert_pending!(next.poll());
    }

    gate.notify_one();
    let outcome = stream.recv().await.unwrap();
    assert!(outcome.success);
    assert!(stream.recv().await.is_none());
}

#[tokio::test]
async fn test_outcome_stream_as_futures_stream() {
    let temp_dir = TempDir::new().unwrap();
    let manager = manager_with(&temp_dir, 3, Arc::new(InstrumentedDownload::default()));

    let stream = manager.start(create_test_collections(5));
    assert_eq!(stream.size_hint(), (0, Some(5)));

    let codes: Vec<String> = stream
        .map(|outcome| outcome.code().to_string())
        .collect()
        .await;
    assert_eq!(codes.len(), 5);
}

#[tokio::test]
async fn test_summary_over_session() {
    let temp_dir = TempDir::new().unwrap();
    let downloader = Arc::new(InstrumentedDownload::default().failing("lang00"));
    let manager = manager_with(&temp_dir, 2, downloader);

    let mut stream = manager.start(create_test_collections(3));
    let mut summary = DownloadSummary::new(stream.expected());
    while let Some(outcome) = stream.recv().await {
        summary.record(&outcome);
    }

    assert!(summary.is_complete());
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.files, 4);
    assert_eq!(summary.bytes, 20);
    assert!(summary.last_error.unwrap().starts_with("lang00: "));
}
