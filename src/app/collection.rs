//! Single-collection download pipeline
//!
//! A collection is retrieved in strictly sequential steps: create its output
//! directory, fetch the listing page, keep a raw copy of it, parse it, transfer
//! every matching file one at a time, and finally write a metadata sidecar.
//!
//! Failures of the directory, fetch, persist, parse, and metadata steps end
//! the collection with a failed outcome. A single failed file transfer is
//! logged and skipped; the collection can still succeed without it.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, SecondsFormat};
use tracing::{debug, info, warn};

use crate::app::client::LexinClient;
use crate::app::listing;
use crate::app::models::{Collection, DownloadOutcome, ListingEntry};
use crate::constants::files::{INDEX_FILE_NAME, METADATA_FILE_NAME};
use crate::errors::{CollectionError, TransferError, TransferResult};

/// Something that can download one collection into an output root
///
/// Implementations never fail: every problem is reported inside the
/// returned outcome.
#[async_trait]
pub trait CollectionDownload: Send + Sync {
    /// Download `collection` into `output_root/<code>`
    async fn download_collection(
        &self,
        collection: &Collection,
        output_root: &Path,
    ) -> DownloadOutcome;
}

/// Contents of the `metadata.txt` sidecar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionMetadata {
    pub code: String,
    pub name: String,
    pub url: String,
    pub downloaded_at: DateTime<Local>,
    pub file_count: usize,
    pub total_bytes: u64,
}

impl CollectionMetadata {
    fn new(collection: &Collection, file_count: usize, total_bytes: u64) -> Self {
        Self {
            code: collection.code.clone(),
            name: collection.display_name.clone(),
            url: collection.source_url.clone(),
            downloaded_at: Local::now(),
            file_count,
            total_bytes,
        }
    }
}

impl fmt::Display for CollectionMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Code: {}", self.code)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "URL: {}", self.url)?;
        writeln!(
            f,
            "Downloaded: {}",
            self.downloaded_at.to_rfc3339_opts(SecondsFormat::Secs, false)
        )?;
        writeln!(f, "Files: {}", self.file_count)?;
        writeln!(f, "Total Size: {} bytes", self.total_bytes)
    }
}

/// Tally of the file transfer step
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct TransferTally {
    files: usize,
    bytes: u64,
    failed: usize,
}

/// HTTP-backed collection downloader
#[derive(Debug, Clone)]
pub struct CollectionDownloader {
    client: Arc<LexinClient>,
}

impl CollectionDownloader {
    /// Create a downloader sharing the given client
    pub fn new(client: Arc<LexinClient>) -> Self {
        Self { client }
    }

    async fn run(
        &self,
        collection: &Collection,
        output_root: &Path,
    ) -> Result<TransferTally, CollectionError> {
        let dir_path = output_root.join(&collection.code);
        tokio::fs::create_dir_all(&dir_path)
            .await
            .map_err(|source| CollectionError::Directory {
                path: dir_path.clone(),
                source,
            })?;

        let index_content = self
            .client
            .fetch(&collection.source_url)
            .await
            .map_err(|source| CollectionError::Fetch {
                url: collection.source_url.clone(),
                source,
            })?;

        let index_path = dir_path.join(INDEX_FILE_NAME);
        tokio::fs::write(&index_path, &index_content)
            .await
            .map_err(|source| CollectionError::Persist {
                path: index_path,
                source,
            })?;

        let entries = listing::parse_listing(&index_content)?;
        info!(
            "{}: {} files to download",
            collection.code,
            entries.len()
        );

        let tally = self.transfer_all(collection, &dir_path, &entries).await;

        let metadata = CollectionMetadata::new(collection, tally.files, tally.bytes);
        let metadata_path = dir_path.join(METADATA_FILE_NAME);
        tokio::fs::write(&metadata_path, metadata.to_string())
            .await
            .map_err(|source| CollectionError::Metadata {
                path: metadata_path,
                source,
            })?;

        Ok(tally)
    }

    async fn transfer_all(
        &self,
        collection: &Collection,
        dir_path: &Path,
        entries: &[ListingEntry],
    ) -> TransferTally {
        let mut tally = TransferTally::default();

        for entry in entries {
            let url = entry.url_under(&collection.source_url);
            match self.transfer_entry(dir_path, entry, &url).await {
                Ok(bytes) => {
                    tally.files += 1;
                    tally.bytes += bytes;
                }
                Err(e) => {
                    warn!("Error downloading {}/{}: {}", collection.code, entry.name, e);
                    tally.failed += 1;
                }
            }
        }

        tally
    }

    async fn transfer_entry(
        &self,
        dir_path: &Path,
        entry: &ListingEntry,
        url: &str,
    ) -> TransferResult<u64> {
        let file_path = local_path_for(dir_path, &entry.name)?;
        debug!("Downloading {} -> {}", url, file_path.display());
        self.client.transfer(&file_path, url).await
    }
}

#[async_trait]
impl CollectionDownload for CollectionDownloader {
    async fn download_collection(
        &self,
        collection: &Collection,
        output_root: &Path,
    ) -> DownloadOutcome {
        match self.run(collection, output_root).await {
            Ok(tally) => {
                info!(
                    "{}: completed with {} files ({} bytes, {} failed)",
                    collection.code, tally.files, tally.bytes, tally.failed
                );
                DownloadOutcome::succeeded(
                    collection.clone(),
                    tally.files,
                    tally.bytes,
                    tally.failed,
                )
            }
            Err(e) => {
                warn!("{}: {} failure: {}", collection.code, e.kind(), e);
                DownloadOutcome::failed(collection.clone(), e)
            }
        }
    }
}

/// Resolve an entry name to a path directly inside the collection directory
///
/// Names that are empty, absolute, or contain separators or `..` are refused.
fn local_path_for(dir_path: &Path, name: &str) -> TransferResult<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(file_name)), None) => Ok(dir_path.join(file_name)),
        _ => Err(TransferError::UnsafeName {
            name: name.to_string(),
        }),
    }
}
