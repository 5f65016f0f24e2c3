//! Streaming file transfer
//!
//! A transfer creates (or truncates) the destination, requests the remote
//! resource, and copies the body to disk chunk by chunk through a buffered
//! writer, so no payload is held in memory as a whole.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, warn};

use crate::app::client::http::HttpHandler;
use crate::constants::files;
use crate::errors::{FetchError, TransferError, TransferResult};

/// File transfer handler bound to a shared HTTP client
pub struct DownloadHandler<'a> {
    http_handler: &'a HttpHandler,
}

impl<'a> DownloadHandler<'a> {
    /// Creates a new DownloadHandler with the given HTTP handler
    pub fn new(http_handler: &'a HttpHandler) -> Self {
        Self { http_handler }
    }

    /// Transfers one remote resource to a local path
    ///
    /// Returns the number of bytes written. A failed transfer removes the
    /// partially written destination.
    ///
    /// # Errors
    ///
    /// Returns `TransferError` if:
    /// - The destination cannot be created
    /// - The request fails or the server answers with a non-success status
    /// - The body stream breaks or cannot be written to disk
    pub async fn transfer(&self, destination: &Path, url: &str) -> TransferResult<u64> {
        let file = File::create(destination)
            .await
            .map_err(|source| TransferError::Create {
                path: destination.to_path_buf(),
                source,
            })?;

        match self.stream_to(file, destination, url).await {
            Ok(bytes) => {
                debug!("Transferred {} bytes to {}", bytes, destination.display());
                Ok(bytes)
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(destination).await {
                    warn!(
                        "Could not remove partial file {}: {}",
                        destination.display(),
                        cleanup
                    );
                }
                Err(e)
            }
        }
    }

    async fn stream_to(&self, file: File, destination: &Path, url: &str) -> TransferResult<u64> {
        let mut response = self.http_handler.get_response(url).await?;
        let mut writer = BufWriter::with_capacity(files::WRITE_BUFFER_SIZE, file);
        let mut written: u64 = 0;

        let write_error = |source| TransferError::Write {
            path: destination.to_path_buf(),
            source,
        };

        while let Some(chunk) = response.chunk().await.map_err(FetchError::Http)? {
            writer.write_all(&chunk).await.map_err(write_error)?;
            written += chunk.len() as u64;
        }
        writer.flush().await.map_err(write_error)?;

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::app::client::config::ClientConfig;

    fn test_handler() -> HttpHandler {
        HttpHandler::new(ClientConfig::default().build_http_client().unwrap())
    }

    #[tokio::test]
    async fn test_transfer_writes_body_and_counts_bytes() {
        let server = MockServer::start().await;
        let body = "<lexikon>".repeat(10_000);
        Mock::given(method("GET"))
            .and(path("/svenska/a.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
            .mount(&server)
            .await;

        let temp_dir = tempdir().unwrap();
        let destination = temp_dir.path().join("a.xml");
        let http_handler = test_handler();
        let handler = DownloadHandler::new(&http_handler);

        let written = handler
            .transfer(&destination, &format!("{}/svenska/a.xml", server.uri()))
            .await
            .unwrap();

        assert_eq!(written, body.len() as u64);
        let on_disk = tokio::fs::read_to_string(&destination).await.unwrap();
        assert_eq!(on_disk, body);
    }

    #[tokio::test]
    async fn test_transfer_truncates_existing_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("new"))
            .mount(&server)
            .await;

        let temp_dir = tempdir().unwrap();
        let destination = temp_dir.path().join("b.xml");
        tokio::fs::write(&destination, "a much longer stale body").await.unwrap();

        let http_handler = test_handler();
        let written = DownloadHandler::new(&http_handler)
            .transfer(&destination, &format!("{}/b.xml", server.uri()))
            .await
            .unwrap();

        assert_eq!(written, 3);
        assert_eq!(tokio::fs::read_to_string(&destination).await.unwrap(), "new");
    }

    #[tokio::test]
    async fn test_transfer_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let temp_dir = tempdir().unwrap();
        let destination = temp_dir.path().join("missing.xml");
        let http_handler = test_handler();

        let result = DownloadHandler::new(&http_handler)
            .transfer(&destination, &format!("{}/missing.xml", server.uri()))
            .await;

        assert!(matches!(
            result,
            Err(TransferError::Fetch(FetchError::Status { status: 404, .. }))
        ));
        assert!(!destination.exists());
    }

    #[tokio::test]
    async fn test_transfer_fails_when_destination_unwritable() {
        let temp_dir = tempdir().unwrap();
        let destination = temp_dir.path().join("no_such_dir").join("a.xml");
        let http_handler = test_handler();

        let result = DownloadHandler::new(&http_handler)
            .transfer(&destination, "http://127.0.0.1:9/a.xml")
            .await;

        assert!(matches!(result, Err(TransferError::Create { .. })));
    }

    #[tokio::test]
    async fn test_transfer_fails_on_connection_error() {
        let temp_dir = tempdir().unwrap();
        let destination = temp_dir.path().join("a.xml");
        let http_handler = test_handler();

        // Port 9 (discard) is not served in test environments
        let result = DownloadHandler::new(&http_handler)
            .transfer(&destination, "http://127.0.0.1:9/a.xml")
            .await;

        assert!(matches!(result, Err(TransferError::Fetch(FetchError::Http(_)))));
        assert!(!destination.exists());
    }
}
