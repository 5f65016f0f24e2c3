//! HTTP client for the Lexin catalog
//!
//! This module provides the client used for catalog discovery, collection
//! listing retrieval, and streaming file transfers.
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: Status-checked GET requests
//! - `download`: Streaming transfers to local files

use std::path::Path;

use crate::app::listing;
use crate::app::models::Collection;
use crate::errors::{FetchResult, Result, TransferResult};

// Module declarations
pub mod config;
pub mod download;
pub mod http;

pub use config::ClientConfig;

use download::DownloadHandler;
use http::HttpHandler;

/// HTTP client for the Lexin catalog and its collections
///
/// Cheap to share behind an `Arc`; the underlying connection pool is reused
/// by every collection download.
#[derive(Debug, Clone)]
pub struct LexinClient {
    http_handler: HttpHandler,
}

impl LexinClient {
    /// Creates a client with the default configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP client cannot be built
    pub fn new() -> FetchResult<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Creates a client with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP client cannot be built
    pub fn with_config(config: &ClientConfig) -> FetchResult<Self> {
        let client = config.build_http_client()?;
        Ok(Self {
            http_handler: HttpHandler::new(client),
        })
    }

    /// Fetches a whole document, failing on non-success status
    pub async fn fetch(&self, url: &str) -> FetchResult<Vec<u8>> {
        self.http_handler.get_bytes(url).await
    }

    /// Streams one remote resource to a local path, returning bytes written
    pub async fn transfer(&self, destination: &Path, url: &str) -> TransferResult<u64> {
        DownloadHandler::new(&self.http_handler)
            .transfer(destination, url)
            .await
    }

    /// Fetches and parses the root catalog into the collections it offers
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the catalog cannot be fetched or decoded
    pub async fn fetch_catalog(&self, base_url: &str) -> Result<Vec<Collection>> {
        let document = self.fetch(base_url).await?;
        let collections = listing::parse_catalog(&document, base_url)?;
        tracing::info!(
            "Catalog {} offers {} collections",
            base_url,
            collections.len()
        );
        Ok(collections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_creation() {
        assert!(LexinClient::new().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_catalog() {
        let server = MockServer::start().await;
        let catalog = r#"<!DOCTYPE svn SYSTEM "svn.dtd">
<svn version="1" href="x"><index rev="3" path="/lexin" base="">
  <dir name="arabiska" href="arabiska/"/>
  <dir name="finska" href="finska/"/>
</index></svn>"#;
        Mock::given(method("GET"))
            .and(path("/lexin/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(catalog))
            .mount(&server)
            .await;

        let base_url = format!("{}/lexin/", server.uri());
        let collections = LexinClient::new()
            .unwrap()
            .fetch_catalog(&base_url)
            .await
            .unwrap();

        assert_eq!(collections.len(), 2);
        assert_eq!(collections[0].display_name, "Arabic");
        assert_eq!(collections[1].source_url, format!("{}finska/", base_url));
    }

    #[tokio::test]
    async fn test_fetch_catalog_undecodable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let result = LexinClient::new()
            .unwrap()
            .fetch_catalog(&format!("{}/lexin/", server.uri()))
            .await;
        assert!(matches!(result, Err(AppError::Listing(_))));
    }
}
