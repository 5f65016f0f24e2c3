//! Core HTTP operations
//!
//! Every request goes out once: there is no retry and no rate limiting
//! beyond the download manager's concurrency cap. A response only counts as
//! a success when its status is 2xx.

use reqwest::{Client, Response};
use url::Url;

use crate::errors::{FetchError, FetchResult};

/// HTTP operations handler
#[derive(Debug, Clone)]
pub struct HttpHandler {
    client: Client,
}

impl HttpHandler {
    /// Creates a new HttpHandler with the given client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Sends a GET request and returns the response if the status is a success
    ///
    /// The body is left unread so callers can stream it.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the URL is invalid, the connection fails, or
    /// the server answers with a non-success status
    pub async fn get_response(&self, url: &str) -> FetchResult<Response> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            error: e.to_string(),
        })?;

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        tracing::debug!("Fetched response: {} ({})", url, status);
        Ok(response)
    }

    /// Fetches a whole response body
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the request fails or the body cannot be read
    pub async fn get_bytes(&self, url: &str) -> FetchResult<Vec<u8>> {
        let response = self.get_response(url).await?;
        let body = response.bytes().await?;
        tracing::debug!("Read {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}
