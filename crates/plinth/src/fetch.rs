//! HTTP fetching of the remote model asset.
//!
//! The fetcher issues a plain GET against a fixed URL and buffers the whole
//! payload before handing it over; nothing is streamed into the renderer.

use crate::error::{Error, Result};
use std::{future::Future, pin::Pin};

/// Future type for fetch operations.
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;

/// Retrieves a binary asset from a remote URL.
pub trait Fetch: Send + Sync {
    /// Fetch the asset at `url`, returning the full payload.
    ///
    /// Fails with [`Error::Http`] if the transport fails and with
    /// [`Error::HttpStatus`] if the response status does not indicate
    /// success.
    fn fetch<'a>(&'a self, url: &'a str) -> FetchFuture<'a>;
}

/// HTTP fetcher backed by reqwest.
///
/// No headers, auth, or range requests are used; the endpoint serves one
/// binary asset addressed by its URL alone.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a default HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Create a fetcher with a custom HTTP client.
    #[must_use]
    pub fn with_http(http: reqwest::Client) -> Self {
        Self { http }
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, "fetching");

        let response = self.http.get(url).send().await.map_err(|e| Error::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let data = response.bytes().await.map_err(|e| Error::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(data.to_vec())
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> FetchFuture<'a> {
        Box::pin(self.fetch_bytes(url))
    }
}
