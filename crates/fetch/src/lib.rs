//! HTTP fetcher for oshiv release archives.
//!
//! Downloads archives with a single GET request. Transport errors and
//! non-success statuses become [`Error::DownloadFailure`]; there is no retry.

#![warn(missing_docs)]

use async_trait::async_trait;
use oshiv_install_core::{ArtifactFetcher, Error, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches release archives over HTTP(S).
pub struct HttpFetcher {
    client: Client,
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFetcher {
    /// Create a new HTTP fetcher.
    ///
    /// # Panics
    ///
    /// Panics only if the TLS backend cannot be initialized, which with
    /// default settings indicates a broken environment.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        // SAFETY: Client::builder().build() only fails if the TLS backend
        // fails to initialize or a proxy is misconfigured; we set neither.
        Self {
            client: Client::builder()
                .user_agent(concat!("oshiv-install/", env!("CARGO_PKG_VERSION")))
                .connect_timeout(CONNECT_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client - TLS backend initialization failed"),
        }
    }

    /// Create a fetcher around an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArtifactFetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        info!(%url, "Downloading release archive");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::download(url, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::download(url, format!("HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::download(url, format!("failed to read body: {e}")))?;

        debug!(%url, bytes = body.len(), "Download complete");
        Ok(body.to_vec())
    }
}
