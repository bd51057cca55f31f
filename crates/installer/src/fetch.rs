//! Fetcher trait for downloading release archives.
//!
//! The installer only needs "give me the bytes at this URL". Keeping that
//! behind a trait lets the HTTP implementation live in its own crate and
//! lets tests feed synthetic archives without a network.

use async_trait::async_trait;
use std::sync::Arc;

use crate::Result;

/// Downloads release archives.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Fetcher name, used in logs (e.g., "http").
    fn name(&self) -> &'static str;

    /// Download the complete body at `url`.
    ///
    /// Implementations make a single attempt.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DownloadFailure`] on transport errors or
    /// non-success responses.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl<T: ArtifactFetcher + ?Sized> ArtifactFetcher for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        (**self).fetch(url).await
    }
}
