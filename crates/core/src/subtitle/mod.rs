//! Subtitle search API adapter.
//!
//! This module provides a `SubtitleApi` trait over the BetterCopelk
//! endpoints (streamed search, single download, bulk download) and the
//! reqwest-backed `BetterCopeClient` implementation.

mod client;
mod sse;
mod types;

pub use client::BetterCopeClient;
pub use sse::{SseDecoder, SseEvent};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the subtitle API.
#[derive(Debug, Error)]
pub enum SubtitleError {
    /// Connection could not be established, or the stream broke.
    #[error("Network error: {0}")]
    Network(String),

    /// A streamed search event was not a valid subtitle record.
    #[error("Failed to decode search event: {reason}")]
    Decode { reason: String, payload: String },

    /// A download endpoint answered with a non-200 status.
    #[error("Download failed with HTTP status {status}")]
    Download { status: u16 },
}

impl SubtitleError {
    pub(crate) fn network(reason: impl std::fmt::Display) -> Self {
        Self::Network(reason.to_string())
    }
}

impl From<reqwest::Error> for SubtitleError {
    fn from(e: reqwest::Error) -> Self {
        Self::network(e)
    }
}

/// Operations offered by the subtitle search API.
///
/// Every call is a single round trip: no retries, no caching.
#[async_trait]
pub trait SubtitleApi: Send + Sync {
    /// Run a search and collect every streamed record in arrival order.
    async fn search(&self, query: &str) -> Result<Vec<SubtitleRecord>, SubtitleError>;

    /// Download one subtitle archive.
    async fn download_single(
        &self,
        source: &str,
        post_url_suffix: &str,
    ) -> Result<Vec<u8>, SubtitleError>;

    /// Download several subtitles as one archive.
    async fn download_bulk(&self, items: &[BulkItem]) -> Result<Vec<u8>, SubtitleError>;
}
