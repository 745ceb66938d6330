//! Mock subtitle API for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::subtitle::{BulkItem, SubtitleApi, SubtitleError, SubtitleRecord};

/// Mock implementation of the SubtitleApi trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable search results and archive bytes
/// - Track searches and downloads for assertions
/// - Fail the next call with a chosen error
#[derive(Debug, Default)]
pub struct MockSubtitleApi {
    results: Arc<RwLock<Vec<SubtitleRecord>>>,
    archive: Arc<RwLock<Vec<u8>>>,
    next_error: Arc<RwLock<Option<SubtitleError>>>,
    searches: Arc<RwLock<Vec<String>>>,
    downloads: Arc<RwLock<Vec<(String, String)>>>,
    bulk_downloads: Arc<RwLock<Vec<Vec<BulkItem>>>>,
}

impl MockSubtitleApi {
    /// Create a new mock with no results and an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_results(&self, results: Vec<SubtitleRecord>) {
        *self.results.write().await = results;
    }

    pub async fn set_archive(&self, bytes: Vec<u8>) {
        *self.archive.write().await = bytes;
    }

    /// Make the next call of any kind fail.
    pub async fn fail_next(&self, error: SubtitleError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn recorded_searches(&self) -> Vec<String> {
        self.searches.read().await.clone()
    }

    /// `(source, post_url_suffix)` of every single download.
    pub async fn recorded_downloads(&self) -> Vec<(String, String)> {
        self.downloads.read().await.clone()
    }

    pub async fn recorded_bulk_downloads(&self) -> Vec<Vec<BulkItem>> {
        self.bulk_downloads.read().await.clone()
    }

    async fn take_error(&self) -> Result<(), SubtitleError> {
        match self.next_error.write().await.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SubtitleApi for MockSubtitleApi {
    async fn search(&self, query: &str) -> Result<Vec<SubtitleRecord>, SubtitleError> {
        self.searches.write().await.push(query.to_string());
        self.take_error().await?;
        Ok(self.results.read().await.clone())
    }

    async fn download_single(
        &self,
        source: &str,
        post_url_suffix: &str,
    ) -> Result<Vec<u8>, SubtitleError> {
        self.downloads
            .write()
            .await
            .push((source.to_string(), post_url_suffix.to_string()));
        self.take_error().await?;
        Ok(self.archive.read().await.clone())
    }

    async fn download_bulk(&self, items: &[BulkItem]) -> Result<Vec<u8>, SubtitleError> {
        self.bulk_downloads.write().await.push(items.to_vec());
        self.take_error().await?;
        Ok(self.archive.read().await.clone())
    }
}
