//! BetterCopelk API client.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{header, Client, StatusCode};
use tracing::debug;

use crate::config::SubtitleApiConfig;

use super::sse::{SseDecoder, SseEvent};
use super::{BulkDownloadRequest, BulkItem, SubtitleApi, SubtitleError, SubtitleRecord};

/// Subtitle API client backed by reqwest.
pub struct BetterCopeClient {
    client: Client,
    base_url: String,
}

impl BetterCopeClient {
    /// Create a new client. No timeout is applied unless configured.
    pub fn new(config: &SubtitleApiConfig) -> Result<Self, SubtitleError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?query={}",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    fn download_url(&self, source: &str, post_url_suffix: &str) -> String {
        format!(
            "{}/download?postUrl={}&source={}",
            self.base_url,
            urlencoding::encode(post_url_suffix),
            urlencoding::encode(source)
        )
    }

    fn bulk_download_url(&self) -> String {
        format!("{}/bulk-download", self.base_url)
    }
}

/// Append one streamed event to the result list. Empty payloads are skipped;
/// a malformed payload aborts the whole search.
fn push_record(records: &mut Vec<SubtitleRecord>, event: SseEvent) -> Result<(), SubtitleError> {
    if event.data.trim().is_empty() {
        return Ok(());
    }

    let record = serde_json::from_str(&event.data).map_err(|e| SubtitleError::Decode {
        reason: e.to_string(),
        payload: event.data.chars().take(200).collect(),
    })?;
    records.push(record);
    Ok(())
}

async fn read_archive(response: reqwest::Response) -> Result<Vec<u8>, SubtitleError> {
    let status = response.status();
    if status != StatusCode::OK {
        return Err(SubtitleError::Download {
            status: status.as_u16(),
        });
    }
    Ok(response.bytes().await?.to_vec())
}

#[async_trait]
impl SubtitleApi for BetterCopeClient {
    async fn search(&self, query: &str) -> Result<Vec<SubtitleRecord>, SubtitleError> {
        let url = self.search_url(query);
        debug!(query = query, "Searching subtitles");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "text/event-stream")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubtitleError::Network(format!(
                "search endpoint returned HTTP {}",
                status
            )));
        }

        let mut stream = response.bytes_stream();
        let mut decoder = SseDecoder::new();
        let mut records = Vec::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            for event in decoder.feed(&chunk) {
                push_record(&mut records, event)?;
            }
        }
        if let Some(event) = decoder.finish() {
            push_record(&mut records, event)?;
        }

        debug!(query = query, results = records.len(), "Subtitle search complete");
        Ok(records)
    }

    async fn download_single(
        &self,
        source: &str,
        post_url_suffix: &str,
    ) -> Result<Vec<u8>, SubtitleError> {
        let url = self.download_url(source, post_url_suffix);
        debug!(source = source, post_url = post_url_suffix, "Downloading subtitle");

        let response = self.client.get(&url).send().await?;
        read_archive(response).await
    }

    async fn download_bulk(&self, items: &[BulkItem]) -> Result<Vec<u8>, SubtitleError> {
        debug!(items = items.len(), "Downloading subtitle bundle");

        let response = self
            .client
            .post(self.bulk_download_url())
            .json(&BulkDownloadRequest { data: items })
            .send()
            .await?;
        read_archive(response).await
    }
}
