//! Classification of incoming text and delegation to the subtitle API.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::command::{DownloadRef, DownloadRefError, DOWNLOAD_COMMAND_PREFIX};
use crate::format::{InlineArticle, Reply, ResponseFormatter};
use crate::metrics;
use crate::subtitle::{BulkItem, SubtitleApi, SubtitleError};

/// Errors surfaced to the chat binding.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Subtitle(#[from] SubtitleError),

    #[error(transparent)]
    Command(#[from] DownloadRefError),
}

impl DispatchError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Subtitle(SubtitleError::Network(_)) => "network",
            Self::Subtitle(SubtitleError::Decode { .. }) => "decode",
            Self::Subtitle(SubtitleError::Download { .. }) => "download",
            Self::Command(_) => "malformed_command",
        }
    }
}

/// What a piece of user text asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    SingleDownload(DownloadRef),
    BulkDownload(Vec<BulkItem>),
    Search(String),
    /// Other commands, and link lists with nothing to fetch.
    Ignored,
}

/// Classify text. `api_host` selects which pasted URLs count as subtitle links.
pub fn classify(text: &str, api_host: &str) -> Result<Query, DispatchError> {
    if text.starts_with(DOWNLOAD_COMMAND_PREFIX) {
        return Ok(Query::SingleDownload(DownloadRef::decode(text)?));
    }

    if text.starts_with("http") {
        let items = parse_bulk_items(text, api_host);
        return Ok(if items.is_empty() {
            Query::Ignored
        } else {
            Query::BulkDownload(items)
        });
    }

    if text.starts_with('/') {
        return Ok(Query::Ignored);
    }

    Ok(Query::Search(text.to_string()))
}

/// Extract `{postUrl, source}` pairs from every whitespace-separated token that
/// starts with `http` and contains `api_host`.
///
/// The query string is taken after the first `?`, split on `&`, and each pair
/// on its first `=`. Values are percent-decoded. Links missing either
/// parameter are skipped.
pub fn parse_bulk_items(text: &str, api_host: &str) -> Vec<BulkItem> {
    text.split_whitespace()
        .filter(|token| token.starts_with("http") && token.contains(api_host))
        .filter_map(bulk_item_from_url)
        .collect()
}

fn bulk_item_from_url(url: &str) -> Option<BulkItem> {
    let (_, query) = url.split_once('?')?;

    let mut post_url = None;
    let mut source = None;
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match key {
            "postUrl" => post_url = Some(decode_value(value)),
            "source" => source = Some(decode_value(value)),
            _ => {}
        }
    }

    match (post_url, source) {
        (Some(post_url), Some(source)) if !post_url.is_empty() && !source.is_empty() => {
            Some(BulkItem { post_url, source })
        }
        _ => {
            debug!(url = url, "Skipping link without postUrl/source");
            None
        }
    }
}

fn decode_value(value: &str) -> String {
    urlencoding::decode(value)
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

/// Routes classified text to the subtitle API and formats the outcome.
pub struct QueryDispatcher {
    api: Arc<dyn SubtitleApi>,
    formatter: ResponseFormatter,
    api_host: String,
}

impl QueryDispatcher {
    pub fn new(
        api: Arc<dyn SubtitleApi>,
        formatter: ResponseFormatter,
        api_host: impl Into<String>,
    ) -> Self {
        Self {
            api,
            formatter,
            api_host: api_host.into(),
        }
    }

    /// Handle a text message. `Ok(None)` means nothing should be sent.
    pub async fn handle_text(&self, text: &str) -> Result<Option<Reply>, DispatchError> {
        match classify(text, &self.api_host)? {
            Query::SingleDownload(reference) => {
                let result = self
                    .api
                    .download_single(&reference.source, &reference.post_url_suffix)
                    .await;
                metrics::record_download("single", result.is_ok());
                let bytes = result?;
                Ok(Some(Reply::Document(
                    self.formatter.single_document(&reference.source, bytes),
                )))
            }
            Query::BulkDownload(items) => {
                let result = self.api.download_bulk(&items).await;
                metrics::record_download("bulk", result.is_ok());
                let bytes = result?;
                Ok(Some(Reply::Document(self.formatter.bulk_document(bytes))))
            }
            Query::Search(query) => {
                let records = self.search("text", &query).await?;
                Ok(Some(Reply::Text(self.formatter.text(&records))))
            }
            Query::Ignored => Ok(None),
        }
    }

    /// Handle an inline query. Blank queries return no results without a search.
    pub async fn handle_inline(&self, query: &str) -> Result<Vec<InlineArticle>, DispatchError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records = self.search("inline", query).await?;
        Ok(self.formatter.inline(&records))
    }

    async fn search(
        &self,
        mode: &str,
        query: &str,
    ) -> Result<Vec<crate::subtitle::SubtitleRecord>, DispatchError> {
        match self.api.search(query).await {
            Ok(records) => {
                metrics::record_search(mode, Some(records.len()));
                Ok(records)
            }
            Err(e) => {
                metrics::record_search(mode, None);
                Err(e.into())
            }
        }
    }
}
