//! Types exchanged with the subtitle API.

use serde::{Deserialize, Serialize};

/// Title shown when a record carries none.
pub const DEFAULT_TITLE: &str = "No title";

/// Language shown when a record carries none.
pub const DEFAULT_LANGUAGE: &str = "Unknown";

/// One subtitle search hit, as streamed by the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Provider identifier (e.g. "osdb").
    pub source: String,
    /// Provider-specific resource path.
    pub post_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl SubtitleRecord {
    pub fn title_or_default(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE)
    }

    pub fn language_or_default(&self) -> &str {
        self.language
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
    }
}

/// One entry of a bulk download request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BulkItem {
    pub post_url: String,
    pub source: String,
}

/// Body of `POST /bulk-download`.
#[derive(Debug, Clone, Serialize)]
pub struct BulkDownloadRequest<'a> {
    pub data: &'a [BulkItem],
}
