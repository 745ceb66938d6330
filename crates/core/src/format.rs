//! Rendering of search results and downloads into chat replies.

use crate::command::DownloadRef;
use crate::config::LimitsConfig;
use crate::subtitle::SubtitleRecord;

/// Reply to a text search that found nothing.
pub const NO_RESULTS_MESSAGE: &str = "No subtitles found for your query.";

/// Reply to `/start`.
pub const WELCOME_MESSAGE: &str = "Welcome to BetterCopelk Subtitle Bot!\n\n\
You can:\n\
1. Search subtitles via inline mode (type @YourBotName in any chat)\n\
2. Send me a movie name to search\n\
3. Bulk download by sending multiple subtitle links";

/// Filename used for bulk archives.
pub const BULK_FILENAME: &str = "bulk_subtitles.zip";

const UNAVAILABLE: &str = "unavailable";

/// A selectable inline query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineArticle {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub message_text: String,
}

/// A file to send back to the chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// What the bot sends back for a text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Document(Document),
}

/// Turns subtitle records into chat replies, keeping the API's order.
#[derive(Debug, Clone, Copy)]
pub struct ResponseFormatter {
    max_text_results: usize,
    max_inline_results: usize,
}

impl Default for ResponseFormatter {
    fn default() -> Self {
        Self::new(&LimitsConfig::default())
    }
}

impl ResponseFormatter {
    pub fn new(limits: &LimitsConfig) -> Self {
        Self {
            max_text_results: limits.max_text_results,
            max_inline_results: limits.max_inline_results,
        }
    }

    /// Render the first `max_text_results` records as one message.
    pub fn text(&self, records: &[SubtitleRecord]) -> String {
        if records.is_empty() {
            return NO_RESULTS_MESSAGE.to_string();
        }

        let mut out = String::from("Search Results:\n\n");
        for record in records.iter().take(self.max_text_results) {
            out.push_str(&format!(
                "🎬 {}\n🌐 Language: {}\n📌 Source: {}\n⬇️ Download: {}\n\n",
                record.title_or_default(),
                record.language_or_default(),
                record.source,
                download_command(record),
            ));
        }
        out
    }

    /// Render the first `max_inline_results` records as inline articles.
    pub fn inline(&self, records: &[SubtitleRecord]) -> Vec<InlineArticle> {
        records
            .iter()
            .take(self.max_inline_results)
            .enumerate()
            .map(|(idx, record)| {
                let title = format!(
                    "{} ({})",
                    record.title_or_default(),
                    record.language_or_default()
                );
                let message_text = format!(
                    "Subtitle: {}\nDownload: {}",
                    title,
                    download_command(record)
                );
                InlineArticle {
                    id: idx.to_string(),
                    description: format!("Source: {}", record.source),
                    thumbnail_url: record.thumbnail.clone().filter(|t| !t.is_empty()),
                    title,
                    message_text,
                }
            })
            .collect()
    }

    pub fn single_document(&self, source: &str, bytes: Vec<u8>) -> Document {
        Document {
            filename: format!("subtitle_{}.zip", source),
            bytes,
        }
    }

    pub fn bulk_document(&self, bytes: Vec<u8>) -> Document {
        Document {
            filename: BULK_FILENAME.to_string(),
            bytes,
        }
    }
}

fn download_command(record: &SubtitleRecord) -> String {
    DownloadRef::from_record(&record.source, &record.post_url)
        .map(|r| r.encode())
        .unwrap_or_else(|_| UNAVAILABLE.to_string())
}
