//! Telegram Bot API client.
//!
//! Only the handful of methods the bot needs: long polling, text replies,
//! document uploads and inline query answers.

mod client;
mod types;

pub use client::TelegramClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::format::{Document, InlineArticle};

/// Telegram API errors
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    /// Telegram API returned an error
    #[error("Telegram API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for TelegramError {
    fn from(e: reqwest::Error) -> Self {
        // Request URLs embed the bot token.
        Self::Http(e.without_url())
    }
}

/// Chat platform operations used by the bot.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Long-poll for updates newer than `offset`.
    async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u32,
    ) -> Result<Vec<Update>, TelegramError>;

    /// Send a text message, optionally as a reply.
    async fn send_message(
        &self,
        chat_id: i64,
        reply_to: Option<i64>,
        text: &str,
    ) -> Result<(), TelegramError>;

    /// Upload a file, optionally as a reply.
    async fn send_document(
        &self,
        chat_id: i64,
        reply_to: Option<i64>,
        document: &Document,
    ) -> Result<(), TelegramError>;

    /// Answer an inline query with a list of articles.
    async fn answer_inline_query(
        &self,
        inline_query_id: &str,
        articles: &[InlineArticle],
    ) -> Result<(), TelegramError>;
}
