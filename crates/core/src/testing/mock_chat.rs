//! Mock chat platform for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::format::{Document, InlineArticle};
use crate::telegram::{ChatApi, TelegramError, Update};

/// Something the bot sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentItem {
    Message {
        chat_id: i64,
        reply_to: Option<i64>,
        text: String,
    },
    Document {
        chat_id: i64,
        reply_to: Option<i64>,
        document: Document,
    },
    InlineAnswer {
        inline_query_id: String,
        articles: Vec<InlineArticle>,
    },
}

/// Mock implementation of the ChatApi trait.
///
/// Queued update batches are returned by successive `get_updates` calls;
/// everything sent is recorded in order.
#[derive(Debug, Default)]
pub struct MockChat {
    batches: Arc<RwLock<VecDeque<Vec<Update>>>>,
    offsets: Arc<RwLock<Vec<Option<i64>>>>,
    sent: Arc<RwLock<Vec<SentItem>>>,
    fail_sends: Arc<RwLock<bool>>,
}

impl MockChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a batch for the next `get_updates` call.
    pub async fn push_updates(&self, updates: Vec<Update>) {
        self.batches.write().await.push_back(updates);
    }

    /// Make every send call fail.
    pub async fn set_fail_sends(&self, fail: bool) {
        *self.fail_sends.write().await = fail;
    }

    pub async fn sent(&self) -> Vec<SentItem> {
        self.sent.read().await.clone()
    }

    pub async fn sent_messages(&self) -> Vec<String> {
        self.sent
            .read()
            .await
            .iter()
            .filter_map(|item| match item {
                SentItem::Message { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Offsets passed to `get_updates`, in call order.
    pub async fn requested_offsets(&self) -> Vec<Option<i64>> {
        self.offsets.read().await.clone()
    }

    async fn record(&self, item: SentItem) -> Result<(), TelegramError> {
        if *self.fail_sends.read().await {
            return Err(TelegramError::Api("mock send failure".to_string()));
        }
        self.sent.write().await.push(item);
        Ok(())
    }
}

#[async_trait]
impl ChatApi for MockChat {
    async fn get_updates(
        &self,
        offset: Option<i64>,
        _timeout_secs: u32,
    ) -> Result<Vec<Update>, TelegramError> {
        self.offsets.write().await.push(offset);
        Ok(self.batches.write().await.pop_front().unwrap_or_default())
    }

    async fn send_message(
        &self,
        chat_id: i64,
        reply_to: Option<i64>,
        text: &str,
    ) -> Result<(), TelegramError> {
        self.record(SentItem::Message {
            chat_id,
            reply_to,
            text: text.to_string(),
        })
        .await
    }

    async fn send_document(
        &self,
        chat_id: i64,
        reply_to: Option<i64>,
        document: &Document,
    ) -> Result<(), TelegramError> {
        self.record(SentItem::Document {
            chat_id,
            reply_to,
            document: document.clone(),
        })
        .await
    }

    async fn answer_inline_query(
        &self,
        inline_query_id: &str,
        articles: &[InlineArticle],
    ) -> Result<(), TelegramError> {
        self.record(SentItem::InlineAnswer {
            inline_query_id: inline_query_id.to_string(),
            articles: articles.to_vec(),
        })
        .await
    }
}
