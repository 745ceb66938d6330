use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::config::TelegramConfig;
use crate::format::{Document, InlineArticle};

use super::{ApiResponse, ChatApi, InlineQueryResult, ReplyParameters, TelegramError, Update};

/// Extra time on top of the long-poll timeout before the HTTP client gives up.
const POLL_GRACE_SECS: u64 = 15;

/// Telegram Bot API client
pub struct TelegramClient {
    client: Client,
    bot_url: String,
}

impl TelegramClient {
    /// Create a new Telegram client
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(
                config.poll_timeout_secs as u64 + POLL_GRACE_SECS,
            ))
            .build()?;

        Ok(Self {
            client,
            bot_url: format!(
                "{}/bot{}",
                config.api_url.trim_end_matches('/'),
                config.token
            ),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.bot_url, method)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        request: RequestBuilder,
    ) -> Result<T, TelegramError> {
        let response = request.send().await?;
        let status = response.status();
        let body: ApiResponse<T> = response.json().await.map_err(|e| {
            TelegramError::Api(format!("{} returned HTTP {}: {}", method, status, e.without_url()))
        })?;

        if !body.ok {
            return Err(TelegramError::Api(format!(
                "{} failed ({}): {}",
                method,
                body.error_code.unwrap_or_else(|| status.as_u16() as i64),
                body.description.unwrap_or_default()
            )));
        }

        body.result
            .ok_or_else(|| TelegramError::Api(format!("{} returned no result", method)))
    }
}

#[async_trait]
impl ChatApi for TelegramClient {
    async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u32,
    ) -> Result<Vec<Update>, TelegramError> {
        let request = self.client.post(self.method_url("getUpdates")).json(&json!({
            "offset": offset,
            "timeout": timeout_secs,
            "allowed_updates": ["message", "inline_query"],
        }));
        self.call("getUpdates", request).await
    }

    async fn send_message(
        &self,
        chat_id: i64,
        reply_to: Option<i64>,
        text: &str,
    ) -> Result<(), TelegramError> {
        debug!(chat_id = chat_id, "Sending message");

        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(message_id) = reply_to {
            body["reply_parameters"] = json!(ReplyParameters::to(message_id));
        }

        let request = self.client.post(self.method_url("sendMessage")).json(&body);
        self.call::<serde_json::Value>("sendMessage", request).await?;
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: i64,
        reply_to: Option<i64>,
        document: &Document,
    ) -> Result<(), TelegramError> {
        debug!(
            chat_id = chat_id,
            filename = %document.filename,
            bytes = document.bytes.len(),
            "Sending document"
        );

        let part = Part::bytes(document.bytes.clone())
            .file_name(document.filename.clone())
            .mime_str("application/zip")?;
        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", part);
        if let Some(message_id) = reply_to {
            form = form.text(
                "reply_parameters",
                json!(ReplyParameters::to(message_id)).to_string(),
            );
        }

        let request = self.client.post(self.method_url("sendDocument")).multipart(form);
        self.call::<serde_json::Value>("sendDocument", request).await?;
        Ok(())
    }

    async fn answer_inline_query(
        &self,
        inline_query_id: &str,
        articles: &[InlineArticle],
    ) -> Result<(), TelegramError> {
        let results: Vec<InlineQueryResult> = articles.iter().map(Into::into).collect();
        debug!(
            inline_query_id = inline_query_id,
            results = results.len(),
            "Answering inline query"
        );

        let request = self
            .client
            .post(self.method_url("answerInlineQuery"))
            .json(&json!({
                "inline_query_id": inline_query_id,
                "results": results,
            }));
        self.call::<bool>("answerInlineQuery", request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let client = TelegramClient::new(&TelegramConfig {
            token: "123:abc".to_string(),
            api_url: "https://api.telegram.org/".to_string(),
            poll_timeout_secs: 30,
        })
        .unwrap();
        assert_eq!(
            client.method_url("getUpdates"),
            "https://api.telegram.org/bot123:abc/getUpdates"
        );
    }
}
