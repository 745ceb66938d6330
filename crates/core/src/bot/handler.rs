use std::sync::Arc;

use tracing::{debug, warn};

use crate::command::DOWNLOAD_COMMAND_PREFIX;
use crate::dispatch::{DispatchError, QueryDispatcher};
use crate::format::{Reply, WELCOME_MESSAGE};
use crate::metrics;
use crate::subtitle::SubtitleError;
use crate::telegram::{ChatApi, Update};

use super::{ChatEvent, RouteAction, RoutingTable};

/// Routes updates and sends replies.
pub struct Bot {
    routes: RoutingTable,
    dispatcher: QueryDispatcher,
    chat: Arc<dyn ChatApi>,
}

impl Bot {
    pub fn new(routes: RoutingTable, dispatcher: QueryDispatcher, chat: Arc<dyn ChatApi>) -> Self {
        Self {
            routes,
            dispatcher,
            chat,
        }
    }

    pub fn chat(&self) -> &Arc<dyn ChatApi> {
        &self.chat
    }

    /// Process one update to completion.
    pub async fn handle_update(&self, update: &Update) {
        let Some(event) = ChatEvent::from_update(update) else {
            metrics::record_update("unmatched");
            return;
        };
        let Some(route) = self.routes.resolve(&event) else {
            debug!(update_id = update.update_id, "No route for update");
            metrics::record_update("unmatched");
            return;
        };

        metrics::record_update(route.name);
        debug!(update_id = update.update_id, route = route.name, "Routing update");

        match (route.action, &event) {
            (RouteAction::InlineSearch, ChatEvent::InlineQuery { id, query }) => {
                self.answer_inline(id, query).await
            }
            (RouteAction::Start, _) => {
                if let Some((chat_id, message_id)) = event.reply_target() {
                    self.send_text(chat_id, message_id, WELCOME_MESSAGE).await;
                }
            }
            (RouteAction::Download | RouteAction::TextSearch, _) => {
                if let (Some(text), Some((chat_id, message_id))) =
                    (event.text(), event.reply_target())
                {
                    self.reply_to_text(chat_id, message_id, text).await;
                }
            }
            (RouteAction::InlineSearch, _) => {
                warn!(route = route.name, "Inline route matched a non-inline event");
            }
        }
    }

    async fn answer_inline(&self, inline_query_id: &str, query: &str) {
        let articles = match self.dispatcher.handle_inline(query).await {
            Ok(articles) => articles,
            Err(e) => {
                // Inline queries have no chat to report to; answer empty.
                warn!(query = query, error = %e, "Inline search failed");
                metrics::record_handler_error(e.kind());
                Vec::new()
            }
        };

        if let Err(e) = self.chat.answer_inline_query(inline_query_id, &articles).await {
            warn!(error = %e, "Failed to answer inline query");
        }
    }

    async fn reply_to_text(&self, chat_id: i64, message_id: i64, text: &str) {
        match self.dispatcher.handle_text(text).await {
            Ok(Some(Reply::Text(body))) => self.send_text(chat_id, message_id, &body).await,
            Ok(Some(Reply::Document(document))) => {
                if let Err(e) = self
                    .chat
                    .send_document(chat_id, Some(message_id), &document)
                    .await
                {
                    warn!(chat_id = chat_id, error = %e, "Failed to send document");
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(chat_id = chat_id, error = %e, "Request failed");
                metrics::record_handler_error(e.kind());
                self.send_text(chat_id, message_id, &failure_message(text, &e))
                    .await;
            }
        }
    }

    async fn send_text(&self, chat_id: i64, message_id: i64, text: &str) {
        if let Err(e) = self.chat.send_message(chat_id, Some(message_id), text).await {
            warn!(chat_id = chat_id, error = %e, "Failed to send message");
        }
    }
}

/// User-facing text for a failed request.
pub fn failure_message(text: &str, error: &DispatchError) -> String {
    match error {
        DispatchError::Subtitle(SubtitleError::Download { .. }) => {
            if text.starts_with(DOWNLOAD_COMMAND_PREFIX) {
                "Failed to download subtitle".to_string()
            } else {
                "Failed to download bulk subtitles".to_string()
            }
        }
        other => format!("Error: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::DownloadRefError;

    #[test]
    fn test_failure_message_for_downloads() {
        let err = DispatchError::Subtitle(SubtitleError::Download { status: 404 });
        assert_eq!(
            failure_message("/download_osdb_1", &err),
            "Failed to download subtitle"
        );
        assert_eq!(
            failure_message("https://bettercopelk.navinda.xyz/x?postUrl=a&source=b", &err),
            "Failed to download bulk subtitles"
        );
    }

    #[test]
    fn test_failure_message_for_other_errors() {
        let err = DispatchError::Command(DownloadRefError::Malformed("/download_x".into()));
        assert_eq!(
            failure_message("/download_x", &err),
            "Error: Malformed download command: /download_x"
        );

        let err = DispatchError::Subtitle(SubtitleError::Network("connection refused".into()));
        assert_eq!(
            failure_message("dune", &err),
            "Error: Network error: connection refused"
        );
    }
}
