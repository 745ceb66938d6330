//! Testing utilities and mock implementations.
//!
//! Mocks for the subtitle API and the chat platform, so the dispatcher and
//! the bot can be exercised without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use copelk_core::testing::{fixtures, MockChat, MockSubtitleApi};
//!
//! let api = Arc::new(MockSubtitleApi::new());
//! api.set_results(vec![fixtures::record("Dune", "osdb", "subs/1")]).await;
//!
//! let chat = Arc::new(MockChat::new());
//! // Build a Bot with both and feed it updates...
//! assert_eq!(chat.sent_messages().await.len(), 1);
//! ```

mod mock_chat;
mod mock_subtitle_api;

pub use mock_chat::{MockChat, SentItem};
pub use mock_subtitle_api::MockSubtitleApi;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::subtitle::SubtitleRecord;
    use crate::telegram::{Chat, InlineQuery, Message, Update, User};

    /// A Sinhala subtitle record with no thumbnail.
    pub fn record(title: &str, source: &str, post_url: &str) -> SubtitleRecord {
        SubtitleRecord {
            title: Some(title.to_string()),
            language: Some("Sinhala".to_string()),
            source: source.to_string(),
            post_url: post_url.to_string(),
            thumbnail: None,
        }
    }

    pub fn user(id: i64) -> User {
        User {
            id,
            is_bot: false,
            first_name: "Tester".to_string(),
            username: None,
        }
    }

    /// A private-chat text message; `update_id` doubles as the message id.
    pub fn text_update(update_id: i64, chat_id: i64, text: &str) -> Update {
        Update {
            update_id,
            message: Some(Message {
                message_id: update_id,
                chat: Chat {
                    id: chat_id,
                    kind: "private".to_string(),
                },
                from: Some(user(chat_id)),
                text: Some(text.to_string()),
            }),
            inline_query: None,
        }
    }

    pub fn inline_update(update_id: i64, query_id: &str, query: &str) -> Update {
        Update {
            update_id,
            message: None,
            inline_query: Some(InlineQuery {
                id: query_id.to_string(),
                from: user(1),
                query: query.to_string(),
                offset: String::new(),
            }),
        }
    }
}
