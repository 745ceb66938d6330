use crate::telegram::Update;

/// The slice of an update the bot reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Text starting with `/`. `name` has the slash and any `@botname` removed.
    Command {
        chat_id: i64,
        message_id: i64,
        name: String,
        text: String,
    },
    /// Any other text message.
    Text {
        chat_id: i64,
        message_id: i64,
        text: String,
    },
    InlineQuery {
        id: String,
        query: String,
    },
}

impl ChatEvent {
    /// `None` for update kinds the bot does not handle.
    pub fn from_update(update: &Update) -> Option<Self> {
        if let Some(query) = &update.inline_query {
            return Some(Self::InlineQuery {
                id: query.id.clone(),
                query: query.query.clone(),
            });
        }

        let message = update.message.as_ref()?;
        let text = message.text.clone()?;
        let chat_id = message.chat.id;
        let message_id = message.message_id;

        match text.strip_prefix('/') {
            Some(rest) => {
                let name = rest
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .split('@')
                    .next()
                    .unwrap_or_default()
                    .to_string();
                Some(Self::Command {
                    chat_id,
                    message_id,
                    name,
                    text,
                })
            }
            None => Some(Self::Text {
                chat_id,
                message_id,
                text,
            }),
        }
    }

    /// Message text for commands and text messages.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Command { text, .. } | Self::Text { text, .. } => Some(text),
            Self::InlineQuery { .. } => None,
        }
    }

    /// `(chat_id, message_id)` to reply to, if the event came from a chat.
    pub fn reply_target(&self) -> Option<(i64, i64)> {
        match self {
            Self::Command {
                chat_id,
                message_id,
                ..
            }
            | Self::Text {
                chat_id,
                message_id,
                ..
            } => Some((*chat_id, *message_id)),
            Self::InlineQuery { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_command_event() {
        let event = ChatEvent::from_update(&fixtures::text_update(1, 42, "/start@CopelkBot now"));
        assert_eq!(
            event,
            Some(ChatEvent::Command {
                chat_id: 42,
                message_id: 1,
                name: "start".to_string(),
                text: "/start@CopelkBot now".to_string(),
            })
        );
    }

    #[test]
    fn test_text_event() {
        let event = ChatEvent::from_update(&fixtures::text_update(3, 42, "dune")).unwrap();
        assert_eq!(event.text(), Some("dune"));
        assert_eq!(event.reply_target(), Some((42, 3)));
    }

    #[test]
    fn test_inline_event() {
        let event = ChatEvent::from_update(&fixtures::inline_update(4, "q1", "dune")).unwrap();
        assert_eq!(
            event,
            ChatEvent::InlineQuery {
                id: "q1".to_string(),
                query: "dune".to_string(),
            }
        );
        assert!(event.reply_target().is_none());
    }

    #[test]
    fn test_message_without_text_is_ignored() {
        let mut update = fixtures::text_update(1, 42, "x");
        if let Some(message) = update.message.as_mut() {
            message.text = None;
        }
        assert!(ChatEvent::from_update(&update).is_none());
    }
}
