//! Bot API wire types. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

use crate::format::InlineArticle;

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_query: Option<InlineQuery>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InlineQuery {
    pub id: String,
    pub from: User,
    pub query: String,
    #[serde(default)]
    pub offset: String,
}

/// `InlineQueryResultArticle`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InlineQueryResult {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub title: String,
    pub description: String,
    pub input_message_content: InputTextMessageContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InputTextMessageContent {
    pub message_text: String,
}

impl From<&InlineArticle> for InlineQueryResult {
    fn from(article: &InlineArticle) -> Self {
        Self {
            kind: "article",
            id: article.id.clone(),
            title: article.title.clone(),
            description: article.description.clone(),
            input_message_content: InputTextMessageContent {
                message_text: article.message_text.clone(),
            },
            thumbnail_url: article.thumbnail_url.clone(),
        }
    }
}

/// `ReplyParameters`
#[derive(Debug, Clone, Serialize)]
pub struct ReplyParameters {
    pub message_id: i64,
    pub allow_sending_without_reply: bool,
}

impl ReplyParameters {
    pub fn to(message_id: i64) -> Self {
        Self {
            message_id,
            allow_sending_without_reply: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_text_update() {
        let json = r#"{
            "update_id": 1001,
            "message": {
                "message_id": 7,
                "date": 1700000000,
                "chat": {"id": 42, "type": "private", "first_name": "Ann"},
                "from": {"id": 42, "is_bot": false, "first_name": "Ann"},
                "text": "dune"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let message = update.message.unwrap();
        assert_eq!(update.update_id, 1001);
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.chat.kind, "private");
        assert_eq!(message.text.as_deref(), Some("dune"));
        assert!(update.inline_query.is_none());
    }

    #[test]
    fn test_deserialize_inline_query_update() {
        let json = r#"{
            "update_id": 5,
            "inline_query": {
                "id": "q1",
                "from": {"id": 1, "is_bot": false, "first_name": "B"},
                "query": "oppenheimer",
                "offset": ""
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert_eq!(update.inline_query.unwrap().query, "oppenheimer");
    }

    #[test]
    fn test_api_error_response() {
        let json = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;
        let response: ApiResponse<Vec<Update>> = serde_json::from_str(json).unwrap();
        assert!(!response.ok);
        assert!(response.result.is_none());
        assert_eq!(response.description.as_deref(), Some("Unauthorized"));
        assert_eq!(response.error_code, Some(401));
    }

    #[test]
    fn test_inline_result_serialization() {
        let article = InlineArticle {
            id: "0".to_string(),
            title: "Dune (Sinhala)".to_string(),
            description: "Source: osdb".to_string(),
            thumbnail_url: None,
            message_text: "Subtitle: Dune (Sinhala)\nDownload: /download_osdb_1".to_string(),
        };
        let value = serde_json::to_value(InlineQueryResult::from(&article)).unwrap();
        assert_eq!(value["type"], "article");
        assert_eq!(value["id"], "0");
        assert_eq!(
            value["input_message_content"]["message_text"],
            "Subtitle: Dune (Sinhala)\nDownload: /download_osdb_1"
        );
        assert!(value.get("thumbnail_url").is_none());
    }
}
