//! Event message models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message posted to an event's thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Message {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Message joined with its author's email.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageWithAuthor {
    pub id: Uuid,
    pub event_id: Uuid,
    pub author_email: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Request to post a message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendMessageRequest {
    pub message: Option<String>,
}

/// Message entry in a listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MessageItem {
    pub user: String,
    pub content: String,
    pub timestamp: String,
}

impl From<MessageWithAuthor> for MessageItem {
    fn from(row: MessageWithAuthor) -> Self {
        Self {
            user: row.author_email,
            content: row.content,
            timestamp: row.timestamp.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<MessageItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_message_item_from_row() {
        let row = MessageWithAuthor {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            author_email: "b@example.com".to_string(),
            content: "See you there".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 18, 0, 0).unwrap(),
        };

        let item = MessageItem::from(row);
        assert_eq!(item.user, "b@example.com");
        assert_eq!(item.timestamp, "2025-01-01T18:00:00+00:00");
    }

    #[test]
    fn test_send_message_request_missing() {
        let request: SendMessageRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(request.message.is_none());
    }
}
