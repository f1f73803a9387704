//! Message entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Message row joined with the author's email.
#[derive(Debug, Clone, FromRow)]
pub struct MessageWithAuthorEntity {
    pub id: Uuid,
    pub event_id: Uuid,
    pub author_email: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<MessageWithAuthorEntity> for domain::models::MessageWithAuthor {
    fn from(entity: MessageWithAuthorEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            author_email: entity.author_email,
            content: entity.content,
            timestamp: entity.timestamp,
        }
    }
}
