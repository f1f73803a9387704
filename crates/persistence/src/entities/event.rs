//! Event entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub organizer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventEntity> for domain::models::Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            date: entity.date,
            location: entity.location,
            organizer_id: entity.organizer_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
