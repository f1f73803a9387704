//! Notification entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl From<NotificationEntity> for domain::models::Notification {
    fn from(entity: NotificationEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            message: entity.message,
            timestamp: entity.timestamp,
        }
    }
}
