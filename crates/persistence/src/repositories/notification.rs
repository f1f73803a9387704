//! Notification repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::NotificationEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a notification. Returns false if this exact message was
    /// already recorded for the user.
    pub async fn record(&self, user_id: Uuid, message: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("record_notification");
        let result = sqlx::query(
            r#"
            INSERT INTO notifications (user_id, message)
            VALUES ($1, $2)
            ON CONFLICT (user_id, message) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(message)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<NotificationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_notifications_for_user");
        let result = sqlx::query_as::<_, NotificationEntity>(
            r#"
            SELECT id, user_id, message, timestamp
            FROM notifications
            WHERE user_id = $1
            ORDER BY timestamp DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
