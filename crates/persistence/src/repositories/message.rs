//! Message repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::MessageWithAuthorEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a message. Returns false if the identical message exists.
    pub async fn create(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("create_message");
        let result = sqlx::query(
            r#"
            INSERT INTO messages (event_id, user_id, content)
            VALUES ($1, $2, $3)
            ON CONFLICT (event_id, user_id, content) DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(content)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Messages for an event, newest first.
    pub async fn list_for_event(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<MessageWithAuthorEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_messages_for_event");
        let result = sqlx::query_as::<_, MessageWithAuthorEntity>(
            r#"
            SELECT m.id, m.event_id, u.email AS author_email, m.content, m.timestamp
            FROM messages m
            JOIN users u ON u.id = m.user_id
            WHERE m.event_id = $1
            ORDER BY m.timestamp DESC, m.id
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
