//! Event repository for database operations.

use domain::models::EventFields;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::EventEntity;
use crate::metrics::QueryTimer;

const EVENT_COLUMNS: &str =
    "id, title, description, date, location, organizer_id, created_at, updated_at";

/// Repository for event-related database operations.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an event. Fails with a unique violation on a duplicate
    /// (title, date, location).
    pub async fn create(
        &self,
        organizer_id: Uuid,
        fields: &EventFields,
    ) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_event");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            INSERT INTO events (title, description, date, location, organizer_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.date)
        .bind(&fields.location)
        .bind(organizer_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Overwrite the editable fields of an event.
    pub async fn update(&self, id: Uuid, fields: &EventFields) -> Result<EventEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_event");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            UPDATE events
            SET title = $2, description = $3, date = $4, location = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.date)
        .bind(&fields.location)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    pub async fn list_by_organizer(&self, user_id: Uuid) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events_by_organizer");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE organizer_id = $1
            ORDER BY date, created_at
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Events the user is invited to, whatever the RSVP status.
    pub async fn list_by_invitee(&self, user_id: Uuid) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_events_by_invitee");
        let result = sqlx::query_as::<_, EventEntity>(
            r#"
            SELECT e.id, e.title, e.description, e.date, e.location, e.organizer_id,
                   e.created_at, e.updated_at
            FROM events e
            JOIN invitations i ON i.event_id = e.id
            WHERE i.user_id = $1
            ORDER BY e.date, e.created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
