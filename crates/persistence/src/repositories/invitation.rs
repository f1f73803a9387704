//! Invitation repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{InvitationEntity, InvitationStatusDb, InvitationWithUserEntity};
use crate::metrics::QueryTimer;

/// Repository for invitation-related database operations.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an invitation. Fails with a unique violation if the user is
    /// already invited to the event.
    pub async fn create(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        status: InvitationStatusDb,
    ) -> Result<InvitationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invitation");
        let result = sqlx::query_as::<_, InvitationEntity>(
            r#"
            INSERT INTO invitations (event_id, user_id, status)
            VALUES ($1, $2, $3)
            RETURNING id, event_id, user_id, status, created_at, updated_at
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a pending invitation unless one exists, then load the row.
    /// Returns the invitation and whether this call created it.
    pub async fn get_or_create(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<(InvitationEntity, bool), sqlx::Error> {
        let timer = QueryTimer::new("get_or_create_invitation");
        let inserted = sqlx::query(
            r#"
            INSERT INTO invitations (event_id, user_id, status)
            VALUES ($1, $2, 'pending')
            ON CONFLICT (event_id, user_id) DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected()
            > 0;

        let entity = sqlx::query_as::<_, InvitationEntity>(
            r#"
            SELECT id, event_id, user_id, status, created_at, updated_at
            FROM invitations
            WHERE event_id = $1 AND user_id = $2
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok((entity, inserted))
    }

    /// Set the status of a still-pending invitation. Returns `None` when the
    /// invitation has already been answered.
    pub async fn update_if_pending(
        &self,
        id: Uuid,
        status: InvitationStatusDb,
    ) -> Result<Option<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_pending_invitation");
        let result = sqlx::query_as::<_, InvitationEntity>(
            r#"
            UPDATE invitations
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, event_id, user_id, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List an event's invitations with user details, optionally by status.
    pub async fn list_for_event(
        &self,
        event_id: Uuid,
        status: Option<InvitationStatusDb>,
    ) -> Result<Vec<InvitationWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_invitations_for_event");
        let result = sqlx::query_as::<_, InvitationWithUserEntity>(
            r#"
            SELECT i.id AS invitation_id, i.event_id, i.user_id, i.status,
                   u.email, u.first_name, u.last_name
            FROM invitations i
            JOIN users u ON u.id = i.user_id
            WHERE i.event_id = $1
              AND ($2::invitation_status IS NULL OR i.status = $2)
            ORDER BY i.created_at
            "#,
        )
        .bind(event_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
