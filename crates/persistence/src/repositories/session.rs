//! Session repository for database operations.
//!
//! Sessions are looked up by the SHA-256 hash of the cookie token; the raw
//! token is never stored.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::SessionEntity;
use crate::metrics::QueryTimer;

const SESSION_COLUMNS: &str = "id, token_hash, user_id, oauth_state, created_at, expires_at";

/// Repository for server-side sessions.
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an anonymous session.
    pub async fn create(
        &self,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<SessionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_session");
        let result = sqlx::query_as::<_, SessionEntity>(&format!(
            r#"
            INSERT INTO sessions (token_hash, expires_at)
            VALUES ($1, $2)
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(token_hash)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a live (non-expired) session by token hash.
    pub async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_session_by_token");
        let result = sqlx::query_as::<_, SessionEntity>(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM sessions
            WHERE token_hash = $1 AND expires_at > NOW()
            "#
        ))
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Store the CSRF state of an OAuth login in progress.
    pub async fn set_oauth_state(&self, id: Uuid, state: &str) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("set_session_oauth_state");
        sqlx::query("UPDATE sessions SET oauth_state = $2 WHERE id = $1")
            .bind(id)
            .bind(state)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(())
    }

    /// Bind a user to the session under a fresh token, clearing the OAuth
    /// state and extending the expiry.
    pub async fn authenticate(
        &self,
        id: Uuid,
        new_token_hash: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<SessionEntity, sqlx::Error> {
        let timer = QueryTimer::new("authenticate_session");
        let result = sqlx::query_as::<_, SessionEntity>(&format!(
            r#"
            UPDATE sessions
            SET token_hash = $2, user_id = $3, oauth_state = NULL, expires_at = $4
            WHERE id = $1
            RETURNING {SESSION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(new_token_hash)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a session by token hash (logout).
    pub async fn delete_by_token_hash(&self, token_hash: &str) -> Result<(), sqlx::Error> {
        let timer = QueryTimer::new("delete_session_by_token");
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(())
    }

    /// Remove expired sessions. Returns the number deleted.
    pub async fn delete_expired(&self) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_expired_sessions");
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}
