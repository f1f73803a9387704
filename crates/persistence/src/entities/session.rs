//! Session entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the sessions table.
#[derive(Debug, Clone, FromRow)]
pub struct SessionEntity {
    pub id: Uuid,
    pub token_hash: String,
    /// Set once the OAuth login completes.
    pub user_id: Option<Uuid>,
    /// CSRF state of an in-flight OAuth login.
    pub oauth_state: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionEntity {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
