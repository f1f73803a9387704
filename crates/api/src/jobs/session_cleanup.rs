//! Purges expired sessions.

use std::time::Duration;

use persistence::repositories::SessionRepository;
use sqlx::PgPool;

use super::scheduler::Job;

pub struct SessionCleanupJob {
    sessions: SessionRepository,
}

impl SessionCleanupJob {
    pub fn new(pool: PgPool) -> Self {
        Self {
            sessions: SessionRepository::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl Job for SessionCleanupJob {
    fn name(&self) -> &'static str {
        "session_cleanup"
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(3600)
    }

    async fn execute(&self) -> Result<(), String> {
        let deleted = self
            .sessions
            .delete_expired()
            .await
            .map_err(|e| e.to_string())?;
        persistence::metrics::record_sessions_purged(deleted);
        if deleted > 0 {
            tracing::info!(deleted, "Expired sessions purged");
        }
        Ok(())
    }
}
