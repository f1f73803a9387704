//! Database connection pool management.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::{Duration, Instant};

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
    }
}

/// Connects the pool and fails fast if the database is unreachable.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = config.pool_options().connect(&config.url).await?;
    tracing::info!(
        max_connections = config.max_connections,
        idle = pool.num_idle(),
        "Database pool ready"
    );
    Ok(pool)
}

/// Applies pending schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    let migrator = sqlx::migrate!("src/migrations");
    tracing::info!(count = migrator.iter().count(), "Applying migrations");
    migrator.run(pool).await
}

/// Round-trips a trivial query and returns its latency.
pub async fn ping(pool: &PgPool) -> Result<Duration, sqlx::Error> {
    let start = Instant::now();
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(start.elapsed())
}
