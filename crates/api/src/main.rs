use std::time::Duration;

use anyhow::{Context, Result};
use nightout_api::{
    app,
    config::Config,
    jobs::{JobScheduler, PoolMetricsJob, SessionCleanupJob},
    middleware::{init_metrics, logging::init_logging},
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load().context("failed to load configuration")?;

    init_logging(&config.logging).context("failed to initialize logging")?;
    init_metrics().context("failed to initialize metrics")?;

    info!("Starting Nightout API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    let mut scheduler = JobScheduler::new();
    scheduler.register(SessionCleanupJob::new(pool.clone()));
    scheduler.register(PoolMetricsJob::new(pool.clone()));
    scheduler.start();

    let addr = config.socket_addr().context("invalid server address")?;
    let app = app::create_app(config, pool);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
