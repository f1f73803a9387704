//! Database metrics: query durations, pool gauges and session housekeeping.

use std::time::Instant;

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;

/// Records one query's duration under `database_query_duration_seconds`.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Samples the pool's active/idle/total connection gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_connections_active").set(size.saturating_sub(idle) as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

pub fn record_sessions_purged(count: u64) {
    counter!("sessions_purged_total").increment(count);
}

/// Times a repository query.
///
/// ```ignore
/// let timer = QueryTimer::new("find_event_by_id");
/// let result = sqlx::query_as::<_, EventEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// result
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        record_query_duration(self.query_name, self.start.elapsed().as_secs_f64());
    }
}
