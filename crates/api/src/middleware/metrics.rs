//! Prometheus metrics: HTTP instrumentation, business counters and the
//! `/metrics` endpoint.

use std::sync::OnceLock;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::app::AppState;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

const DURATION_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0];

/// Installs the global Prometheus recorder. Call once at startup.
pub fn init_metrics() -> Result<(), BuildError> {
    if PROMETHEUS_HANDLE.get().is_some() {
        return Ok(());
    }
    let handle = PrometheusBuilder::new()
        .set_buckets(DURATION_BUCKETS)?
        .install_recorder()?;
    let _ = PROMETHEUS_HANDLE.set(handle);
    Ok(())
}

/// Records `http_requests_total` and `http_request_duration_seconds`,
/// labelled by matched route rather than raw path.
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().as_str().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(start.elapsed().as_secs_f64());

    response
}

/// `GET /metrics`: Prometheus text exposition.
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    persistence::metrics::record_pool_metrics(&state.pool);

    match PROMETHEUS_HANDLE.get() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            "Metrics not initialized".to_string(),
        ),
    }
}

pub fn record_event_created() {
    counter!("events_created_total").increment(1);
}

pub fn record_invitation_sent() {
    counter!("invitations_sent_total").increment(1);
}

pub fn record_rsvp(status: &str) {
    counter!("rsvps_recorded_total", "status" => status.to_string()).increment(1);
}

pub fn record_message_posted() {
    counter!("messages_posted_total").increment(1);
}

/// `outcome` is one of `success`, `invalid_state` or `provider_error`.
pub fn record_login(outcome: &'static str) {
    counter!("logins_total", "outcome" => outcome).increment(1);
}

pub fn record_place_search(result_count: usize) {
    counter!("place_searches_total").increment(1);
    histogram!("place_search_results").record(result_count as f64);
}
