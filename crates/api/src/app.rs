use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use domain::services::{EventService, NotificationSender, PlacesProvider};
use persistence::repositories::{SessionRepository, UserRepository};
use persistence::PgEventStore;
use sqlx::PgPool;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, security_headers_middleware, trace_id,
};
use crate::routes::{auth, events, health, notifications, places};
use crate::services::{
    EmailService, GoogleOAuthClient, GooglePlacesClient, OAuthProvider, SessionCookies,
};

/// Event service wired to PostgreSQL and the configured notifier.
pub type AppEventService = EventService<PgEventStore, Arc<dyn NotificationSender>>;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub cookies: SessionCookies,
    pub notifier: Arc<dyn NotificationSender>,
    pub oauth: Arc<dyn OAuthProvider>,
    pub places: Arc<dyn PlacesProvider>,
}

impl AppState {
    /// State backed by the real email, Google OAuth and Places clients.
    pub fn new(config: Config, pool: PgPool) -> Self {
        let notifier: Arc<dyn NotificationSender> =
            Arc::new(EmailService::new(config.email.clone()));
        let oauth: Arc<dyn OAuthProvider> = Arc::new(GoogleOAuthClient::new(config.oauth.clone()));
        let places: Arc<dyn PlacesProvider> =
            Arc::new(GooglePlacesClient::new(config.places.clone()));

        Self::with_providers(config, pool, notifier, oauth, places)
    }

    /// State with caller-supplied outbound providers.
    pub fn with_providers(
        config: Config,
        pool: PgPool,
        notifier: Arc<dyn NotificationSender>,
        oauth: Arc<dyn OAuthProvider>,
        places: Arc<dyn PlacesProvider>,
    ) -> Self {
        Self {
            cookies: SessionCookies::new(config.session.clone()),
            config: Arc::new(config),
            pool,
            notifier,
            oauth,
            places,
        }
    }

    pub fn events(&self) -> AppEventService {
        EventService::new(PgEventStore::new(self.pool.clone()), self.notifier.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn sessions(&self) -> SessionRepository {
        SessionRepository::new(self.pool.clone())
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    build_router(AppState::new(config, pool))
}

pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Explicit origins so the session cookie can be sent cross-site.
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE])
            .allow_credentials(true)
    };

    let event_routes = Router::new()
        .route("/api/events/create", post(events::create_event))
        .route("/api/events/my-created", get(events::my_created_events))
        .route("/api/events/my-collaborations", get(events::my_collaborations))
        .route("/api/events/:event_id/invite", post(events::invite))
        .route("/api/events/:event_id/rsvp", post(events::rsvp))
        .route("/api/events/:event_id/attendees", get(events::list_attendees))
        .route("/api/events/:event_id/send-message", post(events::send_message))
        .route("/api/events/:event_id/invitations", get(events::list_invitations))
        .route("/api/events/:event_id/messages", get(events::list_messages))
        .route(
            "/api/events/:event_id/edit",
            put(events::edit_event).fallback(events::edit_method_not_allowed),
        )
        .route("/api/notifications", get(notifications::list_notifications));

    let auth_routes = Router::new()
        .route("/api/auth/login", get(auth::login))
        .route("/api/auth/callback", get(auth::callback))
        .route("/api/user-details", get(auth::user_details))
        .route("/api/logout", post(auth::logout));

    let public_routes = Router::new()
        .route("/api/search", post(places::search))
        .route("/api/health", get(health::health_check))
        .route("/api/health/live", get(health::live))
        .route("/api/health/ready", get(health::ready))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(event_routes)
        .merge(auth_routes)
        .merge(public_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
