//! OAuth login, session and profile endpoint handlers.
//!
//! Login is a two-step authorization-code flow. `GET /api/auth/login`
//! stores a CSRF state on the caller's session (creating an anonymous
//! session if needed) and redirects to Google. `GET /api/auth/callback`
//! checks the state, exchanges the code, upserts the user and rotates the
//! session token.

use axum::{
    extract::{Query, State},
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use domain::models::{NewUser, User, UserProfile};
use serde::{Deserialize, Serialize};
use shared::crypto::{constant_time_eq, generate_oauth_state, generate_session_token, sha256_hex};
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CurrentUser, SessionContext};
use crate::middleware::metrics;

const INVALID_STATE: &str = "Invalid OAuth state.";

/// Query parameters Google appends to the redirect URI.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// GET /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ctx: SessionContext,
) -> Result<Response, ApiError> {
    let csrf_state = generate_oauth_state();
    let mut headers = HeaderMap::new();

    let session_id = match ctx.session {
        Some(session) => session.id,
        None => {
            let token = generate_session_token();
            let session = state
                .sessions()
                .create(&sha256_hex(&token), session_expiry(&state))
                .await?;
            append_cookie(&mut headers, &state.cookies.build(&token))?;
            session.id
        }
    };
    state.sessions().set_oauth_state(session_id, &csrf_state).await?;

    let url = state.oauth.authorization_url(&csrf_state)?;
    headers.insert(
        LOCATION,
        HeaderValue::from_str(&url).map_err(|e| ApiError::Internal(e.to_string()))?,
    );

    Ok((StatusCode::FOUND, headers).into_response())
}

/// GET /api/auth/callback?code=&state=
pub async fn callback(
    State(state): State<AppState>,
    ctx: SessionContext,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::Validation("Authorization code is missing.".to_string()))?;

    let session = ctx.session.ok_or_else(|| {
        metrics::record_login("invalid_state");
        ApiError::Validation(INVALID_STATE.to_string())
    })?;
    let state_matches = match (session.oauth_state.as_deref(), query.state.as_deref()) {
        (Some(stored), Some(returned)) => constant_time_eq(stored, returned),
        _ => false,
    };
    if !state_matches {
        warn!(session_id = %session.id, "OAuth state mismatch");
        metrics::record_login("invalid_state");
        return Err(ApiError::Validation(INVALID_STATE.to_string()));
    }

    let profile = match fetch_profile(&state, &code).await {
        Ok(profile) => profile,
        Err(e) => {
            metrics::record_login("provider_error");
            return Err(e);
        }
    };

    let new_user = NewUser::from_profile(
        &profile.email,
        profile.given_name.as_deref(),
        profile.family_name.as_deref(),
    );
    let user: User = state.users().get_or_create(&new_user).await?.into();
    state.users().update_last_login(user.id, Utc::now()).await?;

    let token = generate_session_token();
    state
        .sessions()
        .authenticate(
            session.id,
            &sha256_hex(&token),
            user.id,
            session_expiry(&state),
        )
        .await?;

    metrics::record_login("success");
    info!(user_id = %user.id, "User logged in");

    let mut headers = HeaderMap::new();
    append_cookie(&mut headers, &state.cookies.build(&token))?;
    Ok((headers, Json(user.profile())).into_response())
}

/// GET /api/user-details
pub async fn user_details(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(user.profile())
}

/// POST /api/logout
///
/// Always succeeds, whether or not a session existed.
pub async fn logout(
    State(state): State<AppState>,
    ctx: SessionContext,
) -> Result<Response, ApiError> {
    if let Some(token) = ctx.token.as_deref() {
        state.sessions().delete_by_token_hash(&sha256_hex(token)).await?;
        if let Some(user_id) = ctx.user_id() {
            info!(user_id = %user_id, "User logged out");
        }
    }

    let mut headers = HeaderMap::new();
    append_cookie(&mut headers, &state.cookies.clear())?;
    Ok((
        headers,
        Json(LogoutResponse {
            message: "Successfully logged out.".to_string(),
        }),
    )
        .into_response())
}

async fn fetch_profile(
    state: &AppState,
    code: &str,
) -> Result<crate::services::OAuthUserInfo, ApiError> {
    let access_token = state.oauth.exchange_code(code).await?;
    Ok(state.oauth.fetch_user_info(&access_token).await?)
}

fn session_expiry(state: &AppState) -> chrono::DateTime<Utc> {
    Utc::now() + Duration::seconds(state.cookies.ttl_secs())
}

fn append_cookie(headers: &mut HeaderMap, cookie: &str) -> Result<(), ApiError> {
    let value = HeaderValue::from_str(cookie).map_err(|e| ApiError::Internal(e.to_string()))?;
    headers.append(SET_COOKIE, value);
    Ok(())
}
