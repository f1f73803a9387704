//! Session extractors.
//!
//! The session row is found by hashing the cookie token. Expired sessions
//! are treated as absent.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::User;
use persistence::entities::SessionEntity;
use shared::crypto::sha256_hex;

use crate::app::AppState;
use crate::error::ApiError;

/// The caller's session, if the cookie names a live one.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// Raw cookie token, present even if it no longer names a session.
    pub token: Option<String>,
    pub session: Option<SessionEntity>,
}

impl SessionContext {
    /// The logged-in user's id, if any.
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.session.as_ref().and_then(|s| s.user_id)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<SessionContext>() {
            return Ok(ctx.clone());
        }

        let Some(token) = state.cookies.extract(&parts.headers).map(str::to_string) else {
            return Ok(Self::default());
        };

        let session = state
            .sessions()
            .find_by_token_hash(&sha256_hex(&token))
            .await?
            .filter(|s| !s.is_expired());

        let ctx = Self {
            token: Some(token),
            session,
        };
        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}

/// The authenticated user. Rejects with 401 when there is no logged-in
/// session.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = SessionContext::from_request_parts(parts, state).await?;
        let user_id = ctx.user_id().ok_or_else(unauthenticated)?;

        let user = state
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(unauthenticated)?;

        Ok(Self(user.into()))
    }
}

fn unauthenticated() -> ApiError {
    ApiError::Unauthorized("Authentication required".to_string())
}
