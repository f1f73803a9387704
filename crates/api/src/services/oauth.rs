//! Google OAuth 2.0 authorization-code client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::config::OAuthConfig;

/// Scopes requested at login.
pub const OAUTH_SCOPES: &str = "profile email";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Invalid OAuth endpoint URL: {0}")]
    InvalidUrl(String),

    /// The provider answered with an error status.
    #[error("OAuth provider rejected the request: {0}")]
    Rejected(String),

    /// The provider could not be reached or returned an unreadable body.
    #[error("OAuth provider unavailable: {0}")]
    Transport(String),
}

/// Profile returned by the provider's userinfo endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OAuthUserInfo {
    pub email: String,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// An OAuth authorization-code provider.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// URL the browser is redirected to, carrying the CSRF `state`.
    fn authorization_url(&self, state: &str) -> Result<String, OAuthError>;

    /// Exchanges an authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<String, OAuthError>;

    async fn fetch_user_info(&self, access_token: &str) -> Result<OAuthUserInfo, OAuthError>;
}

/// Google implementation of [`OAuthProvider`].
#[derive(Clone)]
pub struct GoogleOAuthClient {
    config: OAuthConfig,
    http_client: Client,
}

impl GoogleOAuthClient {
    pub fn new(config: OAuthConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl OAuthProvider for GoogleOAuthClient {
    fn authorization_url(&self, state: &str) -> Result<String, OAuthError> {
        let url = Url::parse_with_params(
            &self.config.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", OAUTH_SCOPES),
                ("state", state),
                ("access_type", "offline"),
            ],
        )
        .map_err(|e| OAuthError::InvalidUrl(e.to_string()))?;
        Ok(url.into())
    }

    async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http_client
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| OAuthError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, error = %error_body, "Google token exchange failed");
            return Err(OAuthError::Rejected(format!("token endpoint returned {}", status)));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| OAuthError::Transport(e.to_string()))?;
        Ok(token.access_token)
    }

    async fn fetch_user_info(&self, access_token: &str) -> Result<OAuthUserInfo, OAuthError> {
        let response = self
            .http_client
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| OAuthError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(status = %status, "Google userinfo request failed");
            return Err(OAuthError::Rejected(format!("userinfo endpoint returned {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| OAuthError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GoogleOAuthClient {
        GoogleOAuthClient::new(OAuthConfig {
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:8080/api/auth/callback".to_string(),
            ..OAuthConfig::default()
        })
    }

    #[test]
    fn test_authorization_url() {
        let url = client().authorization_url("state-abc").unwrap();
        let parsed = Url::parse(&url).unwrap();

        assert_eq!(parsed.host_str(), Some("accounts.google.com"));
        assert_eq!(parsed.path(), "/o/oauth2/auth");

        let params: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();
        assert_eq!(params["client_id"], "client-123");
        assert_eq!(params["redirect_uri"], "http://localhost:8080/api/auth/callback");
        assert_eq!(params["scope"], "profile email");
        assert_eq!(params["state"], "state-abc");
        assert_eq!(params["access_type"], "offline");
        assert_eq!(params["response_type"], "code");
    }

    #[test]
    fn test_authorization_url_invalid_base() {
        let client = GoogleOAuthClient::new(OAuthConfig {
            authorize_url: "not a url".to_string(),
            ..OAuthConfig::default()
        });
        assert!(matches!(
            client.authorization_url("s"),
            Err(OAuthError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_user_info_optional_names() {
        let info: OAuthUserInfo =
            serde_json::from_value(serde_json::json!({ "email": "a@example.com" })).unwrap();
        assert_eq!(info.email, "a@example.com");
        assert!(info.given_name.is_none());
    }
}
