//! Session cookie helper.
//!
//! The session cookie carries an opaque random token; only its SHA-256
//! hash is stored server-side.

use axum::http::{header::COOKIE, HeaderMap};

use crate::config::SessionConfig;

/// Builds, clears and reads the httpOnly session cookie.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    config: SessionConfig,
}

impl SessionCookies {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &str {
        &self.config.cookie_name
    }

    pub fn ttl_secs(&self) -> i64 {
        self.config.ttl_secs
    }

    /// `Set-Cookie` value carrying `token`.
    ///
    /// SameSite=Lax so the cookie survives the top-level redirect back
    /// from the OAuth provider.
    pub fn build(&self, token: &str) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
            self.config.cookie_name, token, self.config.ttl_secs
        );
        if self.config.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value that expires the session cookie.
    pub fn clear(&self) -> String {
        let mut cookie = format!(
            "{}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax",
            self.config.cookie_name
        );
        if self.config.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Reads the session token from the request's `Cookie` header.
    pub fn extract<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|h| h.to_str().ok())
            .flat_map(|header| header.split(';'))
            .map(str::trim)
            .find_map(|cookie| {
                let (name, value) = cookie.split_once('=')?;
                (name == self.config.cookie_name && !value.is_empty()).then_some(value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn cookies(secure: bool) -> SessionCookies {
        SessionCookies::new(SessionConfig {
            cookie_name: "nightout_session".to_string(),
            ttl_secs: 3600,
            secure,
        })
    }

    #[test]
    fn test_build_cookie() {
        let cookie = cookies(false).build("abc123");
        assert_eq!(
            cookie,
            "nightout_session=abc123; HttpOnly; Path=/; Max-Age=3600; SameSite=Lax"
        );
    }

    #[test]
    fn test_build_secure_cookie() {
        let cookie = cookies(true).build("abc123");
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn test_clear_cookie() {
        let cookie = cookies(false).clear();
        assert!(cookie.starts_with("nightout_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; nightout_session=tok-1; other=x"),
        );
        assert_eq!(cookies(false).extract(&headers), Some("tok-1"));
    }

    #[test]
    fn test_extract_missing_or_empty() {
        let mut headers = HeaderMap::new();
        assert_eq!(cookies(false).extract(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("nightout_session="));
        assert_eq!(cookies(false).extract(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("nightout_session_old=tok"));
        assert_eq!(cookies(false).extract(&headers), None);
    }
}
