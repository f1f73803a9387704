//! External service integrations.

pub mod cookies;
pub mod email;
pub mod oauth;
pub mod places;

pub use cookies::SessionCookies;
pub use email::EmailService;
pub use oauth::{GoogleOAuthClient, OAuthError, OAuthProvider, OAuthUserInfo};
pub use places::GooglePlacesClient;
