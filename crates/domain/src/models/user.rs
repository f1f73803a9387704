//! User domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user account, created on first OAuth login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Profile view returned by login and user-details endpoints.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Public profile of the authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Values used to create a user on first login.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    /// Builds a new user from provider profile data; the username is the email.
    pub fn from_profile(email: &str, given_name: Option<&str>, family_name: Option<&str>) -> Self {
        Self {
            email: email.to_string(),
            username: email.to_string(),
            first_name: given_name.unwrap_or_default().to_string(),
            last_name: family_name.unwrap_or_default().to_string(),
        }
    }
}
