//! Notification log models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A notification delivered to a user. Unique per (user, message).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Notification entry in a listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct NotificationItem {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl From<Notification> for NotificationItem {
    fn from(n: Notification) -> Self {
        Self {
            message: n.message,
            timestamp: n.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListNotificationsResponse {
    pub notifications: Vec<NotificationItem>,
}
