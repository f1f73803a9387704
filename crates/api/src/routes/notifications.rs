//! Notification listing endpoint handler.

use axum::{extract::State, Json};
use domain::models::notification::{ListNotificationsResponse, NotificationItem};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ListNotificationsResponse>, ApiError> {
    let notifications = state.events().list_notifications(&user).await?;
    Ok(Json(ListNotificationsResponse {
        notifications: notifications
            .into_iter()
            .map(NotificationItem::from)
            .collect(),
    }))
}
