//! Event, invitation and messaging endpoint handlers.

use axum::{
    extract::{Query, State},
    Json,
};
use domain::models::event::{
    CreateEventRequest, CreateEventResponse, EditEventRequest, EditEventResponse, EventSummary,
    ListEventsResponse,
};
use domain::models::invitation::{
    InvitationSummary, InvitationsQuery, InviteRequest, ListAttendeesResponse,
    ListInvitationsResponse, RsvpRequest, RsvpResponse,
};
use domain::models::message::{ListMessagesResponse, MessageItem, SendMessageRequest};
use domain::models::EventRole;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CurrentUser, JsonBody, PathParam};
use crate::middleware::metrics;

const SUCCESS: &str = "success";

/// `{"status": "success"}`
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    fn success() -> Self {
        Self {
            status: SUCCESS.to_string(),
        }
    }
}

/// POST /api/events/create
pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(request): JsonBody<CreateEventRequest>,
) -> Result<Json<CreateEventResponse>, ApiError> {
    let event = state.events().create_event(&user, request).await?;
    metrics::record_event_created();

    Ok(Json(CreateEventResponse {
        status: SUCCESS.to_string(),
        event_id: event.id,
    }))
}

/// PUT /api/events/:event_id/edit
pub async fn edit_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathParam(event_id): PathParam<Uuid>,
    JsonBody(request): JsonBody<EditEventRequest>,
) -> Result<Json<EditEventResponse>, ApiError> {
    let event = state.events().edit_event(&user, event_id, request).await?;

    Ok(Json(EditEventResponse {
        message: "Event updated successfully".to_string(),
        event,
    }))
}

/// Any method other than PUT on the edit route.
pub async fn edit_method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Invalid request method. Only PUT is allowed.".to_string())
}

/// GET /api/events/my-created
pub async fn my_created_events(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ListEventsResponse>, ApiError> {
    list_events(&state, &user, EventRole::Organizer).await
}

/// GET /api/events/my-collaborations
pub async fn my_collaborations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ListEventsResponse>, ApiError> {
    list_events(&state, &user, EventRole::Collaborator).await
}

async fn list_events(
    state: &AppState,
    user: &domain::models::User,
    role: EventRole,
) -> Result<Json<ListEventsResponse>, ApiError> {
    let events = state.events().list_events(user, role).await?;
    Ok(Json(ListEventsResponse {
        events: events.into_iter().map(EventSummary::from).collect(),
    }))
}

/// POST /api/events/:event_id/invite
pub async fn invite(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathParam(event_id): PathParam<Uuid>,
    JsonBody(request): JsonBody<InviteRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let invitation = state.events().invite(&user, event_id, request).await?;
    metrics::record_invitation_sent();

    info!(invitation_id = %invitation.id, event_id = %event_id, "Invitation created");
    Ok(Json(StatusResponse::success()))
}

/// POST /api/events/:event_id/rsvp
pub async fn rsvp(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathParam(event_id): PathParam<Uuid>,
    JsonBody(request): JsonBody<RsvpRequest>,
) -> Result<Json<RsvpResponse>, ApiError> {
    let invitation = state.events().rsvp(&user, event_id, &request.status).await?;
    metrics::record_rsvp(invitation.status.as_str());

    Ok(Json(RsvpResponse {
        status: SUCCESS.to_string(),
        rsvp_status: invitation.status,
    }))
}

/// GET /api/events/:event_id/invitations?status=
pub async fn list_invitations(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    PathParam(event_id): PathParam<Uuid>,
    Query(query): Query<InvitationsQuery>,
) -> Result<Json<ListInvitationsResponse>, ApiError> {
    let rows = state
        .events()
        .list_invitations(event_id, query.status.as_deref())
        .await?;

    Ok(Json(ListInvitationsResponse {
        invitations: rows.into_iter().map(InvitationSummary::from).collect(),
    }))
}

/// GET /api/events/:event_id/attendees
pub async fn list_attendees(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    PathParam(event_id): PathParam<Uuid>,
) -> Result<Json<ListAttendeesResponse>, ApiError> {
    let attendees = state.events().list_attendees(event_id).await?;
    Ok(Json(ListAttendeesResponse { attendees }))
}

/// POST /api/events/:event_id/send-message
pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    PathParam(event_id): PathParam<Uuid>,
    JsonBody(request): JsonBody<SendMessageRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    state
        .events()
        .post_message(&user, event_id, request.message.as_deref())
        .await?;
    metrics::record_message_posted();

    Ok(Json(StatusResponse::success()))
}

/// GET /api/events/:event_id/messages
pub async fn list_messages(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    PathParam(event_id): PathParam<Uuid>,
) -> Result<Json<ListMessagesResponse>, ApiError> {
    let messages = state.events().list_messages(event_id).await?;
    Ok(Json(ListMessagesResponse {
        messages: messages.into_iter().map(MessageItem::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse};

    #[test]
    fn test_status_response_shape() {
        let json = serde_json::to_value(StatusResponse::success()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "success" }));
    }

    #[tokio::test]
    async fn test_edit_method_not_allowed() {
        let response = edit_method_not_allowed().await.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
