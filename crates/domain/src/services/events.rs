//! Event lifecycle, invitations, RSVP and messaging.

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use shared::validation::parse_event_date;

use super::notification::{EmailNotice, NotificationResult, NotificationSender};
use super::store::{EventStore, StoreError};
use super::DomainError;
use crate::models::event::{CreateEventRequest, EditEventRequest, EditedEvent};
use crate::models::invitation::InviteRequest;
use crate::models::{
    Attendee, Event, EventFields, EventRole, Invitation, InvitationStatus, InvitationWithUser,
    MessageWithAuthor, Notification, User,
};

const REQUIRED_FIELDS_MESSAGE: &str =
    "All fields (title, description, date, location) are required.";
const DUPLICATE_EVENT_MESSAGE: &str = "Event with this Title, Date and Location already exists.";
const EVENT_NOT_FOUND: &str = "Event not found";
const ALREADY_RESPONDED: &str = "Already responded";
const INVALID_STATUS: &str = "Invalid status";

/// Domain operations on events, backed by an [`EventStore`] and a
/// [`NotificationSender`].
pub struct EventService<S, N> {
    store: S,
    notifier: N,
}

impl<S: EventStore, N: NotificationSender> EventService<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        Self { store, notifier }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates an event owned by `organizer`.
    pub async fn create_event(
        &self,
        organizer: &User,
        request: CreateEventRequest,
    ) -> Result<Event, DomainError> {
        let fields = resolve_fields(request)?;

        let event = self
            .store
            .insert_event(organizer.id, &fields)
            .await
            .map_err(duplicate_event)?;

        info!(event_id = %event.id, organizer_id = %organizer.id, "Event created");
        Ok(event)
    }

    /// Applies a partial update. Only the organizer may edit.
    pub async fn edit_event(
        &self,
        user: &User,
        event_id: Uuid,
        request: EditEventRequest,
    ) -> Result<EditedEvent, DomainError> {
        let event = self.require_event(event_id).await?;
        if event.organizer_id != user.id {
            return Err(DomainError::Forbidden(
                "You are not allowed to edit this event.".to_string(),
            ));
        }

        let merged = CreateEventRequest {
            title: request.title.unwrap_or(event.title),
            description: request.description.unwrap_or(event.description),
            date: request.date.unwrap_or_else(|| event.date.to_rfc3339()),
            location: request.location.unwrap_or(event.location),
        };
        let fields = resolve_fields(merged)?;

        let updated = self
            .store
            .update_event(event_id, &fields)
            .await
            .map_err(duplicate_event)?;

        info!(event_id = %event_id, "Event updated");
        Ok(EditedEvent::new(updated, &user.email))
    }

    pub async fn list_events(&self, user: &User, role: EventRole) -> Result<Vec<Event>, DomainError> {
        let events = match role {
            EventRole::Organizer => self.store.list_events_by_organizer(user.id).await?,
            EventRole::Collaborator => self.store.list_events_by_invitee(user.id).await?,
        };
        Ok(events)
    }

    /// Invites the user registered under `request.email` and emails them.
    pub async fn invite(
        &self,
        organizer: &User,
        event_id: Uuid,
        request: InviteRequest,
    ) -> Result<Invitation, DomainError> {
        let event = self.require_event(event_id).await?;
        if event.organizer_id != organizer.id {
            return Err(DomainError::Forbidden(
                "Only the organizer can invite users to this event.".to_string(),
            ));
        }
        request.validate()?;

        let invitee = self
            .store
            .find_user_by_email(&request.email)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))?;

        let invitation = self
            .store
            .insert_invitation(event.id, invitee.id, InvitationStatus::Pending)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => {
                    DomainError::Conflict("User already invited".to_string())
                }
                other => DomainError::Store(other),
            })?;

        info!(
            event_id = %event.id,
            invitee_id = %invitee.id,
            "Invitation created"
        );

        self.notify(&invitee, EmailNotice::invitation(&invitee, &event, organizer))
            .await;

        Ok(invitation)
    }

    /// Records `user`'s response. Only a pending invitation may change.
    pub async fn rsvp(
        &self,
        user: &User,
        event_id: Uuid,
        status: &str,
    ) -> Result<Invitation, DomainError> {
        let status: InvitationStatus = status
            .parse()
            .map_err(|_| DomainError::Validation(INVALID_STATUS.to_string()))?;
        let event = self.require_event(event_id).await?;

        let (invitation, _) = self.store.get_or_create_invitation(event.id, user.id).await?;
        if !invitation.status.accepts_response() {
            return Err(DomainError::Conflict(ALREADY_RESPONDED.to_string()));
        }

        let updated = self
            .store
            .update_pending_invitation(invitation.id, status)
            .await?
            .ok_or_else(|| DomainError::Conflict(ALREADY_RESPONDED.to_string()))?;

        info!(
            event_id = %event.id,
            user_id = %user.id,
            status = %status,
            "RSVP recorded"
        );

        match self.store.find_user_by_id(event.organizer_id).await {
            Ok(Some(organizer)) => {
                let notice = EmailNotice::rsvp_update(&organizer, &event, user, status);
                self.notify(&organizer, notice).await;
            }
            Ok(None) => warn!(event_id = %event.id, "Organizer missing, RSVP notification skipped"),
            Err(e) => warn!(
                event_id = %event.id,
                error = %e,
                "Organizer lookup failed, RSVP notification skipped"
            ),
        }

        Ok(updated)
    }

    /// Invitations for an event, optionally filtered by status.
    pub async fn list_invitations(
        &self,
        event_id: Uuid,
        status_filter: Option<&str>,
    ) -> Result<Vec<InvitationWithUser>, DomainError> {
        let status = status_filter
            .map(|s| {
                s.parse::<InvitationStatus>()
                    .map_err(|_| DomainError::Validation(INVALID_STATUS.to_string()))
            })
            .transpose()?;
        self.require_event(event_id).await?;

        Ok(self.store.list_invitations(event_id, status).await?)
    }

    /// Every invited user, whatever their response.
    pub async fn list_attendees(&self, event_id: Uuid) -> Result<Vec<Attendee>, DomainError> {
        self.require_event(event_id).await?;
        let rows = self.store.list_invitations(event_id, None).await?;
        Ok(rows.into_iter().map(Attendee::from).collect())
    }

    /// Posts a message. Reposting identical content is accepted silently.
    pub async fn post_message(
        &self,
        user: &User,
        event_id: Uuid,
        content: Option<&str>,
    ) -> Result<(), DomainError> {
        self.require_event(event_id).await?;

        let content = match content {
            Some(c) if !c.trim().is_empty() => c,
            _ => return Err(DomainError::Validation("No message provided".to_string())),
        };

        let inserted = self.store.insert_message(event_id, user.id, content).await?;
        if inserted {
            info!(event_id = %event_id, user_id = %user.id, "Message posted");
        }
        Ok(())
    }

    /// Messages for an event, newest first.
    pub async fn list_messages(&self, event_id: Uuid) -> Result<Vec<MessageWithAuthor>, DomainError> {
        self.require_event(event_id).await?;
        Ok(self.store.list_messages(event_id).await?)
    }

    pub async fn list_notifications(&self, user: &User) -> Result<Vec<Notification>, DomainError> {
        Ok(self.store.list_notifications(user.id).await?)
    }

    async fn require_event(&self, event_id: Uuid) -> Result<Event, DomainError> {
        self.store
            .find_event(event_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(EVENT_NOT_FOUND.to_string()))
    }

    /// Logs the notification and sends it unless this exact message was
    /// already delivered to the recipient. Runs after the triggering write
    /// has committed, so failures here are logged and never returned.
    async fn notify(&self, recipient: &User, notice: EmailNotice) {
        match self.store.record_notification(recipient.id, &notice.body).await {
            Ok(true) => {}
            Ok(false) => {
                info!(user_id = %recipient.id, "Duplicate notification suppressed");
                return;
            }
            Err(e) => {
                warn!(
                    user_id = %recipient.id,
                    error = %e,
                    "Failed to record notification, sending anyway"
                );
            }
        }

        match self.notifier.send(&notice).await {
            NotificationResult::Failed(reason) => {
                warn!(
                    user_id = %recipient.id,
                    error = %reason,
                    "Failed to send notification email"
                );
            }
            NotificationResult::Sent | NotificationResult::Skipped => {}
        }
    }
}

/// Checks required fields, lengths and the date of a full event payload.
fn resolve_fields(request: CreateEventRequest) -> Result<EventFields, DomainError> {
    let required = [
        &request.title,
        &request.description,
        &request.date,
        &request.location,
    ];
    if required.iter().any(|v| v.trim().is_empty()) {
        return Err(DomainError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
    }
    request.validate()?;

    let date = parse_event_date(&request.date)
        .map_err(|_| DomainError::Validation("date: Enter a valid date/time".to_string()))?;

    Ok(EventFields {
        title: request.title,
        description: request.description,
        date,
        location: request.location,
    })
}

fn duplicate_event(err: StoreError) -> DomainError {
    match err {
        StoreError::UniqueViolation(_) => DomainError::Validation(DUPLICATE_EVENT_MESSAGE.to_string()),
        other => DomainError::Store(other),
    }
}
