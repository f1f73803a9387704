//! PostgreSQL implementation of the domain [`EventStore`].

use async_trait::async_trait;
use domain::models::{
    Event, EventFields, Invitation, InvitationStatus, InvitationWithUser, MessageWithAuthor,
    Notification, User,
};
use domain::services::{EventStore, StoreError};
use sqlx::PgPool;
use uuid::Uuid;

use crate::repositories::{
    EventRepository, InvitationRepository, MessageRepository, NotificationRepository,
    UserRepository,
};

/// PostgreSQL unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Maps a sqlx error onto the domain store error.
pub fn store_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            tracing::debug!(constraint = %constraint, "Unique constraint rejected write");
            return StoreError::UniqueViolation(constraint);
        }
    }
    tracing::error!(error = %err, "Database error");
    StoreError::Backend(err.to_string())
}

/// [`EventStore`] backed by the repositories.
#[derive(Clone)]
pub struct PgEventStore {
    users: UserRepository,
    events: EventRepository,
    invitations: InvitationRepository,
    messages: MessageRepository,
    notifications: NotificationRepository,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            invitations: InvitationRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool),
        }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = self.users.find_by_id(id).await.map_err(store_error)?;
        Ok(user.map(Into::into))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = self.users.find_by_email(email).await.map_err(store_error)?;
        Ok(user.map(Into::into))
    }

    async fn insert_event(
        &self,
        organizer_id: Uuid,
        fields: &EventFields,
    ) -> Result<Event, StoreError> {
        let event = self
            .events
            .create(organizer_id, fields)
            .await
            .map_err(store_error)?;
        Ok(event.into())
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        let event = self.events.find_by_id(id).await.map_err(store_error)?;
        Ok(event.map(Into::into))
    }

    async fn update_event(&self, id: Uuid, fields: &EventFields) -> Result<Event, StoreError> {
        let event = self.events.update(id, fields).await.map_err(store_error)?;
        Ok(event.into())
    }

    async fn list_events_by_organizer(&self, user_id: Uuid) -> Result<Vec<Event>, StoreError> {
        let events = self
            .events
            .list_by_organizer(user_id)
            .await
            .map_err(store_error)?;
        Ok(events.into_iter().map(Into::into).collect())
    }

    async fn list_events_by_invitee(&self, user_id: Uuid) -> Result<Vec<Event>, StoreError> {
        let events = self
            .events
            .list_by_invitee(user_id)
            .await
            .map_err(store_error)?;
        Ok(events.into_iter().map(Into::into).collect())
    }

    async fn insert_invitation(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        status: InvitationStatus,
    ) -> Result<Invitation, StoreError> {
        let invitation = self
            .invitations
            .create(event_id, user_id, status.into())
            .await
            .map_err(store_error)?;
        Ok(invitation.into())
    }

    async fn get_or_create_invitation(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<(Invitation, bool), StoreError> {
        let (invitation, created) = self
            .invitations
            .get_or_create(event_id, user_id)
            .await
            .map_err(store_error)?;
        Ok((invitation.into(), created))
    }

    async fn update_pending_invitation(
        &self,
        invitation_id: Uuid,
        status: InvitationStatus,
    ) -> Result<Option<Invitation>, StoreError> {
        let invitation = self
            .invitations
            .update_if_pending(invitation_id, status.into())
            .await
            .map_err(store_error)?;
        Ok(invitation.map(Into::into))
    }

    async fn list_invitations(
        &self,
        event_id: Uuid,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<InvitationWithUser>, StoreError> {
        let rows = self
            .invitations
            .list_for_event(event_id, status.map(Into::into))
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_message(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<bool, StoreError> {
        self.messages
            .create(event_id, user_id, content)
            .await
            .map_err(store_error)
    }

    async fn list_messages(&self, event_id: Uuid) -> Result<Vec<MessageWithAuthor>, StoreError> {
        let rows = self
            .messages
            .list_for_event(event_id)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn record_notification(&self, user_id: Uuid, message: &str) -> Result<bool, StoreError> {
        self.notifications
            .record(user_id, message)
            .await
            .map_err(store_error)
    }

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, StoreError> {
        let rows = self
            .notifications
            .list_for_user(user_id)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_backend() {
        let err = store_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
