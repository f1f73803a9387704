//! Storage abstraction for the event domain.
//!
//! Implementations must enforce the unique constraints of the data model
//! and report violations as [`StoreError::UniqueViolation`].

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Event, EventFields, Invitation, InvitationStatus, InvitationWithUser, MessageWithAuthor,
    Notification, User,
};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the constraint name.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Storage error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn insert_event(&self, organizer_id: Uuid, fields: &EventFields)
        -> Result<Event, StoreError>;

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, StoreError>;

    /// Overwrites all editable fields.
    async fn update_event(&self, id: Uuid, fields: &EventFields) -> Result<Event, StoreError>;

    async fn list_events_by_organizer(&self, user_id: Uuid) -> Result<Vec<Event>, StoreError>;

    /// Events the user holds an invitation to, in any status.
    async fn list_events_by_invitee(&self, user_id: Uuid) -> Result<Vec<Event>, StoreError>;

    async fn insert_invitation(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        status: InvitationStatus,
    ) -> Result<Invitation, StoreError>;

    /// Returns the invitation for (event, user), creating a pending one if
    /// none exists. The flag is true when it was created.
    async fn get_or_create_invitation(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<(Invitation, bool), StoreError>;

    /// Sets the status only if the invitation is still pending.
    /// Returns `None` when the invitation had already been answered.
    async fn update_pending_invitation(
        &self,
        invitation_id: Uuid,
        status: InvitationStatus,
    ) -> Result<Option<Invitation>, StoreError>;

    async fn list_invitations(
        &self,
        event_id: Uuid,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<InvitationWithUser>, StoreError>;

    /// Returns false when the exact (event, user, content) already exists.
    async fn insert_message(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<bool, StoreError>;

    /// Newest first.
    async fn list_messages(&self, event_id: Uuid) -> Result<Vec<MessageWithAuthor>, StoreError>;

    /// Returns false when the (user, message) pair was already recorded.
    async fn record_notification(&self, user_id: Uuid, message: &str) -> Result<bool, StoreError>;

    /// Newest first.
    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, StoreError>;
}
