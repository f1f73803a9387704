//! In-memory [`EventStore`] for tests and local development.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::store::{EventStore, StoreError};
use crate::models::{
    Event, EventFields, Invitation, InvitationStatus, InvitationWithUser, MessageWithAuthor,
    Notification, User,
};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    events: Vec<Event>,
    invitations: Vec<Invitation>,
    /// (insertion sequence, row)
    messages: Vec<(u64, MessageRow)>,
    notifications: Vec<(u64, Notification)>,
    notifications_offline: bool,
    seq: u64,
}

struct MessageRow {
    id: Uuid,
    event_id: Uuid,
    user_id: Uuid,
    content: String,
    timestamp: chrono::DateTime<Utc>,
}

impl Inner {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn event_key_taken(&self, fields: &EventFields, except: Option<Uuid>) -> bool {
        self.events.iter().any(|e| {
            Some(e.id) != except
                && e.title == fields.title
                && e.date == fields.date
                && e.location == fields.location
        })
    }

    fn with_user(&self, invitation: &Invitation) -> Option<InvitationWithUser> {
        let user = self.users.iter().find(|u| u.id == invitation.user_id)?;
        Some(InvitationWithUser {
            invitation_id: invitation.id,
            event_id: invitation.event_id,
            user_id: user.id,
            status: invitation.status,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        })
    }
}

/// Store keeping all rows in a mutex-guarded set of vectors.
///
/// Enforces the same unique constraints as the database schema.
#[derive(Default)]
pub struct InMemoryEventStore {
    inner: Mutex<Inner>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user, as a completed login would.
    pub fn add_user(&self, email: &str, first_name: &str, last_name: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: email.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            created_at: Utc::now(),
            last_login_at: None,
        };
        self.lock().users.push(user.clone());
        user
    }

    /// Makes every later `record_notification` call fail with a backend error.
    pub fn take_notifications_offline(&self) {
        self.lock().notifications_offline = true;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_event(
        &self,
        organizer_id: Uuid,
        fields: &EventFields,
    ) -> Result<Event, StoreError> {
        let mut inner = self.lock();
        if inner.event_key_taken(fields, None) {
            return Err(StoreError::UniqueViolation("events_title_date_location_key".into()));
        }

        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: fields.title.clone(),
            description: fields.description.clone(),
            date: fields.date,
            location: fields.location.clone(),
            organizer_id,
            created_at: now,
            updated_at: now,
        };
        inner.events.push(event.clone());
        Ok(event)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, StoreError> {
        Ok(self.lock().events.iter().find(|e| e.id == id).cloned())
    }

    async fn update_event(&self, id: Uuid, fields: &EventFields) -> Result<Event, StoreError> {
        let mut inner = self.lock();
        if inner.event_key_taken(fields, Some(id)) {
            return Err(StoreError::UniqueViolation("events_title_date_location_key".into()));
        }

        let event = inner
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::Backend(format!("event {} vanished", id)))?;
        event.title = fields.title.clone();
        event.description = fields.description.clone();
        event.date = fields.date;
        event.location = fields.location.clone();
        event.updated_at = Utc::now();
        Ok(event.clone())
    }

    async fn list_events_by_organizer(&self, user_id: Uuid) -> Result<Vec<Event>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .events
            .iter()
            .filter(|e| e.organizer_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_events_by_invitee(&self, user_id: Uuid) -> Result<Vec<Event>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .events
            .iter()
            .filter(|e| {
                inner
                    .invitations
                    .iter()
                    .any(|i| i.event_id == e.id && i.user_id == user_id)
            })
            .cloned()
            .collect())
    }

    async fn insert_invitation(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        status: InvitationStatus,
    ) -> Result<Invitation, StoreError> {
        let mut inner = self.lock();
        if inner
            .invitations
            .iter()
            .any(|i| i.event_id == event_id && i.user_id == user_id)
        {
            return Err(StoreError::UniqueViolation("invitations_event_id_user_id_key".into()));
        }

        let now = Utc::now();
        let invitation = Invitation {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            status,
            created_at: now,
            updated_at: now,
        };
        inner.invitations.push(invitation.clone());
        Ok(invitation)
    }

    async fn get_or_create_invitation(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<(Invitation, bool), StoreError> {
        let existing = self
            .lock()
            .invitations
            .iter()
            .find(|i| i.event_id == event_id && i.user_id == user_id)
            .cloned();
        match existing {
            Some(invitation) => Ok((invitation, false)),
            None => {
                let invitation = self
                    .insert_invitation(event_id, user_id, InvitationStatus::Pending)
                    .await?;
                Ok((invitation, true))
            }
        }
    }

    async fn update_pending_invitation(
        &self,
        invitation_id: Uuid,
        status: InvitationStatus,
    ) -> Result<Option<Invitation>, StoreError> {
        let mut inner = self.lock();
        let updated = inner
            .invitations
            .iter_mut()
            .find(|i| i.id == invitation_id && i.status == InvitationStatus::Pending)
            .map(|i| {
                i.status = status;
                i.updated_at = Utc::now();
                i.clone()
            });
        Ok(updated)
    }

    async fn list_invitations(
        &self,
        event_id: Uuid,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<InvitationWithUser>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .invitations
            .iter()
            .filter(|i| i.event_id == event_id)
            .filter(|i| status.map_or(true, |s| i.status == s))
            .filter_map(|i| inner.with_user(i))
            .collect())
    }

    async fn insert_message(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        if inner
            .messages
            .iter()
            .any(|(_, m)| m.event_id == event_id && m.user_id == user_id && m.content == content)
        {
            return Ok(false);
        }

        let seq = inner.next_seq();
        inner.messages.push((
            seq,
            MessageRow {
                id: Uuid::new_v4(),
                event_id,
                user_id,
                content: content.to_string(),
                timestamp: Utc::now(),
            },
        ));
        Ok(true)
    }

    async fn list_messages(&self, event_id: Uuid) -> Result<Vec<MessageWithAuthor>, StoreError> {
        let inner = self.lock();
        let mut rows: Vec<_> = inner
            .messages
            .iter()
            .filter(|(_, m)| m.event_id == event_id)
            .collect();
        rows.sort_by(|a, b| (b.1.timestamp, b.0).cmp(&(a.1.timestamp, a.0)));

        Ok(rows
            .into_iter()
            .map(|(_, m)| MessageWithAuthor {
                id: m.id,
                event_id: m.event_id,
                author_email: inner
                    .users
                    .iter()
                    .find(|u| u.id == m.user_id)
                    .map(|u| u.email.clone())
                    .unwrap_or_default(),
                content: m.content.clone(),
                timestamp: m.timestamp,
            })
            .collect())
    }

    async fn record_notification(&self, user_id: Uuid, message: &str) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        if inner.notifications_offline {
            return Err(StoreError::Backend("notifications table unavailable".into()));
        }
        if inner
            .notifications
            .iter()
            .any(|(_, n)| n.user_id == user_id && n.message == message)
        {
            return Ok(false);
        }

        let seq = inner.next_seq();
        inner.notifications.push((
            seq,
            Notification {
                id: Uuid::new_v4(),
                user_id,
                message: message.to_string(),
                timestamp: Utc::now(),
            },
        ));
        Ok(true)
    }

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, StoreError> {
        let inner = self.lock();
        let mut rows: Vec<_> = inner
            .notifications
            .iter()
            .filter(|(_, n)| n.user_id == user_id)
            .collect();
        rows.sort_by(|a, b| (b.1.timestamp, b.0).cmp(&(a.1.timestamp, a.0)));
        Ok(rows.into_iter().map(|(_, n)| n.clone()).collect())
    }
}
