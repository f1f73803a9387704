//! Email notifications for invitations and RSVP updates.
//!
//! Sending is best effort. Callers log a failed [`NotificationResult`] and
//! carry on; a notification never fails the operation that triggered it.

use std::sync::{Arc, Mutex};

use crate::models::{Event, InvitationStatus, User};

/// An email ready to be handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailNotice {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub body: String,
}

impl EmailNotice {
    /// Email telling `invitee` they were invited to `event` by `organizer`.
    pub fn invitation(invitee: &User, event: &Event, organizer: &User) -> Self {
        Self {
            to_email: invitee.email.clone(),
            to_name: invitee.username.clone(),
            subject: "You Have Been Invited to an Event!".to_string(),
            body: format!(
                "Hello {},\n\nYou have been invited to the event \"{}\" by {}. \
                 Please check your account for more details.",
                invitee.username, event.title, organizer.username
            ),
        }
    }

    /// Email telling `organizer` that `responder` changed their RSVP.
    pub fn rsvp_update(
        organizer: &User,
        event: &Event,
        responder: &User,
        status: InvitationStatus,
    ) -> Self {
        Self {
            to_email: organizer.email.clone(),
            to_name: organizer.username.clone(),
            subject: "RSVP Status Updated".to_string(),
            body: format!(
                "Hello {},\n\n{} has updated their RSVP status to \"{}\" for your event \"{}\".\n\n\
                 Please check the event details for more information.",
                organizer.username, responder.username, status, event.title
            ),
        }
    }
}

/// Result of a notification send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationResult {
    /// Notification was sent successfully.
    Sent,
    /// Sending failed (non-blocking).
    Failed(String),
    /// Notification was skipped (delivery disabled or already sent).
    Skipped,
}

/// Outbound transport for notification emails.
#[async_trait::async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, notice: &EmailNotice) -> NotificationResult;
}

#[async_trait::async_trait]
impl<T: NotificationSender + ?Sized> NotificationSender for Arc<T> {
    async fn send(&self, notice: &EmailNotice) -> NotificationResult {
        (**self).send(notice).await
    }
}

/// Mock sender for development and testing.
///
/// Records every notice it is asked to send.
#[derive(Debug, Default)]
pub struct MockNotificationSender {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
    sent: Mutex<Vec<EmailNotice>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock sender that simulates failures.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Notices handed to this sender so far, including failed ones.
    pub fn sent(&self) -> Vec<EmailNotice> {
        self.sent
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send(&self, notice: &EmailNotice) -> NotificationResult {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notice.clone());
        }

        if self.simulate_failure {
            tracing::warn!(
                to = %notice.to_email,
                "Mock notification sender simulating failure"
            );
            return NotificationResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(
            to = %notice.to_email,
            subject = %notice.subject,
            "Mock: Would send notification email"
        );
        NotificationResult::Sent
    }
}
