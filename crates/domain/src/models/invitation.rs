//! Invitation and RSVP domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// RSVP status of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "Pending",
            InvitationStatus::Accepted => "Accepted",
            InvitationStatus::Rejected => "Rejected",
        }
    }

    /// Whether the invited user may still change their response.
    pub fn accepts_response(&self) -> bool {
        matches!(self, InvitationStatus::Pending)
    }
}

impl FromStr for InvitationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(InvitationStatus::Pending),
            "Accepted" => Ok(InvitationStatus::Accepted),
            "Rejected" => Ok(InvitationStatus::Rejected),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user's invitation to one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invitation {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Invitation joined with the invited user's details.
#[derive(Debug, Clone, PartialEq)]
pub struct InvitationWithUser {
    pub invitation_id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: InvitationStatus,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Request to invite a user by email.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct InviteRequest {
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
}

/// Request to respond to an event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RsvpRequest {
    #[serde(default)]
    pub status: String,
}

/// Response after a successful RSVP.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RsvpResponse {
    pub status: String,
    pub rsvp_status: InvitationStatus,
}

/// Query parameters for listing invitations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvitationsQuery {
    pub status: Option<String>,
}

/// Invitation entry in a listing: invited user's email and status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationSummary {
    pub user: String,
    pub status: InvitationStatus,
}

impl From<InvitationWithUser> for InvitationSummary {
    fn from(row: InvitationWithUser) -> Self {
        Self {
            user: row.email,
            status: row.status,
        }
    }
}

/// Response for listing invitations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListInvitationsResponse {
    pub invitations: Vec<InvitationSummary>,
}

/// Invited user, regardless of RSVP status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Attendee {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<InvitationWithUser> for Attendee {
    fn from(row: InvitationWithUser) -> Self {
        Self {
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

/// Response for listing attendees.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListAttendeesResponse {
    pub attendees: Vec<Attendee>,
}
