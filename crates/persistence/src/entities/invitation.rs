//! Invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::InvitationStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for invitation_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invitation_status", rename_all = "lowercase")]
pub enum InvitationStatusDb {
    Pending,
    Accepted,
    Rejected,
}

impl From<InvitationStatusDb> for InvitationStatus {
    fn from(db_status: InvitationStatusDb) -> Self {
        match db_status {
            InvitationStatusDb::Pending => InvitationStatus::Pending,
            InvitationStatusDb::Accepted => InvitationStatus::Accepted,
            InvitationStatusDb::Rejected => InvitationStatus::Rejected,
        }
    }
}

impl From<InvitationStatus> for InvitationStatusDb {
    fn from(status: InvitationStatus) -> Self {
        match status {
            InvitationStatus::Pending => InvitationStatusDb::Pending,
            InvitationStatus::Accepted => InvitationStatusDb::Accepted,
            InvitationStatus::Rejected => InvitationStatusDb::Rejected,
        }
    }
}

/// Database row mapping for the invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: InvitationStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InvitationEntity> for domain::models::Invitation {
    fn from(entity: InvitationEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            user_id: entity.user_id,
            status: entity.status.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Invitation joined with the invited user.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationWithUserEntity {
    pub invitation_id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: InvitationStatusDb,
    // User info
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<InvitationWithUserEntity> for domain::models::InvitationWithUser {
    fn from(entity: InvitationWithUserEntity) -> Self {
        Self {
            invitation_id: entity.invitation_id,
            event_id: entity.event_id,
            user_id: entity.user_id,
            status: entity.status.into(),
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
        }
    }
}
