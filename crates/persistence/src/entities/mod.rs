//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod event;
pub mod invitation;
pub mod message;
pub mod notification;
pub mod session;
pub mod user;

pub use event::EventEntity;
pub use invitation::{InvitationEntity, InvitationStatusDb, InvitationWithUserEntity};
pub use message::MessageWithAuthorEntity;
pub use notification::NotificationEntity;
pub use session::SessionEntity;
pub use user::UserEntity;
