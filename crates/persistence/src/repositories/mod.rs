//! Repository implementations for database operations.

pub mod event;
pub mod invitation;
pub mod message;
pub mod notification;
pub mod session;
pub mod user;

pub use event::EventRepository;
pub use invitation::InvitationRepository;
pub use message::MessageRepository;
pub use notification::NotificationRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
