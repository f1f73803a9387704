//! Domain models.

pub mod event;
pub mod invitation;
pub mod message;
pub mod notification;
pub mod place;
pub mod user;

pub use event::{Event, EventFields, EventRole};
pub use invitation::{Attendee, Invitation, InvitationStatus, InvitationWithUser};
pub use message::{Message, MessageWithAuthor};
pub use notification::Notification;
pub use place::{Coordinates, PlaceCandidate, PlaceDetails, PlaceResult};
pub use user::{NewUser, User, UserProfile};
