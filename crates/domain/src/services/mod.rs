//! Domain services.

pub mod events;
pub mod memory;
pub mod notification;
pub mod places;
pub mod store;

pub use events::EventService;
pub use memory::InMemoryEventStore;
pub use notification::{
    EmailNotice, MockNotificationSender, NotificationResult, NotificationSender,
};
pub use places::{search_places, PlacesError, PlacesProvider, MAX_PLACE_RESULTS};
pub use store::{EventStore, StoreError};

use thiserror::Error;
use validator::ValidationErrors;

/// Errors surfaced by domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let msg = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "invalid".to_string());
                format!("{}: {}", field, msg)
            })
            .collect();
        messages.sort();
        DomainError::Validation(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_validation_errors_are_sorted_by_field() {
        let mut errors = ValidationErrors::new();
        let mut e = ValidationError::new("blank");
        e.message = Some("This field is required".into());
        errors.add("title", e.clone());
        errors.add("date", e);

        let err = DomainError::from(errors);
        assert_eq!(
            err.to_string(),
            "date: This field is required, title: This field is required"
        );
    }
}
