//! Event domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Maximum length of an event title or location.
pub const MAX_SHORT_FIELD_LENGTH: usize = 200;

fn validate_short_field(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > MAX_SHORT_FIELD_LENGTH {
        let mut err = ValidationError::new("length");
        err.message = Some(
            format!(
                "Ensure this value has at most {} characters",
                MAX_SHORT_FIELD_LENGTH
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Represents an event owned by its organizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub organizer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, complete set of editable event fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EventFields {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
}

/// Which side of the event a listing is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventRole {
    /// Events the user organizes.
    Organizer,
    /// Events the user holds an invitation to.
    Collaborator,
}

/// Request to create a new event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventRequest {
    #[serde(default)]
    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        custom(function = "validate_short_field")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub description: String,

    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub date: String,

    #[serde(default)]
    #[validate(
        custom(function = "shared::validation::validate_not_blank"),
        custom(function = "validate_short_field")
    )]
    pub location: String,
}

/// Response after creating an event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventResponse {
    pub status: String,
    pub event_id: Uuid,
}

/// Partial update of an event; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EditEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
}

/// Event as returned by listing endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EventSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub organizer_id: Uuid,
}

impl From<Event> for EventSummary {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            organizer_id: event.organizer_id,
        }
    }
}

/// Response for listing events.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListEventsResponse {
    pub events: Vec<EventSummary>,
}

/// Edited event, with the organizer shown by email.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EditedEvent {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub organizer: String,
}

impl EditedEvent {
    pub fn new(event: Event, organizer_email: &str) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            organizer: organizer_email.to_string(),
        }
    }
}

/// Response after editing an event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EditEventResponse {
    pub message: String,
    pub event: EditedEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_event_request_valid() {
        let request: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "title": "Launch",
            "description": "Product launch party",
            "date": "2025-01-01",
            "location": "NYC"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_event_request_missing_fields() {
        let request: CreateEventRequest =
            serde_json::from_value(serde_json::json!({ "title": "Launch" })).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("description"));
        assert!(fields.contains_key("date"));
        assert!(fields.contains_key("location"));
        assert!(!fields.contains_key("title"));
    }

    #[test]
    fn test_create_event_request_title_too_long() {
        let request = CreateEventRequest {
            title: "x".repeat(MAX_SHORT_FIELD_LENGTH + 1),
            description: "d".to_string(),
            date: "2025-01-01".to_string(),
            location: "NYC".to_string(),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(
            fields["title"][0].message.as_deref(),
            Some("Ensure this value has at most 200 characters")
        );
    }

    #[test]
    fn test_short_field_limit_is_inclusive() {
        let request = CreateEventRequest {
            title: "x".repeat(MAX_SHORT_FIELD_LENGTH),
            description: "d".to_string(),
            date: "2025-01-01".to_string(),
            location: "é".repeat(MAX_SHORT_FIELD_LENGTH),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_edit_event_request_partial() {
        let request: EditEventRequest =
            serde_json::from_value(serde_json::json!({ "title": "Renamed" })).unwrap();
        assert_eq!(request.title.as_deref(), Some("Renamed"));
        assert!(request.description.is_none());
        assert!(request.date.is_none());
    }

    #[test]
    fn test_event_summary_from_event() {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: "Launch".to_string(),
            description: "desc".to_string(),
            date: now,
            location: "NYC".to_string(),
            organizer_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        let summary = EventSummary::from(event.clone());
        assert_eq!(summary.id, event.id);
        assert_eq!(summary.organizer_id, event.organizer_id);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["title"], "Launch");
        assert!(json["date"].is_string());
    }
}
